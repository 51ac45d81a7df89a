pub mod console;
pub mod events;
pub mod factory;
pub mod file;
pub mod hub;
pub mod mail;
#[cfg(test)]
pub(crate) mod recording;
