pub mod date;
pub mod locks;
pub mod logs;
pub(crate) mod memory;
