pub mod sink;
pub mod transport;
