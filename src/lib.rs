pub mod app;
pub mod core;
pub mod fines;
pub mod gateway;
pub mod loans;
pub mod media;
pub mod patrons;
pub mod policy;
pub mod rules;
pub mod utils;
