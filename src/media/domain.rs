use crate::core::domain::Identifiable;

pub mod model;

pub trait Media: Identifiable {
    fn media_type(&self) -> String;
    fn is_available(&self) -> bool;
}
