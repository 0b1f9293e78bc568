pub mod jwt;
pub mod trust;
