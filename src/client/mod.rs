pub mod configuration;
pub mod factory;
pub mod persons;
