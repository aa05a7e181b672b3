pub mod authentication;
pub mod circles;
pub mod company;
pub mod employees;
pub mod proc_loader;
pub mod proc_validator;
pub mod services;
pub mod settings;
pub mod sources;
pub mod types;
