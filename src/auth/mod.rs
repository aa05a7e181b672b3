pub mod provider;
pub mod token;
