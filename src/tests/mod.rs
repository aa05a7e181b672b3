pub mod common;

mod authentication_service;
mod provider_selection;
