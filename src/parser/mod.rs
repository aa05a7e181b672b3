pub mod template;
pub mod token_response;
