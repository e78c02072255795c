pub mod error;
pub mod sign_request;
pub mod sign_response;
