pub mod document;
pub mod request;
pub mod result;
