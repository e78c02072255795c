pub mod assertion;
pub mod certificate_validator;
pub mod document_cache;
pub mod document_processor;
pub mod signer;
