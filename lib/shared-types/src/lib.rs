mod document_id;
mod policy_id;
mod request_id;

pub(crate) mod macros;

pub use document_id::DocumentId;
pub use policy_id::PolicyId;
pub use request_id::RequestId;
