use serde::{Deserialize, Serialize};
use shared_types::RequestId;
use time::OffsetDateTime;

use crate::model::document::SignedDocument;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignerAttribute {
    pub name: String,
    pub value: String,
}

/// Validated information about the authentication assertion under which the
/// signature was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignerAssertionInfo {
    pub assertion_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub authn_instant: OffsetDateTime,
    pub authn_context_class_ref: String,
    pub identity_provider: String,
    pub attributes: Vec<SignerAttribute>,
    /// Raw assertion as delivered by the service.
    pub assertion: Vec<u8>,
}

/// Terminal success artifact of response processing. Constructed only after
/// every validation stage has passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureResult {
    pub id: RequestId,
    pub correlation_id: String,
    pub signer_assertion_info: SignerAssertionInfo,
    /// Compiled documents, in the order they appeared in the request.
    pub signed_documents: Vec<SignedDocument>,
}
