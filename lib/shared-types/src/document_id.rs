use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::macros::impls_for_string_newtype;

/// Identifier of one to-be-signed document, unique within a sign request
/// and stable through the request/response round trip.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct DocumentId(String);

impls_for_string_newtype!(DocumentId);

impl DocumentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}
