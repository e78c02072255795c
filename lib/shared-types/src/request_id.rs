use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::macros::impls_for_string_newtype;

/// Identifier of one sign request, echoed back by the signing service.
///
/// The correlation key between a stored signature session and the
/// response delivered for it.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct RequestId(String);

impls_for_string_newtype!(RequestId);

impl RequestId {
    /// Generates a fresh random request identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl From<Uuid> for RequestId {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}
