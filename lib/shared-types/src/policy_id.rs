use serde::{Deserialize, Serialize};

use crate::macros::impls_for_string_newtype;

/// Named configuration profile selecting trust anchors, algorithms and
/// processing thresholds.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct PolicyId(String);

impls_for_string_newtype!(PolicyId);
