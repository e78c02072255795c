use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared_types::DocumentId;

use crate::proto::dss::{AdesObjectWire, SignatureType};

/// Document formats this integration knows how to get signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum DocumentType {
    #[serde(rename = "application/pdf")]
    #[strum(serialize = "application/pdf")]
    Pdf,
    #[serde(rename = "application/xml")]
    #[strum(serialize = "application/xml")]
    Xml,
}

impl DocumentType {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Xml => "application/xml",
        }
    }

    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        match mime_type {
            "application/pdf" => Some(Self::Pdf),
            "application/xml" | "text/xml" => Some(Self::Xml),
            _ => None,
        }
    }

    pub fn signature_type(&self) -> SignatureType {
        match self {
            Self::Pdf => SignatureType::Pdf,
            Self::Xml => SignatureType::Xml,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdesFormat {
    #[default]
    None,
    Bes,
    Epes,
}

/// Advanced-electronic-signature requirement for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdesRequirement {
    pub format: AdesFormat,
    /// Signature policy identifier, required for EPES.
    pub signature_policy: Option<String>,
    /// Pre-built AdES object supplied by the caller, if any.
    pub ades_object: Option<AdesObjectWire>,
}

/// Caller requirements for a visible PDF signature image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibleSignatureRequirement {
    pub template_reference: String,
    pub page: u32,
    pub x_position: u32,
    pub y_position: u32,
    pub field_values: HashMap<String, String>,
}

/// One document awaiting signature.
///
/// Exactly one of `content` and `content_reference` must be set; the id is
/// assigned before the request is sent and stays stable through the round
/// trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TbsDocument {
    pub id: Option<DocumentId>,
    pub mime_type: String,
    pub content: Option<Vec<u8>>,
    /// Key of a previously cached document, resolved during pre-processing.
    pub content_reference: Option<String>,
    pub ades_requirement: Option<AdesRequirement>,
    pub visible_signature_requirement: Option<VisibleSignatureRequirement>,
}

impl TbsDocument {
    pub fn document_type(&self) -> Option<DocumentType> {
        DocumentType::from_mime_type(&self.mime_type)
    }
}

/// Terminal per-document output of response processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedDocument {
    pub id: DocumentId,
    pub mime_type: String,
    pub signed_content: Vec<u8>,
}
