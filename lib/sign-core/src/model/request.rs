use serde::{Deserialize, Serialize};
use shared_types::PolicyId;
use time::OffsetDateTime;

use crate::model::document::TbsDocument;
use crate::proto::dss::SignRequestWire;

/// Certificate type the signer certificate must be issued as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum CertificateType {
    #[serde(rename = "PKC")]
    #[strum(serialize = "PKC")]
    Pkc,
    #[serde(rename = "QC")]
    #[strum(serialize = "QC")]
    Qc,
    #[serde(rename = "QC/SSCD")]
    #[strum(serialize = "QC/SSCD")]
    QcSscd,
}

/// SAML attribute of the signer the request asks the service to assert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedAttribute {
    pub name: String,
    pub value: Option<String>,
    pub required: bool,
}

/// Maps asserted SAML attributes onto signer certificate fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateAttributeMapping {
    pub saml_attribute_names: Vec<String>,
    pub certificate_attribute: String,
    pub required: bool,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthnRequirements {
    pub authn_service_id: Option<String>,
    pub authn_profile: Option<String>,
    pub authn_context_class_refs: Vec<String>,
    pub requested_signer_attributes: Vec<RequestedAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateRequirements {
    pub certificate_type: Option<CertificateType>,
    pub attribute_mappings: Vec<CertificateAttributeMapping>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignMessageMimeType {
    #[default]
    Text,
    Html,
    Markdown,
}

impl SignMessageMimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Html => "HTML",
            Self::Markdown => "MARKDOWN",
        }
    }
}

/// Optional human-readable message shown to the signer during
/// authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignMessageParameters {
    pub message: Vec<u8>,
    pub mime_type: Option<SignMessageMimeType>,
    pub must_show: Option<bool>,
    pub perform_encryption: bool,
    /// Entity the encrypted message is addressed to. Defaults to the
    /// authentication service when encryption is requested without one.
    pub display_entity: Option<String>,
}

/// Caller input for building a sign request. Every optional field not set
/// here is resolved from the active policy configuration before the request
/// is constructed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignRequestInput {
    pub correlation_id: Option<String>,
    pub policy: Option<PolicyId>,
    pub sign_requester_id: Option<String>,
    pub return_url: Option<String>,
    pub destination_url: Option<String>,
    pub signature_algorithm: Option<String>,
    #[serde(default)]
    pub authn_requirements: AuthnRequirements,
    pub certificate_requirements: Option<CertificateRequirements>,
    pub sign_message_parameters: Option<SignMessageParameters>,
    pub tbs_documents: Vec<TbsDocument>,
}

/// Server-held record correlating an outstanding request to its original
/// wire request and document list. Created when the request is issued and
/// consumed exactly once when the matching response arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureSessionState {
    pub correlation_id: String,
    pub sign_request: SignRequestWire,
    pub tbs_documents: Vec<TbsDocument>,
    #[serde(with = "time::serde::rfc3339")]
    pub request_time: OffsetDateTime,
}
