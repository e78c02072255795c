//! Wire shapes for the DSS-extension SignRequest/SignResponse messages.
//!
//! Messages travel XML-encoded and Base64-wrapped. The shapes below mirror
//! the profile's extension elements; the enveloped XML signature itself is
//! produced and verified by an external engine, this module only carries
//! its value and computes the byte string the engine signs.

use serde::{Deserialize, Serialize};
use shared_types::{DocumentId, RequestId};
use thiserror::Error;
use time::OffsetDateTime;

/// Profile URI every message must declare.
pub const DSS_PROFILE: &str = "http://id.elegnamnden.se/csig/1.1/dss-ext/profile";

pub const RESULT_MAJOR_SUCCESS: &str = "urn:oasis:names:tc:dss:1.0:resultmajor:Success";
pub const RESULT_MAJOR_REQUESTER_ERROR: &str = "urn:oasis:names:tc:dss:1.0:resultmajor:RequesterError";
pub const RESULT_MINOR_USER_CANCEL: &str = "http://id.elegnamnden.se/sig-status/1.0/user-cancel";

pub const ALGORITHM_RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";
pub const ALGORITHM_ECDSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha256";

pub const DIGEST_SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";
pub const DIGEST_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#sha384";
pub const DIGEST_SHA512: &str = "http://www.w3.org/2001/04/xmlenc#sha512";

#[derive(Debug, Error)]
pub enum DssEncodingError {
    #[error("XML serialization failed: {0}")]
    XmlSerialization(String),
    #[error("XML parsing failed: {0}")]
    XmlParsing(String),
    #[error("invalid base64 transport encoding")]
    InvalidBase64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum SignatureType {
    #[serde(rename = "XML")]
    #[strum(serialize = "XML")]
    Xml,
    #[serde(rename = "PDF")]
    #[strum(serialize = "PDF")]
    Pdf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum AdesType {
    #[default]
    None,
    #[serde(rename = "BES")]
    #[strum(serialize = "BES")]
    Bes,
    #[serde(rename = "EPES")]
    #[strum(serialize = "EPES")]
    Epes,
}

/// Digest binding the signer certificate into an AdES signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateDigestWire {
    #[serde(rename = "DigestMethod")]
    pub method: String,
    #[serde(rename = "DigestValue", with = "base64_bytes")]
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdesObjectWire {
    #[serde(rename = "SignatureId", default, skip_serializing_if = "Option::is_none")]
    pub signature_id: Option<String>,
    #[serde(rename = "SigningCertificateDigest", default, skip_serializing_if = "Option::is_none")]
    pub cert_digest: Option<CertificateDigestWire>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureValueWire {
    /// Signature algorithm URI, when declared by the service.
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(rename = "Value", with = "base64_bytes")]
    pub value: Vec<u8>,
}

/// One to-be-signed document paired with its resulting signature.
///
/// All fields except the signature are produced by the requester; the
/// signing service echoes them back and fills in the signature. Presence
/// of the required fields is validated during response processing, not
/// here, so everything the remote controls is optional in the shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignTaskDataWire {
    #[serde(rename = "TaskId", default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<DocumentId>,
    #[serde(rename = "SigType", default, skip_serializing_if = "Option::is_none")]
    pub sig_type: Option<SignatureType>,
    #[serde(rename = "ToBeSignedBytes", default, skip_serializing_if = "Option::is_none", with = "base64_bytes_opt")]
    pub to_be_signed_bytes: Option<Vec<u8>>,
    #[serde(rename = "AdESType", default)]
    pub ades_type: AdesType,
    #[serde(rename = "AdESObject", default, skip_serializing_if = "Option::is_none")]
    pub ades_object: Option<AdesObjectWire>,
    #[serde(rename = "Base64Signature", default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<SignatureValueWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignTasksWire {
    #[serde(rename = "SignTaskData", default)]
    pub tasks: Vec<SignTaskDataWire>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedAttributeWire {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "Required", default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignerAttributesWire {
    #[serde(rename = "RequestedCertAttribute", default)]
    pub attributes: Vec<RequestedAttributeWire>,
}

/// Maps SAML attributes of the authenticated signer onto certificate fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeMappingWire {
    #[serde(rename = "SamlAttributeName", default)]
    pub saml_attribute_names: Vec<String>,
    #[serde(rename = "CertAttributeRef")]
    pub certificate_attribute: String,
    #[serde(rename = "Required", default)]
    pub required: bool,
    #[serde(rename = "DefaultValue", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertRequestPropertiesWire {
    #[serde(rename = "CertType")]
    pub certificate_type: String,
    #[serde(rename = "AttributeMapping", default)]
    pub attribute_mappings: Vec<AttributeMappingWire>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignMessageWire {
    #[serde(rename = "MustShow", default)]
    pub must_show: bool,
    #[serde(rename = "Encrypted", default)]
    pub encrypted: bool,
    #[serde(rename = "MimeType")]
    pub mime_type: String,
    #[serde(rename = "DisplayEntity", default, skip_serializing_if = "Option::is_none")]
    pub display_entity: Option<String>,
    #[serde(rename = "Message", with = "base64_bytes")]
    pub message: Vec<u8>,
}

/// SAML-style conditions window limiting when the request may be consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionsWire {
    #[serde(rename = "NotBefore", with = "time::serde::rfc3339")]
    pub not_before: OffsetDateTime,
    #[serde(rename = "NotOnOrAfter", with = "time::serde::rfc3339")]
    pub not_on_or_after: OffsetDateTime,
    #[serde(rename = "AudienceRestriction")]
    pub audience: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignRequestExtensionWire {
    #[serde(rename = "RequestTime", with = "time::serde::rfc3339")]
    pub request_time: OffsetDateTime,
    #[serde(rename = "Conditions")]
    pub conditions: ConditionsWire,
    /// Absent when an anonymous signature was requested.
    #[serde(rename = "Signer", default, skip_serializing_if = "Option::is_none")]
    pub signer_attributes: Option<SignerAttributesWire>,
    #[serde(rename = "IdentityProvider")]
    pub identity_provider: String,
    #[serde(rename = "AuthnProfile", default, skip_serializing_if = "Option::is_none")]
    pub authn_profile: Option<String>,
    #[serde(rename = "AuthnContextClassRef", default)]
    pub authn_context_class_refs: Vec<String>,
    #[serde(rename = "SignRequester")]
    pub sign_requester: String,
    #[serde(rename = "SignService")]
    pub sign_service: String,
    #[serde(rename = "RequestedSignatureAlgorithm")]
    pub requested_signature_algorithm: String,
    #[serde(rename = "CertRequestProperties")]
    pub cert_request_properties: CertRequestPropertiesWire,
    #[serde(rename = "SignMessage", default, skip_serializing_if = "Option::is_none")]
    pub sign_message: Option<SignMessageWire>,
    #[serde(rename = "SignTasks", default)]
    pub sign_tasks: SignTasksWire,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "SignRequest")]
pub struct SignRequestWire {
    #[serde(rename = "Profile")]
    pub profile: String,
    #[serde(rename = "RequestID")]
    pub request_id: RequestId,
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "OptionalInputs")]
    pub optional_inputs: SignRequestExtensionWire,
    #[serde(rename = "Signature", default, skip_serializing_if = "Option::is_none", with = "base64_bytes_opt")]
    pub signature: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultWire {
    #[serde(rename = "ResultMajor")]
    pub major: String,
    #[serde(rename = "ResultMinor", default, skip_serializing_if = "Option::is_none")]
    pub minor: Option<String>,
    #[serde(rename = "ResultMessage", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateChainWire {
    #[serde(rename = "X509Certificate", default)]
    pub certificates: Vec<Base64DerWire>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base64DerWire(#[serde(with = "base64_bytes")] pub Vec<u8>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignerAttributeWire {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignerAssertionInfoWire {
    #[serde(rename = "AssertionId", default, skip_serializing_if = "Option::is_none")]
    pub assertion_id: Option<String>,
    #[serde(rename = "AuthnInstant", default, with = "rfc3339_opt", skip_serializing_if = "Option::is_none")]
    pub authn_instant: Option<OffsetDateTime>,
    #[serde(rename = "AuthnContextClassRef", default, skip_serializing_if = "Option::is_none")]
    pub authn_context_class_ref: Option<String>,
    #[serde(rename = "IdentityProvider", default, skip_serializing_if = "Option::is_none")]
    pub identity_provider: Option<String>,
    #[serde(rename = "AttributeStatement", default)]
    pub attributes: Vec<SignerAttributeWire>,
    #[serde(rename = "Assertion", default, skip_serializing_if = "Option::is_none", with = "base64_bytes_opt")]
    pub assertion: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignResponseExtensionWire {
    #[serde(rename = "ResponseTime", default, with = "rfc3339_opt", skip_serializing_if = "Option::is_none")]
    pub response_time: Option<OffsetDateTime>,
    /// Byte-exact copy of the XML request this response answers.
    #[serde(rename = "Request", default, skip_serializing_if = "Option::is_none", with = "base64_bytes_opt")]
    pub echoed_request: Option<Vec<u8>>,
    #[serde(rename = "SignerAssertionInfo", default, skip_serializing_if = "Option::is_none")]
    pub signer_assertion_info: Option<SignerAssertionInfoWire>,
    #[serde(rename = "SignatureCertificateChain", default, skip_serializing_if = "Option::is_none")]
    pub certificate_chain: Option<CertificateChainWire>,
    #[serde(rename = "SignTasks", default)]
    pub sign_tasks: SignTasksWire,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "SignResponse")]
pub struct SignResponseWire {
    #[serde(rename = "Profile", default)]
    pub profile: String,
    #[serde(rename = "InResponseTo")]
    pub in_response_to: RequestId,
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "Result", default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultWire>,
    #[serde(rename = "OptionalOutputs", default, skip_serializing_if = "Option::is_none")]
    pub optional_outputs: Option<SignResponseExtensionWire>,
    #[serde(rename = "Signature", default, skip_serializing_if = "Option::is_none", with = "base64_bytes_opt")]
    pub signature: Option<Vec<u8>>,
}

/// XML bytes of the request as transmitted, also used for the echoed-request
/// comparison during response processing.
pub fn request_bytes(request: &SignRequestWire) -> Result<Vec<u8>, DssEncodingError> {
    to_xml_bytes(request)
}

/// Byte string an external XML-dsig engine signs or verifies: the message
/// with its signature element removed.
pub fn request_signing_input(request: &SignRequestWire) -> Result<Vec<u8>, DssEncodingError> {
    let mut unsigned = request.clone();
    unsigned.signature = None;
    to_xml_bytes(&unsigned)
}

pub fn response_signing_input(response: &SignResponseWire) -> Result<Vec<u8>, DssEncodingError> {
    let mut unsigned = response.clone();
    unsigned.signature = None;
    to_xml_bytes(&unsigned)
}

/// Serializes and Base64-wraps a request for transport.
pub fn encode_sign_request(request: &SignRequestWire) -> Result<String, DssEncodingError> {
    encode_base64(&request_bytes(request)?)
}

pub fn decode_sign_request(encoded: &str) -> Result<SignRequestWire, DssEncodingError> {
    from_xml_bytes(&decode_base64(encoded)?)
}

pub fn encode_sign_response(response: &SignResponseWire) -> Result<String, DssEncodingError> {
    encode_base64(&to_xml_bytes(response)?)
}

pub fn decode_sign_response(encoded: &str) -> Result<SignResponseWire, DssEncodingError> {
    from_xml_bytes(&decode_base64(encoded)?)
}

fn to_xml_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, DssEncodingError> {
    quick_xml::se::to_string(value)
        .map(String::into_bytes)
        .map_err(|error| DssEncodingError::XmlSerialization(error.to_string()))
}

fn from_xml_bytes<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, DssEncodingError> {
    let text =
        std::str::from_utf8(bytes).map_err(|error| DssEncodingError::XmlParsing(error.to_string()))?;
    quick_xml::de::from_str(text).map_err(|error| DssEncodingError::XmlParsing(error.to_string()))
}

fn encode_base64(bytes: &[u8]) -> Result<String, DssEncodingError> {
    use ct_codecs::{Base64, Encoder};

    Base64::encode_to_string(bytes).map_err(|_| DssEncodingError::InvalidBase64)
}

fn decode_base64(encoded: &str) -> Result<Vec<u8>, DssEncodingError> {
    use ct_codecs::{Base64, Decoder};

    Base64::decode_to_vec(encoded.trim(), None).map_err(|_| DssEncodingError::InvalidBase64)
}

/// The XML deserializer hands element content over as text, so optional
/// timestamps go through a string instead of time's own option module.
pub(crate) mod rfc3339_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::Rfc3339;
    use time::OffsetDateTime;

    pub fn serialize<S: Serializer>(
        value: &Option<OffsetDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => {
                let formatted = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
                serializer.serialize_some(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<OffsetDateTime>, D::Error> {
        let text: Option<String> = Option::deserialize(deserializer)?;
        text.map(|text| {
            OffsetDateTime::parse(&text, &Rfc3339).map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}

pub(crate) mod base64_bytes {
    use ct_codecs::{Base64, Decoder, Encoder};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = Base64::encode_to_string(bytes).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Base64::decode_to_vec(encoded.trim(), None).map_err(serde::de::Error::custom)
    }
}

pub(crate) mod base64_bytes_opt {
    use ct_codecs::{Base64, Decoder, Encoder};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => {
                let encoded =
                    Base64::encode_to_string(bytes).map_err(serde::ser::Error::custom)?;
                serializer.serialize_some(&encoded)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|encoded| {
                Base64::decode_to_vec(encoded.trim(), None).map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_request() -> SignRequestWire {
        SignRequestWire {
            profile: DSS_PROFILE.to_owned(),
            request_id: "d56bcd44-cf71-4a45-b0e9-b0cd4a0e0a3b".into(),
            version: Some("1.1".to_owned()),
            optional_inputs: SignRequestExtensionWire {
                request_time: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
                conditions: ConditionsWire {
                    not_before: OffsetDateTime::from_unix_timestamp(1_699_999_940).unwrap(),
                    not_on_or_after: OffsetDateTime::from_unix_timestamp(1_700_000_300).unwrap(),
                    audience: "https://requester.example.com/sign/return".to_owned(),
                },
                signer_attributes: None,
                identity_provider: "https://idp.example.com".to_owned(),
                authn_profile: None,
                authn_context_class_refs: vec![
                    "http://id.elegnamnden.se/loa/1.0/loa3".to_owned(),
                ],
                sign_requester: "https://requester.example.com".to_owned(),
                sign_service: "https://signservice.example.com".to_owned(),
                requested_signature_algorithm: ALGORITHM_RSA_SHA256.to_owned(),
                cert_request_properties: CertRequestPropertiesWire {
                    certificate_type: "PKC".to_owned(),
                    attribute_mappings: vec![],
                },
                sign_message: None,
                sign_tasks: SignTasksWire {
                    tasks: vec![SignTaskDataWire {
                        task_id: Some("doc-1".into()),
                        sig_type: Some(SignatureType::Pdf),
                        to_be_signed_bytes: Some(b"to-be-signed".to_vec()),
                        ades_type: AdesType::None,
                        ades_object: None,
                        signature: None,
                    }],
                },
            },
            signature: Some(b"request-signature".to_vec()),
        }
    }

    #[test]
    fn test_request_transport_round_trip() {
        let request = minimal_request();

        let encoded = encode_sign_request(&request).unwrap();
        let decoded = decode_sign_request(&encoded).unwrap();

        assert_eq!(request, decoded);
    }

    #[test]
    fn test_signing_input_excludes_signature() {
        let request = minimal_request();

        let input = request_signing_input(&request).unwrap();
        let full = request_bytes(&request).unwrap();

        assert_ne!(input, full);

        let mut unsigned = request;
        unsigned.signature = None;
        assert_eq!(input, request_bytes(&unsigned).unwrap());
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        assert!(matches!(
            decode_sign_response("not//valid=base64!"),
            Err(DssEncodingError::InvalidBase64)
        ));
    }

    #[test]
    fn test_decode_rejects_malformed_xml() {
        use ct_codecs::{Base64, Encoder};

        let encoded = Base64::encode_to_string(b"<SignResponse><unclosed>").unwrap();
        assert!(matches!(
            decode_sign_response(&encoded),
            Err(DssEncodingError::XmlParsing(_))
        ));
    }

    #[test]
    fn test_response_version_defaults_to_absent() {
        let response = SignResponseWire {
            profile: DSS_PROFILE.to_owned(),
            in_response_to: "abc".into(),
            version: None,
            result: Some(ResultWire {
                major: RESULT_MAJOR_SUCCESS.to_owned(),
                minor: None,
                message: None,
            }),
            optional_outputs: None,
            signature: None,
        };

        let encoded = encode_sign_response(&response).unwrap();
        let decoded = decode_sign_response(&encoded).unwrap();

        assert_eq!(decoded.version, None);
        assert_eq!(response, decoded);
    }

    #[test]
    fn test_response_with_extension_round_trips() {
        let response_time = OffsetDateTime::from_unix_timestamp(1_700_000_060).unwrap();
        let response = SignResponseWire {
            profile: DSS_PROFILE.to_owned(),
            in_response_to: "d56bcd44-cf71-4a45-b0e9-b0cd4a0e0a3b".into(),
            version: Some("1.1".to_owned()),
            result: Some(ResultWire {
                major: RESULT_MAJOR_SUCCESS.to_owned(),
                minor: None,
                message: None,
            }),
            optional_outputs: Some(SignResponseExtensionWire {
                response_time: Some(response_time),
                echoed_request: Some(b"<SignRequest/>".to_vec()),
                signer_assertion_info: Some(SignerAssertionInfoWire {
                    assertion_id: Some("_a1".to_owned()),
                    authn_instant: Some(
                        OffsetDateTime::from_unix_timestamp(1_700_000_010).unwrap(),
                    ),
                    authn_context_class_ref: Some(
                        "http://id.elegnamnden.se/loa/1.0/loa3".to_owned(),
                    ),
                    identity_provider: Some("https://idp.example.com".to_owned()),
                    attributes: vec![SignerAttributeWire {
                        name: "urn:oid:1.2.752.29.4.13".to_owned(),
                        value: "191212121212".to_owned(),
                    }],
                    assertion: Some(b"<saml:Assertion/>".to_vec()),
                }),
                certificate_chain: Some(CertificateChainWire {
                    certificates: vec![Base64DerWire(vec![0x30, 0x82, 0x01])],
                }),
                sign_tasks: SignTasksWire {
                    tasks: vec![SignTaskDataWire {
                        task_id: Some("doc-1".into()),
                        sig_type: Some(SignatureType::Xml),
                        to_be_signed_bytes: Some(b"to-be-signed".to_vec()),
                        ades_type: AdesType::Bes,
                        ades_object: Some(AdesObjectWire {
                            signature_id: Some("sig-1".to_owned()),
                            cert_digest: Some(CertificateDigestWire {
                                method: DIGEST_SHA256.to_owned(),
                                value: vec![0xab; 32],
                            }),
                        }),
                        signature: Some(SignatureValueWire {
                            r#type: Some(ALGORITHM_RSA_SHA256.to_owned()),
                            value: b"signature-value".to_vec(),
                        }),
                    }],
                },
            }),
            signature: Some(b"response-signature".to_vec()),
        };

        let encoded = encode_sign_response(&response).unwrap();
        let decoded = decode_sign_response(&encoded).unwrap();

        assert_eq!(response, decoded);
        assert_eq!(
            decoded
                .optional_outputs
                .as_ref()
                .and_then(|outputs| outputs.response_time),
            Some(response_time)
        );
    }
}
