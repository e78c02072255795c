use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;
use serde_with::DurationSeconds;
use shared_types::PolicyId;
use thiserror::Error;
use time::Duration;

use crate::model::request::{CertificateAttributeMapping, CertificateType};
use crate::proto::dss::ALGORITHM_RSA_SHA256;

#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("configuration field `{0}` must not be empty")]
    EmptyField(&'static str),
    #[error("configuration duration `{0}` must be positive")]
    NonPositiveDuration(&'static str),
    #[error("policy `{0}` configures no trust anchors")]
    NoTrustAnchors(PolicyId),
    #[error("default policy `{0}` has no configuration")]
    UnknownDefaultPolicy(PolicyId),
}

/// Thresholds applied while validating a sign response.
///
/// Clock skew is applied only where the remote clock is in question; the
/// processing-time bound compares two local timestamps.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseProcessingConfig {
    /// Oldest acceptable response, measured from its declared response time.
    #[serde_as(as = "DurationSeconds<i64>")]
    pub max_response_age: Duration,
    /// Tolerated difference between the remote clock and ours.
    #[serde_as(as = "DurationSeconds<i64>")]
    pub allowed_clock_skew: Duration,
    /// Longest acceptable span between issuing the request and now.
    #[serde_as(as = "DurationSeconds<i64>")]
    pub max_processing_time: Duration,
    /// When set, a response missing the echoed request is rejected instead
    /// of logged.
    pub strict_processing: bool,
}

impl Default for ResponseProcessingConfig {
    fn default() -> Self {
        Self {
            max_response_age: Duration::minutes(3),
            allowed_clock_skew: Duration::seconds(60),
            max_processing_time: Duration::minutes(10),
            strict_processing: false,
        }
    }
}

/// Validity window stamped into the conditions element of outgoing requests.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionsWindowConfig {
    #[serde_as(as = "DurationSeconds<i64>")]
    pub not_before_offset: Duration,
    #[serde_as(as = "DurationSeconds<i64>")]
    pub not_after_offset: Duration,
}

impl Default for ConditionsWindowConfig {
    fn default() -> Self {
        Self {
            not_before_offset: Duration::minutes(1),
            not_after_offset: Duration::minutes(5),
        }
    }
}

/// Per-policy configuration of the integration service. Loading (file, env)
/// happens outside this crate; the shape is serde-compatible so hosts can
/// deserialize it from whatever source they use.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationServiceConfiguration {
    pub policy: PolicyId,
    pub default_sign_requester_id: String,
    pub default_return_url: String,
    pub default_destination_url: String,
    pub sign_service_entity_id: String,
    pub default_authn_service_id: String,
    pub default_authn_context_class_refs: Vec<String>,
    pub default_signature_algorithm: String,
    pub default_certificate_type: CertificateType,
    #[serde(default)]
    pub default_certificate_attribute_mappings: Vec<CertificateAttributeMapping>,
    /// DER-encoded trust anchor certificates for signer certificate
    /// validation under this policy.
    #[serde_as(as = "Vec<Base64>")]
    pub trust_anchors: Vec<Vec<u8>>,
    /// DER-encoded certificates the signing service signs its responses
    /// with.
    #[serde_as(as = "Vec<Base64>")]
    pub sign_service_certificates: Vec<Vec<u8>>,
    #[serde(default)]
    pub response_processing: ResponseProcessingConfig,
    #[serde(default)]
    pub conditions_window: ConditionsWindowConfig,
}

impl IntegrationServiceConfiguration {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.default_sign_requester_id.is_empty() {
            return Err(ConfigValidationError::EmptyField("default_sign_requester_id"));
        }
        if self.default_return_url.is_empty() {
            return Err(ConfigValidationError::EmptyField("default_return_url"));
        }
        if self.default_destination_url.is_empty() {
            return Err(ConfigValidationError::EmptyField("default_destination_url"));
        }
        if self.sign_service_entity_id.is_empty() {
            return Err(ConfigValidationError::EmptyField("sign_service_entity_id"));
        }
        if self.default_authn_service_id.is_empty() {
            return Err(ConfigValidationError::EmptyField("default_authn_service_id"));
        }
        if self.default_authn_context_class_refs.is_empty() {
            return Err(ConfigValidationError::EmptyField(
                "default_authn_context_class_refs",
            ));
        }
        if self.default_signature_algorithm.is_empty() {
            return Err(ConfigValidationError::EmptyField("default_signature_algorithm"));
        }
        if self.trust_anchors.is_empty() {
            return Err(ConfigValidationError::NoTrustAnchors(self.policy.clone()));
        }

        let processing = &self.response_processing;
        if !processing.max_response_age.is_positive() {
            return Err(ConfigValidationError::NonPositiveDuration("max_response_age"));
        }
        if processing.allowed_clock_skew.is_negative() {
            return Err(ConfigValidationError::NonPositiveDuration("allowed_clock_skew"));
        }
        if !processing.max_processing_time.is_positive() {
            return Err(ConfigValidationError::NonPositiveDuration("max_processing_time"));
        }

        Ok(())
    }
}

impl IntegrationServiceConfiguration {
    /// Configuration with illustrative defaults, handy for tests and as a
    /// starting point for hosts.
    pub fn for_policy(policy: PolicyId) -> Self {
        Self {
            policy,
            default_sign_requester_id: String::new(),
            default_return_url: String::new(),
            default_destination_url: String::new(),
            sign_service_entity_id: String::new(),
            default_authn_service_id: String::new(),
            default_authn_context_class_refs: vec![],
            default_signature_algorithm: ALGORITHM_RSA_SHA256.to_owned(),
            default_certificate_type: CertificateType::Pkc,
            default_certificate_attribute_mappings: vec![],
            trust_anchors: vec![],
            sign_service_certificates: vec![],
            response_processing: ResponseProcessingConfig::default(),
            conditions_window: ConditionsWindowConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> IntegrationServiceConfiguration {
        IntegrationServiceConfiguration {
            default_sign_requester_id: "https://requester.example.com".to_owned(),
            default_return_url: "https://requester.example.com/sign/return".to_owned(),
            default_destination_url: "https://signservice.example.com/request".to_owned(),
            sign_service_entity_id: "https://signservice.example.com".to_owned(),
            default_authn_service_id: "https://idp.example.com".to_owned(),
            default_authn_context_class_refs: vec![
                "http://id.elegnamnden.se/loa/1.0/loa3".to_owned(),
            ],
            trust_anchors: vec![vec![0x30, 0x82]],
            ..IntegrationServiceConfiguration::for_policy("default".into())
        }
    }

    #[test]
    fn test_valid_configuration_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_trust_anchors_rejected() {
        let mut config = valid_config();
        config.trust_anchors.clear();

        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::NoTrustAnchors(_))
        ));
    }

    #[test]
    fn test_non_positive_threshold_rejected() {
        let mut config = valid_config();
        config.response_processing.max_response_age = Duration::seconds(0);

        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::NonPositiveDuration("max_response_age"))
        ));
    }
}
