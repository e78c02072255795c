use uuid::Uuid;

use crate::config::IntegrationServiceConfiguration;
use crate::model::request::{
    CertificateAttributeMapping, CertificateType, RequestedAttribute, SignRequestInput,
};

/// Fully-resolved request parameters: every field the caller left unset has
/// been filled in from the policy configuration.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ResolvedRequestParameters {
    pub correlation_id: String,
    pub sign_requester_id: String,
    pub return_url: String,
    pub destination_url: String,
    pub signature_algorithm: String,
    pub authn_service_id: String,
    pub authn_profile: Option<String>,
    pub authn_context_class_refs: Vec<String>,
    pub requested_signer_attributes: Vec<RequestedAttribute>,
    pub certificate_type: CertificateType,
    pub attribute_mappings: Vec<CertificateAttributeMapping>,
}

pub(super) fn resolve_defaults(
    input: &SignRequestInput,
    config: &IntegrationServiceConfiguration,
) -> ResolvedRequestParameters {
    let authn = &input.authn_requirements;

    let authn_context_class_refs = if authn.authn_context_class_refs.is_empty() {
        config.default_authn_context_class_refs.clone()
    } else {
        authn.authn_context_class_refs.clone()
    };

    let certificate_requirements = input.certificate_requirements.clone().unwrap_or_default();
    let attribute_mappings = if certificate_requirements.attribute_mappings.is_empty() {
        config.default_certificate_attribute_mappings.clone()
    } else {
        certificate_requirements.attribute_mappings
    };

    ResolvedRequestParameters {
        correlation_id: input
            .correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        sign_requester_id: input
            .sign_requester_id
            .clone()
            .unwrap_or_else(|| config.default_sign_requester_id.clone()),
        return_url: input
            .return_url
            .clone()
            .unwrap_or_else(|| config.default_return_url.clone()),
        destination_url: input
            .destination_url
            .clone()
            .unwrap_or_else(|| config.default_destination_url.clone()),
        signature_algorithm: input
            .signature_algorithm
            .clone()
            .unwrap_or_else(|| config.default_signature_algorithm.clone()),
        authn_service_id: authn
            .authn_service_id
            .clone()
            .unwrap_or_else(|| config.default_authn_service_id.clone()),
        authn_profile: authn.authn_profile.clone(),
        authn_context_class_refs,
        requested_signer_attributes: authn.requested_signer_attributes.clone(),
        certificate_type: certificate_requirements
            .certificate_type
            .unwrap_or(config.default_certificate_type),
        attribute_mappings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::request::{AuthnRequirements, CertificateRequirements};

    fn config() -> IntegrationServiceConfiguration {
        IntegrationServiceConfiguration {
            default_sign_requester_id: "https://requester.example.com".to_owned(),
            default_return_url: "https://requester.example.com/sign/return".to_owned(),
            default_destination_url: "https://signservice.example.com/request".to_owned(),
            sign_service_entity_id: "https://signservice.example.com".to_owned(),
            default_authn_service_id: "https://idp.example.com".to_owned(),
            default_authn_context_class_refs: vec![
                "http://id.elegnamnden.se/loa/1.0/loa3".to_owned(),
            ],
            ..IntegrationServiceConfiguration::for_policy("default".into())
        }
    }

    #[test]
    fn test_unset_fields_fall_back_to_configuration() {
        let resolved = resolve_defaults(&SignRequestInput::default(), &config());

        assert_eq!(resolved.sign_requester_id, "https://requester.example.com");
        assert_eq!(resolved.return_url, "https://requester.example.com/sign/return");
        assert_eq!(resolved.authn_service_id, "https://idp.example.com");
        assert_eq!(
            resolved.authn_context_class_refs,
            vec!["http://id.elegnamnden.se/loa/1.0/loa3".to_owned()]
        );
        assert_eq!(resolved.certificate_type, CertificateType::Pkc);
        assert!(!resolved.correlation_id.is_empty());
    }

    #[test]
    fn test_caller_supplied_fields_take_precedence() {
        let input = SignRequestInput {
            correlation_id: Some("case-4711".to_owned()),
            return_url: Some("https://other.example.com/return".to_owned()),
            authn_requirements: AuthnRequirements {
                authn_context_class_refs: vec![
                    "http://id.elegnamnden.se/loa/1.0/loa4".to_owned(),
                ],
                ..Default::default()
            },
            certificate_requirements: Some(CertificateRequirements {
                certificate_type: Some(CertificateType::QcSscd),
                attribute_mappings: vec![],
            }),
            ..Default::default()
        };

        let resolved = resolve_defaults(&input, &config());

        assert_eq!(resolved.correlation_id, "case-4711");
        assert_eq!(resolved.return_url, "https://other.example.com/return");
        assert_eq!(
            resolved.authn_context_class_refs,
            vec!["http://id.elegnamnden.se/loa/1.0/loa4".to_owned()]
        );
        assert_eq!(resolved.certificate_type, CertificateType::QcSscd);
    }

    #[test]
    fn test_generated_correlation_ids_are_unique() {
        let first = resolve_defaults(&SignRequestInput::default(), &config());
        let second = resolve_defaults(&SignRequestInput::default(), &config());

        assert_ne!(first.correlation_id, second.correlation_id);
    }
}
