//! Conversions from caller-facing request models into wire shapes.

use time::OffsetDateTime;

use crate::config::ConditionsWindowConfig;
use crate::model::request::{
    CertificateAttributeMapping, RequestedAttribute, SignMessageParameters,
};
use crate::proto::dss::{
    AttributeMappingWire, ConditionsWire, RequestedAttributeWire, SignMessageWire,
    SignerAttributesWire,
};
use crate::proto::version::ProtocolVersion;

pub fn requested_attributes_to_wire(
    attributes: &[RequestedAttribute],
) -> Option<SignerAttributesWire> {
    if attributes.is_empty() {
        return None;
    }

    Some(SignerAttributesWire {
        attributes: attributes
            .iter()
            .map(|attribute| RequestedAttributeWire {
                name: attribute.name.clone(),
                value: attribute.value.clone(),
                required: attribute.required,
            })
            .collect(),
    })
}

pub fn attribute_mappings_to_wire(
    mappings: &[CertificateAttributeMapping],
) -> Vec<AttributeMappingWire> {
    mappings
        .iter()
        .map(|mapping| AttributeMappingWire {
            saml_attribute_names: mapping.saml_attribute_names.clone(),
            certificate_attribute: mapping.certificate_attribute.clone(),
            required: mapping.required,
            default_value: mapping.default_value.clone(),
        })
        .collect()
}

/// Conditions window anchored at `request_time`, restricted to the return
/// URL the response must be delivered to.
pub fn build_conditions(
    request_time: OffsetDateTime,
    window: &ConditionsWindowConfig,
    return_url: &str,
) -> ConditionsWire {
    ConditionsWire {
        not_before: request_time - window.not_before_offset,
        not_on_or_after: request_time + window.not_after_offset,
        audience: return_url.to_owned(),
    }
}

/// When encryption is requested without a display entity, the message is
/// addressed to the authentication service.
pub fn build_sign_message(
    parameters: &SignMessageParameters,
    authn_service_id: &str,
) -> SignMessageWire {
    let display_entity = match (&parameters.display_entity, parameters.perform_encryption) {
        (Some(entity), _) => Some(entity.clone()),
        (None, true) => Some(authn_service_id.to_owned()),
        (None, false) => None,
    };

    SignMessageWire {
        must_show: parameters.must_show.unwrap_or(false),
        encrypted: parameters.perform_encryption,
        mime_type: parameters.mime_type.unwrap_or_default().as_str().to_owned(),
        display_entity,
        message: parameters.message.clone(),
    }
}

/// Lowest protocol version able to express the resolved authentication
/// requirements. Multiple context class references and the authentication
/// profile both need 1.4. Expects the values after default resolution, so
/// configuration-supplied defaults count.
pub fn required_protocol_version(
    authn_context_class_refs: &[String],
    authn_profile: Option<&str>,
) -> ProtocolVersion {
    if authn_context_class_refs.len() > 1 || authn_profile.is_some() {
        ProtocolVersion::v1_4()
    } else {
        ProtocolVersion::base()
    }
}
