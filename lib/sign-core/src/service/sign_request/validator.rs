use crate::model::document::AdesFormat;
use crate::model::request::SignRequestInput;
use crate::service::error::InputValidationError;

pub(super) fn validate_input(input: &SignRequestInput) -> Result<(), InputValidationError> {
    if input.tbs_documents.is_empty() {
        return Err(InputValidationError::MissingField {
            field: "tbsDocuments".to_owned(),
        });
    }

    for (index, document) in input.tbs_documents.iter().enumerate() {
        let field = format!("tbsDocuments[{index}]");

        if document.mime_type.is_empty() {
            return Err(InputValidationError::MissingField {
                field: format!("{field}.mimeType"),
            });
        }

        if let Some(requirement) = &document.ades_requirement {
            if requirement.format == AdesFormat::Epes && requirement.signature_policy.is_none() {
                return Err(InputValidationError::MissingField {
                    field: format!("{field}.adesRequirement.signaturePolicy"),
                });
            }
        }
    }

    if let Some(parameters) = &input.sign_message_parameters {
        if parameters.message.is_empty() {
            return Err(InputValidationError::MissingField {
                field: "signMessageParameters.message".to_owned(),
            });
        }
    }

    for (index, attribute) in input
        .authn_requirements
        .requested_signer_attributes
        .iter()
        .enumerate()
    {
        if attribute.name.is_empty() {
            return Err(InputValidationError::MissingField {
                field: format!("authnRequirements.requestedSignerAttributes[{index}].name"),
            });
        }
    }

    Ok(())
}
