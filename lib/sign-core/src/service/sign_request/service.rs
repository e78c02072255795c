use shared_types::{DocumentId, RequestId};
use time::OffsetDateTime;
use tracing::info;

use crate::model::request::{SignRequestInput, SignatureSessionState};
use crate::proto::dss::{
    self, CertRequestPropertiesWire, SignRequestExtensionWire, SignRequestWire, SignTasksWire,
    DSS_PROFILE,
};
use crate::proto::mapper as proto_mapper;
use crate::service::error::{InputValidationError, SignRequestError};

use super::{mapper, validator, BuiltSignRequest, SignRequestService};

impl SignRequestService {
    /// Builds a complete, signed and transport-encoded sign request from
    /// caller input, resolving every unset field from the policy
    /// configuration.
    pub fn create_sign_request(
        &self,
        input: SignRequestInput,
    ) -> Result<BuiltSignRequest, SignRequestError> {
        let policy = input
            .policy
            .clone()
            .unwrap_or_else(|| self.default_policy.clone());
        let config = self.configurations.get(&policy).ok_or_else(|| {
            InputValidationError::InvalidField {
                field: "policy".to_owned(),
                reason: format!("unknown policy `{policy}`"),
            }
        })?;

        validator::validate_input(&input)?;

        let resolved = mapper::resolve_defaults(&input, config);
        let version = proto_mapper::required_protocol_version(
            &resolved.authn_context_class_refs,
            resolved.authn_profile.as_deref(),
        );

        let SignRequestInput {
            sign_message_parameters,
            tbs_documents,
            ..
        } = input;

        let mut pre_processed = Vec::with_capacity(tbs_documents.len());
        for (index, mut document) in tbs_documents.into_iter().enumerate() {
            let field = format!("tbsDocuments[{index}]");

            if document.id.is_none() {
                document.id = Some(DocumentId::generate());
            }

            let processor = self.processor_provider.tbs_processor(&document).ok_or_else(
                || InputValidationError::NoMatchingProcessor {
                    field: field.clone(),
                },
            )?;
            let document =
                processor.pre_process(document, config, &resolved.sign_requester_id, &field)?;
            pre_processed.push((processor, document));
        }

        let mut tasks = Vec::with_capacity(pre_processed.len());
        for (processor, document) in &pre_processed {
            let task = processor
                .process(document, &resolved.signature_algorithm, config)
                .map_err(|source| SignRequestError::DocumentProcessing {
                    document_id: document.id.clone(),
                    source,
                })?;
            tasks.push(task);
        }

        let request_time = OffsetDateTime::now_utc();

        let extension = SignRequestExtensionWire {
            request_time,
            conditions: proto_mapper::build_conditions(
                request_time,
                &config.conditions_window,
                &resolved.return_url,
            ),
            signer_attributes: proto_mapper::requested_attributes_to_wire(
                &resolved.requested_signer_attributes,
            ),
            identity_provider: resolved.authn_service_id.clone(),
            authn_profile: resolved.authn_profile.clone(),
            authn_context_class_refs: resolved.authn_context_class_refs.clone(),
            sign_requester: resolved.sign_requester_id.clone(),
            sign_service: config.sign_service_entity_id.clone(),
            requested_signature_algorithm: resolved.signature_algorithm.clone(),
            cert_request_properties: CertRequestPropertiesWire {
                certificate_type: resolved.certificate_type.to_string(),
                attribute_mappings: proto_mapper::attribute_mappings_to_wire(
                    &resolved.attribute_mappings,
                ),
            },
            sign_message: sign_message_parameters
                .as_ref()
                .map(|parameters| {
                    proto_mapper::build_sign_message(parameters, &resolved.authn_service_id)
                }),
            sign_tasks: SignTasksWire { tasks },
        };

        let mut request = SignRequestWire {
            profile: DSS_PROFILE.to_owned(),
            request_id: RequestId::generate(),
            version: Some(version.to_string()),
            optional_inputs: extension,
            signature: None,
        };

        let signing_input = dss::request_signing_input(&request)?;
        let signature = self
            .signer
            .sign(&signing_input)
            .map_err(SignRequestError::Signing)?;
        request.signature = Some(signature);

        let encoded_request = dss::encode_sign_request(&request)?;

        info!(
            request_id = %request.request_id,
            %policy,
            documents = pre_processed.len(),
            "sign request built"
        );

        Ok(BuiltSignRequest {
            session_state: SignatureSessionState {
                correlation_id: resolved.correlation_id,
                sign_request: request,
                tbs_documents: pre_processed
                    .into_iter()
                    .map(|(_, document)| document.document)
                    .collect(),
                request_time,
            },
            encoded_request,
            destination_url: resolved.destination_url,
        })
    }
}
