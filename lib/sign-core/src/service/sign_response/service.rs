use shared_types::{DocumentId, RequestId};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::model::document::SignedDocument;
use crate::model::request::SignatureSessionState;
use crate::model::result::SignatureResult;
use crate::proto::dss::{self, AdesType, DSS_PROFILE};
use crate::provider::document_processor::DocumentProcessorError;
use crate::service::error::{ProtocolError, ResponseValidationError, SignResponseError};

use super::{validator, SignResponseProcessingParameters, SignResponseService};

impl SignResponseService {
    /// Validates a transport-encoded sign response against the session it
    /// answers and compiles the signed documents.
    ///
    /// Stages run strictly in order and the first failure terminates
    /// processing; no partial results are ever returned.
    pub async fn process_sign_response(
        &self,
        encoded_response: &str,
        session: SignatureSessionState,
        parameters: SignResponseProcessingParameters,
    ) -> Result<SignatureResult, SignResponseError> {
        let request_id = session.sign_request.request_id.clone();

        let policy = parameters
            .policy
            .clone()
            .unwrap_or_else(|| self.default_policy.clone());
        let config = self.configurations.get(&policy).ok_or_else(|| {
            SignResponseError::Internal {
                request_id: request_id.clone(),
                reason: format!("unknown policy `{policy}`"),
            }
        })?;
        let thresholds = validator::resolve_thresholds(&config.response_processing, &parameters);

        let response = dss::decode_sign_response(encoded_response)
            .map_err(|error| protocol(&request_id, error.into()))?;

        if response.profile != DSS_PROFILE {
            return Err(protocol(
                &request_id,
                ProtocolError::ProfileMismatch {
                    expected: DSS_PROFILE.to_owned(),
                    found: response.profile.clone(),
                },
            ));
        }

        let response_signature = response.signature.as_deref().ok_or_else(|| {
            protocol(
                &request_id,
                ProtocolError::InvalidResponse("response is not signed".to_owned()),
            )
        })?;
        let signing_input =
            dss::response_signing_input(&response).map_err(|error| SignResponseError::Internal {
                request_id: request_id.clone(),
                reason: format!("failed to re-encode response for verification: {error}"),
            })?;
        self.signature_verifier
            .verify(
                &signing_input,
                response_signature,
                &config.sign_service_certificates,
            )
            .map_err(|error| SignResponseError::Validation {
                request_id: request_id.clone(),
                source: ResponseValidationError::Signature(error),
            })?;

        if response.in_response_to != request_id {
            return Err(protocol(
                &request_id,
                ProtocolError::MismatchedRequestId {
                    expected: request_id.clone(),
                    found: response.in_response_to.clone(),
                },
            ));
        }

        validator::validate_result(response.result.as_ref(), &request_id)?;

        validator::validate_version(&session.sign_request, &response)
            .map_err(|error| protocol(&request_id, error))?;

        let extension = response
            .optional_outputs
            .clone()
            .ok_or_else(|| protocol(&request_id, ProtocolError::MissingExtension))?;

        let response_time = extension
            .response_time
            .ok_or_else(|| protocol(&request_id, ProtocolError::MissingResponseTime))?;
        validator::validate_timing(
            response_time,
            session.request_time,
            OffsetDateTime::now_utc(),
            &thresholds,
        )
        .map_err(|error| protocol(&request_id, error))?;

        match &extension.echoed_request {
            Some(echoed) => {
                let sent =
                    dss::request_bytes(&session.sign_request).map_err(|error| {
                        SignResponseError::Internal {
                            request_id: request_id.clone(),
                            reason: format!("failed to re-encode stored request: {error}"),
                        }
                    })?;
                if *echoed != sent {
                    return Err(protocol(&request_id, ProtocolError::EchoedRequestMismatch));
                }
            }
            None if thresholds.strict_processing => {
                return Err(protocol(&request_id, ProtocolError::MissingEchoedRequest));
            }
            None => {
                warn!(%request_id, "response does not echo the sign request");
            }
        }

        let chain: Vec<Vec<u8>> = extension
            .certificate_chain
            .as_ref()
            .map(|chain| {
                chain
                    .certificates
                    .iter()
                    .map(|certificate| certificate.0.clone())
                    .collect()
            })
            .unwrap_or_default();
        let Some(signer_certificate) = chain.first().cloned() else {
            return Err(protocol(&request_id, ProtocolError::MissingCertificateChain));
        };
        self.validator_provider
            .get_validator(&policy)
            .validate(&signer_certificate, &chain[1..], &policy, &config.trust_anchors)
            .await
            .map_err(|error| SignResponseError::Validation {
                request_id: request_id.clone(),
                source: ResponseValidationError::InvalidSignerCertificate(error),
            })?;

        let signer_assertion_info = self
            .assertion_processor
            .process(extension.signer_assertion_info.clone())
            .await
            .map_err(|error| SignResponseError::Validation {
                request_id: request_id.clone(),
                source: ResponseValidationError::Assertion(error),
            })?;

        let tasks = &extension.sign_tasks.tasks;
        if tasks.len() != session.tbs_documents.len() {
            return Err(protocol(
                &request_id,
                ProtocolError::InvalidResponse(format!(
                    "expected {} sign tasks, got {}",
                    session.tbs_documents.len(),
                    tasks.len()
                )),
            ));
        }

        let requested_algorithm = &session
            .sign_request
            .optional_inputs
            .requested_signature_algorithm;

        let mut signed_documents: Vec<Option<SignedDocument>> =
            vec![None; session.tbs_documents.len()];
        for task in tasks {
            let task_id = task.task_id.clone().ok_or_else(|| {
                protocol(
                    &request_id,
                    ProtocolError::InvalidResponse("sign task carries no task id".to_owned()),
                )
            })?;
            let index = session
                .tbs_documents
                .iter()
                .position(|document| document.id.as_ref() == Some(&task_id))
                .ok_or_else(|| {
                    protocol(
                        &request_id,
                        ProtocolError::InvalidResponse(format!("unknown task id `{task_id}`")),
                    )
                })?;
            if signed_documents[index].is_some() {
                return Err(protocol(
                    &request_id,
                    ProtocolError::InvalidResponse(format!("duplicate task id `{task_id}`")),
                ));
            }

            if task.sig_type.is_none() {
                return Err(protocol(
                    &request_id,
                    ProtocolError::InvalidResponse(format!(
                        "sign task `{task_id}` declares no signature type"
                    )),
                ));
            }
            if task.to_be_signed_bytes.is_none() {
                return Err(protocol(
                    &request_id,
                    ProtocolError::InvalidResponse(format!(
                        "sign task `{task_id}` carries no to-be-signed bytes"
                    )),
                ));
            }

            let signature = task.signature.as_ref().ok_or_else(|| {
                protocol(
                    &request_id,
                    ProtocolError::InvalidResponse(format!(
                        "sign task `{task_id}` carries no signature"
                    )),
                )
            })?;
            if signature.value.is_empty() {
                return Err(protocol(
                    &request_id,
                    ProtocolError::InvalidResponse(format!(
                        "sign task `{task_id}` carries an empty signature value"
                    )),
                ));
            }
            if let Some(declared) = &signature.r#type {
                if declared != requested_algorithm {
                    return Err(protocol(
                        &request_id,
                        ProtocolError::InvalidResponse(format!(
                            "task `{task_id}` signed with `{declared}`, requested `{requested_algorithm}`"
                        )),
                    ));
                }
            }

            let processor = self.processor_provider.signed_processor(task).ok_or_else(|| {
                SignResponseError::Internal {
                    request_id: request_id.clone(),
                    reason: format!("no signed document processor for task `{task_id}`"),
                }
            })?;

            let document = &session.tbs_documents[index];
            let signed = processor
                .build_signed_document(document, task, &chain)
                .map_err(|error| document_error(&request_id, &task_id, error))?;
            processor
                .validate_signed_document(&signed, &signer_certificate)
                .map_err(|error| document_error(&request_id, &task_id, error))?;

            if let Some(ades_object) = &task.ades_object {
                processor
                    .validate_ades_object(ades_object, &signer_certificate)
                    .map_err(|error| document_error(&request_id, &task_id, error))?;
            } else if task.ades_type != AdesType::None {
                return Err(protocol(
                    &request_id,
                    ProtocolError::InvalidResponse(format!(
                        "task `{task_id}` declares an AdES signature without an AdES object"
                    )),
                ));
            }

            signed_documents[index] = Some(signed);
        }

        let signed_documents = signed_documents
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                protocol(
                    &request_id,
                    ProtocolError::InvalidResponse("sign task missing for a document".to_owned()),
                )
            })?;

        info!(
            %request_id,
            %policy,
            documents = signed_documents.len(),
            "sign response validated"
        );

        Ok(SignatureResult {
            id: request_id,
            correlation_id: session.correlation_id,
            signer_assertion_info,
            signed_documents,
        })
    }
}

fn protocol(request_id: &RequestId, source: ProtocolError) -> SignResponseError {
    SignResponseError::Protocol {
        request_id: request_id.clone(),
        source,
    }
}

/// Unknown digest methods are a deployment defect, everything else a
/// validation failure of the response.
fn document_error(
    request_id: &RequestId,
    task_id: &DocumentId,
    source: DocumentProcessorError,
) -> SignResponseError {
    match source {
        DocumentProcessorError::UnsupportedDigestMethod(method) => SignResponseError::Internal {
            request_id: request_id.clone(),
            reason: format!("unsupported digest method `{method}`"),
        },
        source => SignResponseError::Validation {
            request_id: request_id.clone(),
            source: ResponseValidationError::Document {
                task_id: task_id.clone(),
                source,
            },
        },
    }
}
