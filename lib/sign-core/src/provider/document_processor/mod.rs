use shared_types::DocumentId;
use thiserror::Error;

use crate::config::IntegrationServiceConfiguration;
use crate::model::document::{SignedDocument, TbsDocument};
use crate::proto::dss::{AdesObjectWire, SignTaskDataWire};
use crate::service::error::InputValidationError;

pub mod ades;
pub mod pdf;
pub mod provider;
pub mod xml;

use crate::provider::document_cache::{DocumentCache, DocumentCacheError};

/// Resolves the mutually-exclusive content/content-reference pair into
/// in-line content, consuming a cached reference on behalf of
/// `requester_id`.
pub(crate) fn resolve_content(
    document: &mut TbsDocument,
    cache: &dyn DocumentCache,
    requester_id: &str,
    field_name: &str,
) -> Result<(), InputValidationError> {
    match (&document.content, &document.content_reference) {
        (Some(_), Some(_)) => Err(InputValidationError::InvalidField {
            field: field_name.to_owned(),
            reason: "content and content reference are mutually exclusive".to_owned(),
        }),
        (None, None) => Err(InputValidationError::MissingField {
            field: format!("{field_name}.content"),
        }),
        (Some(_), None) => Ok(()),
        (None, Some(reference)) => {
            let content = cache.get(reference, requester_id).map_err(|error| match error {
                DocumentCacheError::NoAccess(_) => InputValidationError::NoAccess {
                    field: field_name.to_owned(),
                    source: error,
                },
                DocumentCacheError::NotFound(_) => InputValidationError::InvalidField {
                    field: field_name.to_owned(),
                    reason: "unknown document reference".to_owned(),
                },
            })?;
            document.content = Some(content);
            document.content_reference = None;
            Ok(())
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentProcessorError {
    #[error("document processing failed: {0}")]
    Processing(String),
    #[error("embedded signature validation failed: {0}")]
    SignatureValidation(String),
    #[error("AdES object carries no signing-certificate digest")]
    MissingCertificateDigest,
    #[error("AdES certificate digest does not match the signer certificate")]
    CertificateDigestMismatch,
    /// Deployment misconfiguration, not a property of the response.
    #[error("unsupported digest method `{0}`")]
    UnsupportedDigestMethod(String),
}

/// Low-level signature codec for one document format (CMS for PDF, XML-dsig
/// for XML). Concrete encoders live outside this crate.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait DocumentCodec: Send + Sync {
    /// Produces the to-be-signed byte string for `content` under
    /// `algorithm`.
    fn to_be_signed(&self, content: &[u8], algorithm: &str)
        -> Result<Vec<u8>, DocumentProcessorError>;

    /// Embeds `signature` and the signer `chain` into `content`, returning
    /// the complete signed document.
    fn embed_signature(
        &self,
        content: &[u8],
        signature: &[u8],
        chain: &[Vec<u8>],
    ) -> Result<Vec<u8>, DocumentProcessorError>;

    /// Verifies the embedded signature of `signed` against the signer
    /// certificate.
    fn verify_signature(
        &self,
        signed: &[u8],
        signer_certificate: &[u8],
    ) -> Result<(), DocumentProcessorError>;
}

/// Parse artifacts produced during pre-processing. Carried next to the
/// document, never inside it, so session state stays free of decoded
/// payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedDocumentContent {
    Pdf { version: String },
    Xml { root_element: String },
}

/// A document that passed type-specific pre-processing: id assigned,
/// content resolved, structure checked.
#[derive(Debug, Clone, PartialEq)]
pub struct PreProcessedTbsDocument {
    pub id: DocumentId,
    pub document: TbsDocument,
    pub decoded: Option<DecodedDocumentContent>,
}

/// Prepares one document type for signing. Selected from a deterministic
/// list by the first matching `supports` predicate.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait TbsDocumentProcessor: Send + Sync {
    fn supports(&self, document: &TbsDocument) -> bool;

    /// Validates and decodes `document`, resolving a content reference
    /// through the document cache on behalf of `requester_id`. Errors name
    /// `field_name` so callers can surface the offending input field.
    fn pre_process(
        &self,
        document: TbsDocument,
        config: &IntegrationServiceConfiguration,
        requester_id: &str,
        field_name: &str,
    ) -> Result<PreProcessedTbsDocument, InputValidationError>;

    /// Produces the wire sign task carrying the to-be-signed bytes and AdES
    /// scaffolding for `document`.
    fn process(
        &self,
        document: &PreProcessedTbsDocument,
        algorithm: &str,
        config: &IntegrationServiceConfiguration,
    ) -> Result<SignTaskDataWire, DocumentProcessorError>;
}

/// Compiles and validates one signed document type out of a completed sign
/// task.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait SignedDocumentProcessor: Send + Sync {
    fn supports(&self, sign_task: &SignTaskDataWire) -> bool;

    /// Builds the complete signed document from the original document, the
    /// produced signature and the signer certificate chain.
    fn build_signed_document(
        &self,
        tbs_document: &TbsDocument,
        sign_task: &SignTaskDataWire,
        certificate_chain: &[Vec<u8>],
    ) -> Result<SignedDocument, DocumentProcessorError>;

    /// Validates the embedded signature against the signer certificate.
    fn validate_signed_document(
        &self,
        signed_document: &SignedDocument,
        signer_certificate: &[u8],
    ) -> Result<(), DocumentProcessorError>;

    /// Validates the AdES object delivered with the sign task against the
    /// signer certificate.
    fn validate_ades_object(
        &self,
        ades_object: &AdesObjectWire,
        signer_certificate: &[u8],
    ) -> Result<(), DocumentProcessorError>;
}
