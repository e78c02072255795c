use shared_types::{DocumentId, RequestId};
use thiserror::Error;

use crate::provider::assertion::AssertionProcessingError;
use crate::provider::certificate_validator::CertificateValidationError;
use crate::provider::document_cache::DocumentCacheError;
use crate::provider::document_processor::DocumentProcessorError;
use crate::provider::signer::ProtocolSignatureError;
use crate::proto::dss::DssEncodingError;

/// Rejection of caller input during sign request pre-processing. Every
/// variant names the offending field.
#[derive(Debug, Error)]
pub enum InputValidationError {
    #[error("missing required field `{field}`")]
    MissingField { field: String },
    #[error("invalid value in field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("no registered document processor supports field `{field}`")]
    NoMatchingProcessor { field: String },
    #[error("access to the document referenced by field `{field}` was denied")]
    NoAccess {
        field: String,
        #[source]
        source: DocumentCacheError,
    },
}

#[derive(Debug, Error)]
pub enum SignRequestError {
    #[error(transparent)]
    InputValidation(#[from] InputValidationError),
    #[error("failed to produce sign task for document `{document_id}`")]
    DocumentProcessing {
        document_id: DocumentId,
        #[source]
        source: DocumentProcessorError,
    },
    #[error("failed to encode sign request")]
    Encoding(#[from] DssEncodingError),
    #[error("failed to sign the request")]
    Signing(#[source] ProtocolSignatureError),
}

/// Malformed or logically inconsistent response content. Never retried.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("response could not be decoded: {0}")]
    Decoding(#[from] DssEncodingError),
    #[error("response declares profile `{found}`, expected `{expected}`")]
    ProfileMismatch { expected: String, found: String },
    #[error("response answers request `{found}`, expected `{expected}`")]
    MismatchedRequestId { expected: RequestId, found: RequestId },
    #[error("response carries no result element")]
    MissingResult,
    #[error("response version `{response}` does not match request version `{request}`")]
    VersionMismatch { request: String, response: String },
    #[error("response carries no extension block")]
    MissingExtension,
    #[error("response carries no response time")]
    MissingResponseTime,
    #[error("response is stale: issued {age_seconds}s ago, allowed {allowed_seconds}s")]
    StaleResponse {
        age_seconds: i64,
        allowed_seconds: i64,
    },
    #[error("response time lies in the future")]
    NotYetValid,
    #[error("signing service took too long: {elapsed_seconds}s, allowed {allowed_seconds}s")]
    ProcessingTimeExceeded {
        elapsed_seconds: i64,
        allowed_seconds: i64,
    },
    #[error("response does not echo the sign request")]
    MissingEchoedRequest,
    #[error("echoed request differs from the request that was sent")]
    EchoedRequestMismatch,
    #[error("response carries no signer certificate chain")]
    MissingCertificateChain,
    #[error("signer certificate chain could not be decoded: {0}")]
    InvalidCertificateChain(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Security-relevant validation failures. These always fail closed.
#[derive(Debug, Error)]
pub enum ResponseValidationError {
    #[error("response signature verification failed")]
    Signature(#[source] ProtocolSignatureError),
    #[error("signer certificate validation failed")]
    InvalidSignerCertificate(#[source] CertificateValidationError),
    #[error("signed document validation failed for task `{task_id}`")]
    Document {
        task_id: DocumentId,
        #[source]
        source: DocumentProcessorError,
    },
    #[error("signer assertion processing failed")]
    Assertion(#[source] AssertionProcessingError),
}

#[derive(Debug, Error)]
pub enum SignResponseError {
    /// The signer abandoned the operation. Expected outcome, not a defect.
    #[error("signer cancelled the signature operation (request `{request_id}`)")]
    Cancelled {
        request_id: RequestId,
        message: Option<String>,
    },
    /// The signing service reported an error status of its own.
    #[error("signing service reported `{major}` for request `{request_id}`")]
    RemoteError {
        request_id: RequestId,
        major: String,
        minor: Option<String>,
        message: Option<String>,
    },
    #[error("protocol violation in response to request `{request_id}`")]
    Protocol {
        request_id: RequestId,
        #[source]
        source: ProtocolError,
    },
    /// Operator-fixable defect (missing processor, broken policy mapping),
    /// surfaced distinctly from caller-facing errors.
    #[error("internal configuration error while processing request `{request_id}`: {reason}")]
    Internal {
        request_id: RequestId,
        reason: String,
    },
    #[error("validation failure in response to request `{request_id}`")]
    Validation {
        request_id: RequestId,
        #[source]
        source: ResponseValidationError,
    },
}

impl SignResponseError {
    pub fn request_id(&self) -> &RequestId {
        match self {
            Self::Cancelled { request_id, .. }
            | Self::RemoteError { request_id, .. }
            | Self::Protocol { request_id, .. }
            | Self::Internal { request_id, .. }
            | Self::Validation { request_id, .. } => request_id,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Cancelled { .. } => ErrorCode::UserCancel,
            Self::RemoteError { .. } => ErrorCode::RemoteError,
            Self::Protocol { source, .. } => match source {
                ProtocolError::MismatchedRequestId { .. } => ErrorCode::MismatchId,
                ProtocolError::VersionMismatch { .. } => ErrorCode::Version,
                ProtocolError::InvalidResponse(_) => ErrorCode::InvalidResponse,
                _ => ErrorCode::Protocol,
            },
            Self::Internal { .. } => ErrorCode::Internal,
            Self::Validation { source, .. } => match source {
                ResponseValidationError::Signature(_) => ErrorCode::Signature,
                ResponseValidationError::InvalidSignerCertificate(_) => {
                    ErrorCode::InvalidSignerCert
                }
                ResponseValidationError::Document { .. } => ErrorCode::DocumentProcessing,
                ResponseValidationError::Assertion(_) => ErrorCode::InvalidAssertion,
            },
        }
    }
}

/// Machine-readable error codes accompanying every fatal condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    UserCancel,
    RemoteError,
    Protocol,
    MismatchId,
    Version,
    InvalidResponse,
    Signature,
    InvalidSignerCert,
    DocumentProcessing,
    InvalidAssertion,
    Internal,
}

impl ErrorCode {
    pub const fn code(&self) -> &'static str {
        match self {
            ErrorCode::UserCancel => "user-cancel",
            ErrorCode::RemoteError => "remote-error",
            ErrorCode::Protocol => "protocol",
            ErrorCode::MismatchId => "mismatch-id",
            ErrorCode::Version => "version",
            ErrorCode::InvalidResponse => "invalid-response",
            ErrorCode::Signature => "signature",
            ErrorCode::InvalidSignerCert => "invalid-signercert",
            ErrorCode::DocumentProcessing => "document-processing",
            ErrorCode::InvalidAssertion => "invalid-assertion",
            ErrorCode::Internal => "internal",
        }
    }

    pub const fn msg(&self) -> &'static str {
        match self {
            ErrorCode::UserCancel => "Signer cancelled the operation",
            ErrorCode::RemoteError => "Signing service reported an error",
            ErrorCode::Protocol => "Response violates the protocol",
            ErrorCode::MismatchId => "Response does not match the outstanding request",
            ErrorCode::Version => "Response protocol version mismatch",
            ErrorCode::InvalidResponse => "Response content is invalid",
            ErrorCode::Signature => "Response signature could not be verified",
            ErrorCode::InvalidSignerCert => "Signer certificate failed validation",
            ErrorCode::DocumentProcessing => "Signed document failed validation",
            ErrorCode::InvalidAssertion => "Signer assertion failed validation",
            ErrorCode::Internal => "Internal configuration error",
        }
    }
}
