use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolSignatureError {
    #[error("signing failed: {0}")]
    Signing(String),
    #[error("signature verification failed: {0}")]
    Verification(String),
}

/// Signs the byte string of an outgoing request with the requester's
/// configured signing credential. The concrete XML-dsig engine lives
/// outside this crate.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait ProtocolSigner: Send + Sync {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, ProtocolSignatureError>;
}

/// Verifies the signature over an inbound response against the signing
/// service's configured certificates.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait ProtocolSignatureVerifier: Send + Sync {
    fn verify(
        &self,
        data: &[u8],
        signature: &[u8],
        trusted_certificates: &[Vec<u8>],
    ) -> Result<(), ProtocolSignatureError>;
}
