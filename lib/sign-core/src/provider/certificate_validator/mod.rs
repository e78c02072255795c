use async_trait::async_trait;
use shared_types::PolicyId;
use thiserror::Error;

pub mod provider;
pub mod x509;

#[derive(Debug, Error)]
pub enum CertificateValidationError {
    #[error("failed to decode certificate: {0}")]
    Decode(String),
    #[error("certificate is outside its validity period")]
    OutsideValidityPeriod,
    #[error("certificate chain contains a non-CA issuer")]
    NonCaIssuer,
    #[error("issuer certificate lacks the keyCertSign key usage")]
    MissingKeyCertSign,
    #[error("certificate signature could not be verified against its issuer")]
    SignatureInvalid,
    #[error("certificate chain does not terminate in a configured trust anchor")]
    UntrustedChain,
}

/// Validates a signer certificate against its delivered chain and the trust
/// anchors configured for a policy.
///
/// Implementations are shared, read-mostly objects and must be safe for
/// concurrent use across simultaneous response validations.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait CertificateValidator: Send + Sync {
    async fn validate(
        &self,
        leaf: &[u8],
        chain: &[Vec<u8>],
        policy: &PolicyId,
        trust_anchors: &[Vec<u8>],
    ) -> Result<(), CertificateValidationError>;
}
