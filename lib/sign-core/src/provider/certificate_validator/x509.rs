use async_trait::async_trait;
use shared_types::PolicyId;
use x509_parser::prelude::{FromDer, X509Certificate};

use super::{CertificateValidationError, CertificateValidator};

/// Default validator: walks the delivered chain leaf-first, requiring every
/// issuer to be a CA with keyCertSign, every certificate to be within its
/// validity period and correctly signed by its parent, and the terminal
/// certificate to be (or be issued by) a configured trust anchor.
pub struct X509CertificateValidator;

#[async_trait]
impl CertificateValidator for X509CertificateValidator {
    async fn validate(
        &self,
        leaf: &[u8],
        chain: &[Vec<u8>],
        policy: &PolicyId,
        trust_anchors: &[Vec<u8>],
    ) -> Result<(), CertificateValidationError> {
        let leaf_cert = parse(leaf)?;
        let intermediates = chain
            .iter()
            .map(|der| parse(der))
            .collect::<Result<Vec<_>, _>>()?;
        let anchors = trust_anchors
            .iter()
            .map(|der| parse(der))
            .collect::<Result<Vec<_>, _>>()?;

        if !leaf_cert.validity().is_valid() {
            return Err(CertificateValidationError::OutsideValidityPeriod);
        }

        let mut current = &leaf_cert;
        for issuer in &intermediates {
            if !issuer.validity().is_valid() {
                return Err(CertificateValidationError::OutsideValidityPeriod);
            }
            validate_ca(issuer)?;
            current
                .verify_signature(Some(issuer.public_key()))
                .map_err(|_| CertificateValidationError::SignatureInvalid)?;
            current = issuer;
        }

        let terminal_der = chain.last().map(Vec::as_slice).unwrap_or(leaf);
        let anchored = trust_anchors
            .iter()
            .any(|anchor| anchor.as_slice() == terminal_der)
            || anchors.iter().any(|anchor| {
                anchor.subject() == current.issuer()
                    && current.verify_signature(Some(anchor.public_key())).is_ok()
            });

        if !anchored {
            tracing::debug!(
                "signer certificate chain for policy `{policy}` did not reach a trust anchor"
            );
            return Err(CertificateValidationError::UntrustedChain);
        }

        Ok(())
    }
}

fn parse(der: &[u8]) -> Result<X509Certificate<'_>, CertificateValidationError> {
    X509Certificate::from_der(der)
        .map(|(_, certificate)| certificate)
        .map_err(|error| CertificateValidationError::Decode(error.to_string()))
}

/// Issuers must carry the BasicConstraints CA flag and, when a KeyUsage
/// extension is present, the keyCertSign usage.
fn validate_ca(certificate: &X509Certificate) -> Result<(), CertificateValidationError> {
    if !certificate.is_ca() {
        return Err(CertificateValidationError::NonCaIssuer);
    }

    match certificate.key_usage() {
        Ok(Some(usage)) if !usage.value.key_cert_sign() => {
            Err(CertificateValidationError::MissingKeyCertSign)
        }
        _ => Ok(()),
    }
}
