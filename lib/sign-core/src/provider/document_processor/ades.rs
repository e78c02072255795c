use sha2::{Digest, Sha256, Sha384, Sha512};

use super::DocumentProcessorError;
use crate::proto::dss::{AdesObjectWire, DIGEST_SHA256, DIGEST_SHA384, DIGEST_SHA512};

/// Recomputes the signing-certificate digest of an AdES object over the
/// signer certificate's DER encoding and compares it byte for byte against
/// the claimed value.
///
/// Every AdES-bearing signature must carry the certificate digest; its
/// absence is a document-processing failure, an unknown digest method is a
/// deployment defect.
pub fn validate_certificate_digest(
    ades_object: &AdesObjectWire,
    signer_certificate: &[u8],
) -> Result<(), DocumentProcessorError> {
    let digest = ades_object
        .cert_digest
        .as_ref()
        .ok_or(DocumentProcessorError::MissingCertificateDigest)?;

    let computed = match digest.method.as_str() {
        DIGEST_SHA256 => Sha256::digest(signer_certificate).to_vec(),
        DIGEST_SHA384 => Sha384::digest(signer_certificate).to_vec(),
        DIGEST_SHA512 => Sha512::digest(signer_certificate).to_vec(),
        other => {
            return Err(DocumentProcessorError::UnsupportedDigestMethod(
                other.to_owned(),
            ));
        }
    };

    if computed != digest.value {
        return Err(DocumentProcessorError::CertificateDigestMismatch);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use sha2::{Digest, Sha256, Sha384, Sha512};

    use super::*;
    use crate::proto::dss::CertificateDigestWire;

    const CERTIFICATE: &[u8] = b"certificate-der-bytes";

    fn ades_object(method: &str, value: Vec<u8>) -> AdesObjectWire {
        AdesObjectWire {
            signature_id: None,
            cert_digest: Some(CertificateDigestWire {
                method: method.to_owned(),
                value,
            }),
        }
    }

    #[rstest]
    #[case(DIGEST_SHA256, Sha256::digest(CERTIFICATE).to_vec())]
    #[case(DIGEST_SHA384, Sha384::digest(CERTIFICATE).to_vec())]
    #[case(DIGEST_SHA512, Sha512::digest(CERTIFICATE).to_vec())]
    fn test_matching_digest_validates(#[case] method: &str, #[case] value: Vec<u8>) {
        assert!(validate_certificate_digest(&ades_object(method, value), CERTIFICATE).is_ok());
    }

    #[test]
    fn test_flipped_digest_byte_rejected() {
        let mut value = Sha256::digest(CERTIFICATE).to_vec();
        value[3] ^= 0x01;

        assert_eq!(
            validate_certificate_digest(&ades_object(DIGEST_SHA256, value), CERTIFICATE),
            Err(DocumentProcessorError::CertificateDigestMismatch)
        );
    }

    #[test]
    fn test_unsupported_digest_method_is_internal() {
        let object = ades_object("http://www.w3.org/2001/04/xmldsig-more#md5", vec![0; 16]);

        assert_eq!(
            validate_certificate_digest(&object, CERTIFICATE),
            Err(DocumentProcessorError::UnsupportedDigestMethod(
                "http://www.w3.org/2001/04/xmldsig-more#md5".to_owned()
            ))
        );
    }

    #[test]
    fn test_missing_digest_object_rejected() {
        let object = AdesObjectWire {
            signature_id: None,
            cert_digest: None,
        };

        assert_eq!(
            validate_certificate_digest(&object, CERTIFICATE),
            Err(DocumentProcessorError::MissingCertificateDigest)
        );
    }
}
