use async_trait::async_trait;
use thiserror::Error;

use crate::model::result::{SignerAssertionInfo, SignerAttribute};
use crate::proto::dss::SignerAssertionInfoWire;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssertionProcessingError {
    #[error("response carries no signer assertion info")]
    MissingAssertion,
    #[error("signer assertion info carries no `{0}`")]
    MissingField(&'static str),
    #[error("signer assertion rejected: {0}")]
    Invalid(String),
}

/// Extracts and validates the signer assertion info delivered with a sign
/// response. Deployments that verify the raw SAML assertion plug in their
/// own implementation.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait SignerAssertionInfoProcessor: Send + Sync {
    async fn process(
        &self,
        assertion_info: Option<SignerAssertionInfoWire>,
    ) -> Result<SignerAssertionInfo, AssertionProcessingError>;
}

/// Field-presence validation only; trusts the signed response envelope for
/// authenticity.
pub struct DefaultSignerAssertionInfoProcessor;

#[async_trait]
impl SignerAssertionInfoProcessor for DefaultSignerAssertionInfoProcessor {
    async fn process(
        &self,
        assertion_info: Option<SignerAssertionInfoWire>,
    ) -> Result<SignerAssertionInfo, AssertionProcessingError> {
        let wire = assertion_info.ok_or(AssertionProcessingError::MissingAssertion)?;

        let assertion_id = wire
            .assertion_id
            .ok_or(AssertionProcessingError::MissingField("assertion id"))?;
        let authn_instant = wire
            .authn_instant
            .ok_or(AssertionProcessingError::MissingField("authn instant"))?;
        let authn_context_class_ref = wire
            .authn_context_class_ref
            .ok_or(AssertionProcessingError::MissingField("authn context class ref"))?;
        let identity_provider = wire
            .identity_provider
            .ok_or(AssertionProcessingError::MissingField("identity provider"))?;
        let assertion = wire
            .assertion
            .ok_or(AssertionProcessingError::MissingField("assertion"))?;

        Ok(SignerAssertionInfo {
            assertion_id,
            authn_instant,
            authn_context_class_ref,
            identity_provider,
            attributes: wire
                .attributes
                .into_iter()
                .map(|attribute| SignerAttribute {
                    name: attribute.name,
                    value: attribute.value,
                })
                .collect(),
            assertion,
        })
    }
}
