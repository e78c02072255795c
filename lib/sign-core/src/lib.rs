//! Requester-side integration with a central signing service speaking the
//! DSS-extension protocol.
//!
//! The crate builds signed sign requests from caller input and validates the
//! responses delivered for them, compiling the signed documents only after
//! every protocol and security check has passed. Cryptographic engines
//! (XML-dsig, CMS), document caches and assertion verification plug in
//! through the provider traits under [`provider`].

#![cfg_attr(feature = "strict", deny(warnings))]

use std::collections::HashMap;
use std::sync::Arc;

use shared_types::PolicyId;

use config::{ConfigValidationError, IntegrationServiceConfiguration};
use provider::assertion::SignerAssertionInfoProcessor;
use provider::certificate_validator::provider::CertificateValidatorProvider;
use provider::document_processor::provider::DocumentProcessorProvider;
use provider::signer::{ProtocolSigner, ProtocolSignatureVerifier};
use service::sign_request::SignRequestService;
use service::sign_response::SignResponseService;

pub mod config;
pub mod model;
pub mod proto;
pub mod provider;
pub mod service;

/// Entry point wiring the configured policies and providers into the two
/// services of the integration.
pub struct SignIntegrationCore {
    pub sign_request_service: SignRequestService,
    pub sign_response_service: SignResponseService,
}

impl SignIntegrationCore {
    /// Validates every policy configuration and wires up the services.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        configurations: HashMap<PolicyId, IntegrationServiceConfiguration>,
        default_policy: PolicyId,
        processor_provider: Arc<dyn DocumentProcessorProvider>,
        validator_provider: Arc<dyn CertificateValidatorProvider>,
        assertion_processor: Arc<dyn SignerAssertionInfoProcessor>,
        signer: Arc<dyn ProtocolSigner>,
        signature_verifier: Arc<dyn ProtocolSignatureVerifier>,
    ) -> Result<Self, ConfigValidationError> {
        if !configurations.contains_key(&default_policy) {
            return Err(ConfigValidationError::UnknownDefaultPolicy(default_policy));
        }
        for configuration in configurations.values() {
            configuration.validate()?;
        }

        Ok(Self {
            sign_request_service: SignRequestService::new(
                configurations.clone(),
                default_policy.clone(),
                processor_provider.clone(),
                signer,
            ),
            sign_response_service: SignResponseService::new(
                configurations,
                default_policy,
                processor_provider,
                validator_provider,
                assertion_processor,
                signature_verifier,
            ),
        })
    }
}
