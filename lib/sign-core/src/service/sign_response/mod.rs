use std::collections::HashMap;
use std::sync::Arc;

use shared_types::PolicyId;
use time::Duration;

use crate::config::IntegrationServiceConfiguration;
use crate::provider::assertion::SignerAssertionInfoProcessor;
use crate::provider::certificate_validator::provider::CertificateValidatorProvider;
use crate::provider::document_processor::provider::DocumentProcessorProvider;
use crate::provider::signer::ProtocolSignatureVerifier;

mod service;
mod validator;


/// Per-call overrides for response processing. Any threshold left unset is
/// taken from the policy configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignResponseProcessingParameters {
    pub policy: Option<PolicyId>,
    pub max_response_age: Option<Duration>,
    pub allowed_clock_skew: Option<Duration>,
    pub max_processing_time: Option<Duration>,
    pub strict_processing: Option<bool>,
}

pub struct SignResponseService {
    configurations: HashMap<PolicyId, IntegrationServiceConfiguration>,
    default_policy: PolicyId,
    processor_provider: Arc<dyn DocumentProcessorProvider>,
    validator_provider: Arc<dyn CertificateValidatorProvider>,
    assertion_processor: Arc<dyn SignerAssertionInfoProcessor>,
    signature_verifier: Arc<dyn ProtocolSignatureVerifier>,
}

impl SignResponseService {
    pub fn new(
        configurations: HashMap<PolicyId, IntegrationServiceConfiguration>,
        default_policy: PolicyId,
        processor_provider: Arc<dyn DocumentProcessorProvider>,
        validator_provider: Arc<dyn CertificateValidatorProvider>,
        assertion_processor: Arc<dyn SignerAssertionInfoProcessor>,
        signature_verifier: Arc<dyn ProtocolSignatureVerifier>,
    ) -> Self {
        Self {
            configurations,
            default_policy,
            processor_provider,
            validator_provider,
            assertion_processor,
            signature_verifier,
        }
    }
}
