use std::collections::HashMap;
use std::sync::Arc;

use shared_types::PolicyId;

use crate::config::IntegrationServiceConfiguration;
use crate::model::request::SignatureSessionState;
use crate::provider::document_processor::provider::DocumentProcessorProvider;
use crate::provider::signer::ProtocolSigner;

mod mapper;
mod service;
mod validator;


/// Output of building a sign request: the state to retain until the response
/// arrives, plus the transport-encoded request and where to post it.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSignRequest {
    pub session_state: SignatureSessionState,
    pub encoded_request: String,
    pub destination_url: String,
}

pub struct SignRequestService {
    configurations: HashMap<PolicyId, IntegrationServiceConfiguration>,
    default_policy: PolicyId,
    processor_provider: Arc<dyn DocumentProcessorProvider>,
    signer: Arc<dyn ProtocolSigner>,
}

impl SignRequestService {
    pub fn new(
        configurations: HashMap<PolicyId, IntegrationServiceConfiguration>,
        default_policy: PolicyId,
        processor_provider: Arc<dyn DocumentProcessorProvider>,
        signer: Arc<dyn ProtocolSigner>,
    ) -> Self {
        Self {
            configurations,
            default_policy,
            processor_provider,
            signer,
        }
    }
}
