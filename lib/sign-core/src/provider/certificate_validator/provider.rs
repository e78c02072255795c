use std::collections::HashMap;
use std::sync::Arc;

use shared_types::PolicyId;

use super::CertificateValidator;

/// Looks up the certificate validator configured for a policy, falling back
/// to the default validator when no policy-specific one is registered.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait CertificateValidatorProvider: Send + Sync {
    fn get_validator(&self, policy: &PolicyId) -> Arc<dyn CertificateValidator>;
}

pub struct CertificateValidatorProviderImpl {
    validators: HashMap<PolicyId, Arc<dyn CertificateValidator>>,
    default_validator: Arc<dyn CertificateValidator>,
}

impl CertificateValidatorProviderImpl {
    pub fn new(
        validators: HashMap<PolicyId, Arc<dyn CertificateValidator>>,
        default_validator: Arc<dyn CertificateValidator>,
    ) -> Self {
        Self {
            validators,
            default_validator,
        }
    }
}

impl CertificateValidatorProvider for CertificateValidatorProviderImpl {
    fn get_validator(&self, policy: &PolicyId) -> Arc<dyn CertificateValidator> {
        self.validators
            .get(policy)
            .unwrap_or(&self.default_validator)
            .clone()
    }
}
