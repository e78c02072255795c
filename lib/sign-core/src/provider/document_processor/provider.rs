use std::sync::Arc;

use crate::model::document::TbsDocument;
use crate::proto::dss::SignTaskDataWire;

use super::{SignedDocumentProcessor, TbsDocumentProcessor};

/// Resolves the processor responsible for a document or sign task.
///
/// Processors are held in registration order and the first one whose
/// `supports` predicate matches wins, so dispatch is deterministic across
/// identical configurations.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait DocumentProcessorProvider: Send + Sync {
    fn tbs_processor(&self, document: &TbsDocument) -> Option<Arc<dyn TbsDocumentProcessor>>;

    fn signed_processor(
        &self,
        sign_task: &SignTaskDataWire,
    ) -> Option<Arc<dyn SignedDocumentProcessor>>;
}

pub struct DocumentProcessorProviderImpl {
    tbs_processors: Vec<Arc<dyn TbsDocumentProcessor>>,
    signed_processors: Vec<Arc<dyn SignedDocumentProcessor>>,
}

impl DocumentProcessorProviderImpl {
    pub fn new(
        tbs_processors: Vec<Arc<dyn TbsDocumentProcessor>>,
        signed_processors: Vec<Arc<dyn SignedDocumentProcessor>>,
    ) -> Self {
        Self {
            tbs_processors,
            signed_processors,
        }
    }
}

impl DocumentProcessorProvider for DocumentProcessorProviderImpl {
    fn tbs_processor(&self, document: &TbsDocument) -> Option<Arc<dyn TbsDocumentProcessor>> {
        self.tbs_processors
            .iter()
            .find(|processor| processor.supports(document))
            .cloned()
    }

    fn signed_processor(
        &self,
        sign_task: &SignTaskDataWire,
    ) -> Option<Arc<dyn SignedDocumentProcessor>> {
        self.signed_processors
            .iter()
            .find(|processor| processor.supports(sign_task))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::dss::SignatureType;
    use crate::provider::document_processor::{
        MockSignedDocumentProcessor, MockTbsDocumentProcessor,
    };

    fn document(mime_type: &str) -> TbsDocument {
        TbsDocument {
            id: Some("doc-1".into()),
            mime_type: mime_type.to_owned(),
            content: Some(b"content".to_vec()),
            content_reference: None,
            ades_requirement: None,
            visible_signature_requirement: None,
        }
    }

    fn tbs_mock(supports: bool) -> Arc<dyn TbsDocumentProcessor> {
        let mut mock = MockTbsDocumentProcessor::new();
        mock.expect_supports().return_const(supports);
        Arc::new(mock)
    }

    #[test]
    fn test_first_matching_tbs_processor_wins() {
        let first = tbs_mock(true);
        let second = tbs_mock(true);

        let provider =
            DocumentProcessorProviderImpl::new(vec![first.clone(), second], vec![]);

        let resolved = provider.tbs_processor(&document("application/pdf")).unwrap();
        assert!(Arc::ptr_eq(&resolved, &first));
    }

    #[test]
    fn test_non_matching_processors_are_skipped() {
        let skipped = tbs_mock(false);
        let matching = tbs_mock(true);

        let provider =
            DocumentProcessorProviderImpl::new(vec![skipped, matching.clone()], vec![]);

        let resolved = provider.tbs_processor(&document("application/pdf")).unwrap();
        assert!(Arc::ptr_eq(&resolved, &matching));
    }

    #[test]
    fn test_no_matching_processor_yields_none() {
        let provider = DocumentProcessorProviderImpl::new(vec![tbs_mock(false)], vec![]);

        assert!(provider
            .tbs_processor(&document("application/octet-stream"))
            .is_none());
    }

    #[test]
    fn test_signed_processor_dispatch_by_signature_type() {
        let mut matching = MockSignedDocumentProcessor::new();
        matching
            .expect_supports()
            .returning(|task| task.sig_type == Some(SignatureType::Xml));
        let matching: Arc<dyn SignedDocumentProcessor> = Arc::new(matching);

        let provider = DocumentProcessorProviderImpl::new(vec![], vec![matching.clone()]);

        let xml_task = SignTaskDataWire {
            sig_type: Some(SignatureType::Xml),
            ..Default::default()
        };
        let pdf_task = SignTaskDataWire {
            sig_type: Some(SignatureType::Pdf),
            ..Default::default()
        };

        assert!(provider.signed_processor(&xml_task).is_some());
        assert!(provider.signed_processor(&pdf_task).is_none());
    }
}
