use std::sync::Arc;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::config::IntegrationServiceConfiguration;
use crate::model::document::{DocumentType, SignedDocument, TbsDocument};
use crate::proto::dss::{AdesObjectWire, SignTaskDataWire, SignatureType};
use crate::service::error::InputValidationError;

use super::pdf::ades_scaffolding;
use super::{
    ades, resolve_content, DecodedDocumentContent, DocumentCodec, DocumentProcessorError,
    PreProcessedTbsDocument, SignedDocumentProcessor, TbsDocumentProcessor,
};
use crate::provider::document_cache::DocumentCache;

/// Handles XML documents signed with enveloped XML-dsig signatures produced
/// through the injected codec.
pub struct XmlDocumentProcessor {
    cache: Arc<dyn DocumentCache>,
    codec: Arc<dyn DocumentCodec>,
}

impl XmlDocumentProcessor {
    pub fn new(cache: Arc<dyn DocumentCache>, codec: Arc<dyn DocumentCodec>) -> Self {
        Self { cache, codec }
    }
}

impl TbsDocumentProcessor for XmlDocumentProcessor {
    fn supports(&self, document: &TbsDocument) -> bool {
        document.document_type() == Some(DocumentType::Xml)
    }

    fn pre_process(
        &self,
        mut document: TbsDocument,
        _config: &IntegrationServiceConfiguration,
        requester_id: &str,
        field_name: &str,
    ) -> Result<PreProcessedTbsDocument, InputValidationError> {
        let id = document
            .id
            .clone()
            .ok_or_else(|| InputValidationError::MissingField {
                field: format!("{field_name}.id"),
            })?;

        if document.visible_signature_requirement.is_some() {
            return Err(InputValidationError::InvalidField {
                field: field_name.to_owned(),
                reason: "visible signatures apply to PDF documents only".to_owned(),
            });
        }

        resolve_content(&mut document, &*self.cache, requester_id, field_name)?;

        let content = document
            .content
            .as_deref()
            .ok_or_else(|| InputValidationError::MissingField {
                field: format!("{field_name}.content"),
            })?;

        let root_element =
            parse_root_element(content).map_err(|reason| InputValidationError::InvalidField {
                field: field_name.to_owned(),
                reason,
            })?;

        Ok(PreProcessedTbsDocument {
            id,
            document,
            decoded: Some(DecodedDocumentContent::Xml { root_element }),
        })
    }

    fn process(
        &self,
        document: &PreProcessedTbsDocument,
        algorithm: &str,
        _config: &IntegrationServiceConfiguration,
    ) -> Result<SignTaskDataWire, DocumentProcessorError> {
        let content = document.document.content.as_deref().ok_or_else(|| {
            DocumentProcessorError::Processing("document content missing".to_owned())
        })?;

        let to_be_signed = self.codec.to_be_signed(content, algorithm)?;

        let (ades_type, ades_object) = ades_scaffolding(&document.document);

        Ok(SignTaskDataWire {
            task_id: Some(document.id.clone()),
            sig_type: Some(SignatureType::Xml),
            to_be_signed_bytes: Some(to_be_signed),
            ades_type,
            ades_object,
            signature: None,
        })
    }
}

impl SignedDocumentProcessor for XmlDocumentProcessor {
    fn supports(&self, sign_task: &SignTaskDataWire) -> bool {
        sign_task.sig_type == Some(SignatureType::Xml)
    }

    fn build_signed_document(
        &self,
        tbs_document: &TbsDocument,
        sign_task: &SignTaskDataWire,
        certificate_chain: &[Vec<u8>],
    ) -> Result<SignedDocument, DocumentProcessorError> {
        let content = tbs_document.content.as_deref().ok_or_else(|| {
            DocumentProcessorError::Processing("original document content missing".to_owned())
        })?;
        let id = sign_task.task_id.clone().ok_or_else(|| {
            DocumentProcessorError::Processing("sign task carries no id".to_owned())
        })?;
        let signature = sign_task.signature.as_ref().ok_or_else(|| {
            DocumentProcessorError::Processing("sign task carries no signature".to_owned())
        })?;

        let signed_content =
            self.codec
                .embed_signature(content, &signature.value, certificate_chain)?;

        Ok(SignedDocument {
            id,
            mime_type: DocumentType::Xml.mime_type().to_owned(),
            signed_content,
        })
    }

    fn validate_signed_document(
        &self,
        signed_document: &SignedDocument,
        signer_certificate: &[u8],
    ) -> Result<(), DocumentProcessorError> {
        self.codec
            .verify_signature(&signed_document.signed_content, signer_certificate)
    }

    fn validate_ades_object(
        &self,
        ades_object: &AdesObjectWire,
        signer_certificate: &[u8],
    ) -> Result<(), DocumentProcessorError> {
        ades::validate_certificate_digest(ades_object, signer_certificate)
    }
}

/// Walks the whole document so nesting errors anywhere are caught, returning
/// the name of the root element.
fn parse_root_element(content: &[u8]) -> Result<String, String> {
    let text = std::str::from_utf8(content).map_err(|_| "document is not valid UTF-8".to_owned())?;

    let mut reader = Reader::from_str(text);
    let mut root_element = None;
    let mut depth = 0_u32;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                if root_element.is_none() {
                    root_element = Some(
                        String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                    );
                }
                depth += 1;
            }
            Ok(Event::Empty(start)) => {
                if root_element.is_none() {
                    root_element = Some(
                        String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                    );
                }
            }
            Ok(Event::End(_)) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced closing element".to_owned())?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(error) => return Err(format!("malformed XML: {error}")),
        }
    }

    if depth != 0 {
        return Err("unbalanced XML document".to_owned());
    }

    root_element.ok_or_else(|| "document contains no elements".to_owned())
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::provider::document_cache::MockDocumentCache;
    use crate::provider::document_processor::MockDocumentCodec;
    use crate::proto::dss::{SignatureValueWire, ALGORITHM_RSA_SHA256};

    const XML_CONTENT: &[u8] = b"<?xml version=\"1.0\"?><Invoice><Amount>100</Amount></Invoice>";

    fn xml_document(content: Option<Vec<u8>>) -> TbsDocument {
        TbsDocument {
            id: Some("doc-1".into()),
            mime_type: "application/xml".to_owned(),
            content,
            content_reference: None,
            ades_requirement: None,
            visible_signature_requirement: None,
        }
    }

    fn config() -> IntegrationServiceConfiguration {
        IntegrationServiceConfiguration::for_policy("default".into())
    }

    fn processor() -> XmlDocumentProcessor {
        XmlDocumentProcessor::new(
            Arc::new(MockDocumentCache::new()),
            Arc::new(MockDocumentCodec::new()),
        )
    }

    #[test]
    fn test_supports_xml_mime_types() {
        let processor = processor();

        assert!(TbsDocumentProcessor::supports(
            &processor,
            &xml_document(Some(XML_CONTENT.to_vec()))
        ));

        let mut text_xml = xml_document(Some(XML_CONTENT.to_vec()));
        text_xml.mime_type = "text/xml".to_owned();
        assert!(TbsDocumentProcessor::supports(&processor, &text_xml));

        let mut pdf = xml_document(Some(b"%PDF-1.7".to_vec()));
        pdf.mime_type = "application/pdf".to_owned();
        assert!(!TbsDocumentProcessor::supports(&processor, &pdf));
    }

    #[test]
    fn test_pre_process_captures_root_element() {
        let processed = processor()
            .pre_process(
                xml_document(Some(XML_CONTENT.to_vec())),
                &config(),
                "caller",
                "tbsDocuments[0]",
            )
            .unwrap();

        assert_eq!(
            processed.decoded,
            Some(DecodedDocumentContent::Xml {
                root_element: "Invoice".to_owned()
            })
        );
    }

    #[test]
    fn test_pre_process_rejects_unbalanced_document() {
        let result = processor().pre_process(
            xml_document(Some(b"<Invoice><Amount>100</Invoice>".to_vec())),
            &config(),
            "caller",
            "tbsDocuments[0]",
        );

        assert!(matches!(result, Err(InputValidationError::InvalidField { .. })));
    }

    #[test]
    fn test_pre_process_rejects_non_xml_content() {
        let result = processor().pre_process(
            xml_document(Some(b"just some text".to_vec())),
            &config(),
            "caller",
            "tbsDocuments[0]",
        );

        assert!(matches!(
            result,
            Err(InputValidationError::InvalidField { field, .. }) if field == "tbsDocuments[0]"
        ));
    }

    #[test]
    fn test_pre_process_rejects_visible_signature_requirement() {
        let mut document = xml_document(Some(XML_CONTENT.to_vec()));
        document.visible_signature_requirement =
            Some(crate::model::document::VisibleSignatureRequirement::default());

        let result = processor().pre_process(document, &config(), "caller", "tbsDocuments[0]");

        assert!(matches!(result, Err(InputValidationError::InvalidField { .. })));
    }

    #[test]
    fn test_process_produces_xml_sign_task() {
        let mut codec = MockDocumentCodec::new();
        codec
            .expect_to_be_signed()
            .with(eq(XML_CONTENT), eq(ALGORITHM_RSA_SHA256))
            .once()
            .returning(|_, _| Ok(b"digest-info".to_vec()));

        let processor =
            XmlDocumentProcessor::new(Arc::new(MockDocumentCache::new()), Arc::new(codec));

        let task = processor
            .process(
                &PreProcessedTbsDocument {
                    id: "doc-1".into(),
                    document: xml_document(Some(XML_CONTENT.to_vec())),
                    decoded: None,
                },
                ALGORITHM_RSA_SHA256,
                &config(),
            )
            .unwrap();

        assert_eq!(task.task_id, Some("doc-1".into()));
        assert_eq!(task.sig_type, Some(SignatureType::Xml));
    }

    #[test]
    fn test_build_signed_document_embeds_signature() {
        let mut codec = MockDocumentCodec::new();
        codec
            .expect_embed_signature()
            .once()
            .returning(|_, _, _| Ok(b"<Invoice><ds:Signature/></Invoice>".to_vec()));

        let processor =
            XmlDocumentProcessor::new(Arc::new(MockDocumentCache::new()), Arc::new(codec));

        let sign_task = SignTaskDataWire {
            task_id: Some("doc-1".into()),
            sig_type: Some(SignatureType::Xml),
            signature: Some(SignatureValueWire {
                r#type: Some(ALGORITHM_RSA_SHA256.to_owned()),
                value: b"signature".to_vec(),
            }),
            ..Default::default()
        };

        let signed = processor
            .build_signed_document(
                &xml_document(Some(XML_CONTENT.to_vec())),
                &sign_task,
                &[b"leaf-cert".to_vec()],
            )
            .unwrap();

        assert_eq!(signed.id, "doc-1".into());
        assert_eq!(signed.mime_type, "application/xml");
    }

    #[test]
    fn test_build_signed_document_requires_signature() {
        let sign_task = SignTaskDataWire {
            task_id: Some("doc-1".into()),
            sig_type: Some(SignatureType::Xml),
            ..Default::default()
        };

        let result = processor().build_signed_document(
            &xml_document(Some(XML_CONTENT.to_vec())),
            &sign_task,
            &[],
        );

        assert!(matches!(result, Err(DocumentProcessorError::Processing(_))));
    }
}
