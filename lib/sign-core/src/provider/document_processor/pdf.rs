use std::sync::Arc;

use crate::config::IntegrationServiceConfiguration;
use crate::model::document::{AdesFormat, DocumentType, SignedDocument, TbsDocument};
use crate::proto::dss::{AdesObjectWire, AdesType, SignTaskDataWire, SignatureType};
use crate::service::error::InputValidationError;

use super::{
    ades, resolve_content, DecodedDocumentContent, DocumentCodec, DocumentProcessorError,
    PreProcessedTbsDocument, SignedDocumentProcessor, TbsDocumentProcessor,
};
use crate::provider::document_cache::DocumentCache;

/// Handles PDF documents: PAdES-style CMS signatures produced through the
/// injected codec.
pub struct PdfDocumentProcessor {
    cache: Arc<dyn DocumentCache>,
    codec: Arc<dyn DocumentCodec>,
}

impl PdfDocumentProcessor {
    pub fn new(cache: Arc<dyn DocumentCache>, codec: Arc<dyn DocumentCodec>) -> Self {
        Self { cache, codec }
    }
}

impl TbsDocumentProcessor for PdfDocumentProcessor {
    fn supports(&self, document: &TbsDocument) -> bool {
        document.document_type() == Some(DocumentType::Pdf)
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

        resolve_content(&mut document, &*self.cache, requester_id, field_name)?;

        let content = document
            .content
            .as_deref()
            .ok_or_else(|| InputValidationError::MissingField {
                field: format!("{field_name}.content"),
            })?;

        let version = parse_pdf_header(content).ok_or_else(|| {
            InputValidationError::InvalidField {
                field: field_name.to_owned(),
                reason: "not a PDF document".to_owned(),
            }
        })?;

        if !has_eof_marker(content) {
            return Err(InputValidationError::InvalidField {
                field: field_name.to_owned(),
                reason: "PDF document lacks an end-of-file marker".to_owned(),
            });
        }

        Ok(PreProcessedTbsDocument {
            id,
            document,
            decoded: Some(DecodedDocumentContent::Pdf { version }),
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
            sig_type: Some(SignatureType::Pdf),
            to_be_signed_bytes: Some(to_be_signed),
            ades_type,
            ades_object,
            signature: None,
        })
    }
}

impl SignedDocumentProcessor for PdfDocumentProcessor {
    fn supports(&self, sign_task: &SignTaskDataWire) -> bool {
        sign_task.sig_type == Some(SignatureType::Pdf)
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
            mime_type: DocumentType::Pdf.mime_type().to_owned(),
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

pub(super) fn ades_scaffolding(document: &TbsDocument) -> (AdesType, Option<AdesObjectWire>) {
    match &document.ades_requirement {
        None => (AdesType::None, None),
        Some(requirement) => {
            let ades_type = match requirement.format {
                AdesFormat::None => AdesType::None,
                AdesFormat::Bes => AdesType::Bes,
                AdesFormat::Epes => AdesType::Epes,
            };
            (ades_type, requirement.ades_object.clone())
        }
    }
}

fn parse_pdf_header(content: &[u8]) -> Option<String> {
    let rest = content.strip_prefix(b"%PDF-")?;
    let version: String = rest
        .iter()
        .take_while(|byte| byte.is_ascii_digit() || **byte == b'.')
        .map(|byte| *byte as char)
        .collect();

    if version.is_empty() {
        return None;
    }
    Some(version)
}

/// The end-of-file marker must appear within the final kilobyte.
fn has_eof_marker(content: &[u8]) -> bool {
    let tail_start = content.len().saturating_sub(1024);
    content[tail_start..]
        .windows(b"%%EOF".len())
        .any(|window| window == b"%%EOF")
}
