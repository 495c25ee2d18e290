use async_trait::async_trait;
use thiserror::Error;

use crate::wire::{Document, DocumentPage, ImageRecord, TextBlockRecord, UploadResponse};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Parse(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// The document service that stores PDFs and runs extraction and classification.
#[async_trait]
pub trait ReviewBackend: Send + Sync {
    async fn list_documents(&self, limit: u32, skip: u32) -> Result<DocumentPage, BackendError>;

    async fn download_document(&self, document_id: &str) -> Result<Vec<u8>, BackendError>;

    /// Text blocks grouped by page; the outer index is the 0-based page.
    async fn bounding_boxes(&self, document_id: &str) -> Result<Vec<Vec<TextBlockRecord>>, BackendError>;

    async fn images(&self, document_id: &str) -> Result<Vec<ImageRecord>, BackendError>;

    async fn upload_pdf(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadResponse, BackendError>;

    /// Asks the backend agent to revise content of a classification. Returns its message.
    async fn ai_edit(&self, classification: &str, suggestion: &str) -> Result<String, BackendError>;

    /// Looks a document up by id by walking the listing.
    async fn find_document(&self, document_id: &str, page_size: u32) -> Result<Option<Document>, BackendError> {
        let page_size = page_size.max(1);
        let mut skip = 0;
        loop {
            let page = self.list_documents(page_size, skip).await?;
            if let Some(doc) = page.files.iter().find(|d| d.id == document_id) {
                return Ok(Some(doc.clone()));
            }
            skip += page_size;
            if page.files.is_empty() || u64::from(skip) >= page.count {
                return Ok(None);
            }
        }
    }
}
