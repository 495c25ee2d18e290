//! HTTP implementation of the review backend.

use async_trait::async_trait;
use docreview_annotate::wire::{AiEditRequest, MessageResponse};
use docreview_annotate::{BackendError, DocumentPage, ImageRecord, ReviewBackend, TextBlockRecord, UploadResponse};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::config::ReviewConfig;

/// Talks to the backend REST API.
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    pub fn new(config: &ReviewConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn document_url(&self, document_id: &str, suffix: &str) -> Result<String, BackendError> {
        validate_document_id(document_id)?;
        Ok(format!("{}/view/document/{}{}", self.base_url, document_id, suffix))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, BackendError> {
        debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;
        parse_json(check_status(resp).await?).await
    }
}

/// Ids are interpolated into URL paths, so path and query delimiters are refused.
pub fn validate_document_id(document_id: &str) -> Result<(), BackendError> {
    if document_id.trim().is_empty() {
        return Err(BackendError::InvalidInput("document id is empty".to_string()));
    }
    if document_id.contains(['/', '?', '#', '%']) || document_id.chars().any(char::is_whitespace) {
        return Err(BackendError::InvalidInput(format!("invalid document id: {:?}", document_id)));
    }
    Ok(())
}

async fn check_status(resp: Response) -> Result<Response, BackendError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(BackendError::Api {
        status: status.as_u16(),
        message: if message.is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            message
        },
    })
}

async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T, BackendError> {
    resp.json().await.map_err(|e| BackendError::Parse(e.to_string()))
}

#[async_trait]
impl ReviewBackend for HttpBackend {
    async fn list_documents(&self, limit: u32, skip: u32) -> Result<DocumentPage, BackendError> {
        let url = format!("{}/view/document?limit={}&skip={}", self.base_url, limit, skip);
        self.get_json(&url).await
    }

    async fn download_document(&self, document_id: &str) -> Result<Vec<u8>, BackendError> {
        let url = self.document_url(document_id, "")?;
        debug!("GET {}", url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;
        let bytes = check_status(resp)
            .await?
            .bytes()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn bounding_boxes(&self, document_id: &str) -> Result<Vec<Vec<TextBlockRecord>>, BackendError> {
        let url = self.document_url(document_id, "/bounding_boxes")?;
        self.get_json(&url).await
    }

    async fn images(&self, document_id: &str) -> Result<Vec<ImageRecord>, BackendError> {
        let url = self.document_url(document_id, "/images")?;
        self.get_json(&url).await
    }

    async fn upload_pdf(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadResponse, BackendError> {
        let url = format!("{}/parse/parse-pdf", self.base_url);
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")
            .map_err(|e| BackendError::InvalidInput(e.to_string()))?;
        let form = Form::new().part("file", part);

        debug!("POST {} ({})", url, filename);
        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;
        parse_json(check_status(resp).await?).await
    }

    async fn ai_edit(&self, classification: &str, suggestion: &str) -> Result<String, BackendError> {
        let url = format!("{}/top-agent/chain/ai-edit-by-classification", self.base_url);
        let request = AiEditRequest {
            classification: classification.to_string(),
            suggestion: suggestion.to_string(),
        };

        debug!("POST {}", url);
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;
        let body: MessageResponse = parse_json(check_status(resp).await?).await?;
        Ok(body.message)
    }
}
