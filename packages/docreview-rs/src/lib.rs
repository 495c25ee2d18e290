//! # docreview-rs
//!
//! A library and CLI client for uploading PDFs and reviewing the sensitivity annotations a
//! classification backend produces for them.
//!
//! ## Features
//!
//! - **Backend client**: List, download and upload documents, fetch OCR text blocks and extracted images
//! - **Annotation loading**: Normalize text and image regions into a fixed reference page, skipping unusable records
//! - **Review sessions**: One open document at a time, stale fetches discarded, selection kept in sync with navigation
//! - **Critical navigation**: Step through only the annotations classified above `Public`
//! - **Reports**: Render a document's annotations and estimated classification as markdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use docreview_rs::prelude::*;
//! use std::sync::Arc;
//!
//! let backend = Arc::new(HttpBackend::new(&ReviewConfig::default())?);
//! let session = ReviewSession::new(backend, Box::new(TracingHost::new()));
//!
//! session.open_document("65f1c0ffee").await?;
//! while let Some(id) = session.navigate(Direction::Next, true).await? {
//!     println!("flagged: {}", id);
//! #   break;
//! }
//! println!("{}", describe_estimate(session.estimate_classification().await?));
//! ```

pub mod client;
pub mod config;
pub mod host;
pub mod loader;
pub mod report;
pub mod session;
pub mod upload;

// Re-export commonly used types at the root level
pub use client::HttpBackend;
pub use config::{ConfigError, ReviewConfig};
pub use host::TracingHost;
pub use loader::{load_document, LoadReport};
pub use report::{ReviewReport, ReviewReportOptions, ReviewReportResult};
pub use session::{LoadState, OpenOutcome, ReviewSession, SessionError, SessionSnapshot};
pub use upload::{collect_pdfs, upload_all, UploadOutcome};

pub use docreview_annotate as annotate;

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```ignore
/// use docreview_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        collect_pdfs, load_document, upload_all, HttpBackend, LoadReport, LoadState, OpenOutcome, ReviewConfig,
        ReviewReport, ReviewReportOptions, ReviewSession, SessionError, SessionSnapshot, TracingHost,
    };
    pub use docreview_annotate::{
        describe_estimate, normalize_box, reduce_vertices, Annotation, AnnotationHost, AnnotationId,
        BackendError, Classification, Direction, DocumentAnnotations, PageSize, Rect, ReviewBackend, Selection,
        SelectionController, Severity, SourceBox, Vertex, ViewMode, REFERENCE_HEIGHT, REFERENCE_WIDTH,
    };
}
