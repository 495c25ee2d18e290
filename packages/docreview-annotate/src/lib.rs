pub mod annotation;
pub mod backend;
pub mod geometry;
pub mod metadata;
pub mod navigation;
pub mod selection;
pub mod severity;
pub mod wire;

pub use annotation::{partition_by_mode, Annotation, AnnotationId, ViewMode, IMAGE_ID_PREFIX};
pub use backend::{BackendError, ReviewBackend};
pub use geometry::{normalize_box, reduce_vertices, PageSize, Rect, SourceBox, Vertex, REFERENCE_HEIGHT, REFERENCE_WIDTH};
pub use metadata::{AnnotationMetadata, DocumentAnnotations, ImageMetadata, TextMetadata};
pub use navigation::{Direction, Navigator};
pub use selection::{AnnotationHost, NullHost, Selection, SelectionController, Style};
pub use severity::{describe_estimate, estimate_document_classification, Classification, Severity};
pub use wire::{Document, DocumentPage, ImageRecord, Likelihood, SafeSearch, TextBlockRecord, UploadResponse};
