//! Descriptive records attached to annotations, and the per-document store that keeps
//! geometry and metadata together.

use std::collections::HashMap;

use crate::annotation::{Annotation, AnnotationId, ViewMode};
use crate::severity::{estimate_document_classification, Classification, Severity};
use crate::wire::{ImageRecord, Likelihood, SafeSearch, TextBlockRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct TextMetadata {
    pub text: String,
    pub classification: Option<String>,
    pub confidence: Option<f64>,
    pub explanation: Option<String>,
    /// Block type reported by the extractor, e.g. `block` or `paragraph`.
    pub block_type: String,
}

impl From<&TextBlockRecord> for TextMetadata {
    fn from(record: &TextBlockRecord) -> Self {
        Self {
            text: record.text.clone(),
            classification: record.classification.clone(),
            confidence: record.confidence,
            explanation: record.explanation.clone(),
            block_type: record.block_type.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageMetadata {
    pub page: u32,
    pub image_index: u32,
    pub xref: i64,
    pub extension: String,
    pub size_bytes: u64,
    pub safe_search: Option<SafeSearch>,
    /// Explicit label from the backend, or one derived from safe-search.
    pub classification: Option<String>,
}

impl From<&ImageRecord> for ImageMetadata {
    fn from(record: &ImageRecord) -> Self {
        let classification = record
            .classification
            .clone()
            .filter(|c| !c.trim().is_empty())
            .or_else(|| {
                record
                    .safe_search
                    .as_ref()
                    .and_then(classify_safe_search)
                    .map(|c| c.label().to_string())
            });

        Self {
            page: record.page,
            image_index: record.image_index,
            xref: record.xref,
            extension: record.extension.clone(),
            size_bytes: record.size_bytes,
            safe_search: record.safe_search,
            classification,
        }
    }
}

/// Maps safe-search signals onto the classification scale.
pub fn classify_safe_search(safe: &SafeSearch) -> Option<Classification> {
    match safe.worst() {
        Likelihood::Unknown => None,
        Likelihood::VeryUnlikely | Likelihood::Unlikely => Some(Classification::Public),
        Likelihood::Possible => Some(Classification::Sensitive),
        Likelihood::Likely | Likelihood::VeryLikely => Some(Classification::Unsafe),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationMetadata {
    Text(TextMetadata),
    Image(ImageMetadata),
}

impl AnnotationMetadata {
    pub fn classification(&self) -> Option<&str> {
        match self {
            Self::Text(m) => m.classification.as_deref(),
            Self::Image(m) => m.classification.as_deref(),
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::of(self.classification())
    }

    pub fn is_critical(&self) -> bool {
        self.severity().is_critical()
    }
}

/// Annotations and metadata for the one document currently open.
///
/// Geometry and metadata are only ever inserted together, so every annotation has a
/// metadata record and every record has geometry.
#[derive(Debug, Clone, Default)]
pub struct DocumentAnnotations {
    document_id: String,
    annotations: Vec<Annotation>,
    metadata: HashMap<AnnotationId, AnnotationMetadata>,
}

impl DocumentAnnotations {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            annotations: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Adds an annotation. A repeated id replaces both the geometry and the metadata
    /// while keeping its original position.
    pub fn insert(&mut self, annotation: Annotation, metadata: AnnotationMetadata) {
        match self.annotations.iter_mut().find(|a| a.id == annotation.id) {
            Some(existing) => *existing = annotation.clone(),
            None => self.annotations.push(annotation.clone()),
        }
        self.metadata.insert(annotation.id, metadata);
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn get(&self, id: &AnnotationId) -> Option<(&Annotation, &AnnotationMetadata)> {
        let annotation = self.annotations.iter().find(|a| &a.id == id)?;
        let metadata = self.metadata.get(id)?;
        Some((annotation, metadata))
    }

    pub fn metadata(&self, id: &AnnotationId) -> Option<&AnnotationMetadata> {
        self.metadata.get(id)
    }

    /// Annotations visible in `mode`, in load order.
    pub fn in_mode(&self, mode: ViewMode) -> impl Iterator<Item = &Annotation> + '_ {
        self.annotations.iter().filter(move |a| a.mode() == mode)
    }

    /// `(id, is_critical)` pairs for `mode`, ready for a navigator.
    pub fn navigation_entries(&self, mode: ViewMode) -> Vec<(AnnotationId, bool)> {
        self.in_mode(mode)
            .map(|a| {
                let critical = self
                    .metadata
                    .get(&a.id)
                    .map(AnnotationMetadata::is_critical)
                    .unwrap_or(true);
                (a.id.clone(), critical)
            })
            .collect()
    }

    pub fn critical_count(&self, mode: ViewMode) -> usize {
        self.navigation_entries(mode).iter().filter(|(_, c)| *c).count()
    }

    /// Worst known classification across text and image metadata.
    pub fn estimate_classification(&self) -> Option<Classification> {
        estimate_document_classification(self.metadata.values().map(AnnotationMetadata::classification))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn text(id: &str, classification: Option<&str>) -> (Annotation, AnnotationMetadata) {
        (
            Annotation {
                id: AnnotationId::parse(id),
                page_number: 1,
                rect: Rect::from_corners(0.0, 0.0, 10.0, 10.0),
            },
            AnnotationMetadata::Text(TextMetadata {
                text: format!("block {}", id),
                classification: classification.map(str::to_string),
                confidence: Some(0.9),
                explanation: None,
                block_type: "block".to_string(),
            }),
        )
    }

    fn image_record(safe_search: Option<SafeSearch>, classification: Option<&str>) -> ImageRecord {
        ImageRecord {
            page: 1,
            image_index: 0,
            xref: 12,
            extension: "png".to_string(),
            size_bytes: 2048,
            bounding_box: Some(crate::geometry::SourceBox { x0: 0.0, y0: 0.0, x1: 5.0, y1: 5.0 }),
            page_width: Some(612.0),
            page_height: Some(792.0),
            safe_search,
            classification: classification.map(str::to_string),
        }
    }

    #[test]
    fn test_estimate_example_from_mixed_labels() {
        let mut doc = DocumentAnnotations::new("doc");
        for (a, m) in [text("1-1", Some("Public")), text("2-1", Some("unsafe"))] {
            doc.insert(a, m);
        }
        assert_eq!(doc.estimate_classification(), Some(Classification::Unsafe));
        assert_eq!(doc.estimate_classification().unwrap().label(), "Unsafe");
    }

    #[test]
    fn test_estimate_without_labels() {
        let mut doc = DocumentAnnotations::new("doc");
        let (a, m) = text("1-1", None);
        doc.insert(a, m);
        assert_eq!(doc.estimate_classification(), None);
    }

    #[test]
    fn test_insert_replaces_duplicate_id() {
        let mut doc = DocumentAnnotations::new("doc");
        let (a, m) = text("1-1", Some("public"));
        doc.insert(a, m);
        let (a, m) = text("1-1", Some("unsafe"));
        doc.insert(a, m);
        assert_eq!(doc.len(), 1);
        let (_, meta) = doc.get(&AnnotationId::parse("1-1")).unwrap();
        assert_eq!(meta.classification(), Some("unsafe"));
    }

    #[test]
    fn test_navigation_entries_flag_critical() {
        let mut doc = DocumentAnnotations::new("doc");
        for (a, m) in [text("1-1", Some("public")), text("1-2", Some("confidential")), text("1-3", None)] {
            doc.insert(a, m);
        }
        let entries = doc.navigation_entries(ViewMode::Text);
        let flags: Vec<bool> = entries.iter().map(|(_, c)| *c).collect();
        assert_eq!(flags, vec![false, true, true]);
        assert!(doc.navigation_entries(ViewMode::Image).is_empty());
        assert_eq!(doc.critical_count(ViewMode::Text), 2);
    }

    #[test]
    fn test_image_classification_prefers_explicit_label() {
        let safe = SafeSearch { adult: Likelihood::VeryLikely, ..Default::default() };
        let meta = ImageMetadata::from(&image_record(Some(safe), Some("confidential")));
        assert_eq!(meta.classification.as_deref(), Some("confidential"));
    }

    #[test]
    fn test_image_classification_from_safe_search() {
        let likely = SafeSearch { racy: Likelihood::Likely, ..Default::default() };
        let possible = SafeSearch { violence: Likelihood::Possible, adult: Likelihood::Unlikely, ..Default::default() };
        let clean = SafeSearch { adult: Likelihood::VeryUnlikely, spoof: Likelihood::VeryLikely, ..Default::default() };

        assert_eq!(ImageMetadata::from(&image_record(Some(likely), None)).classification.as_deref(), Some("Unsafe"));
        assert_eq!(ImageMetadata::from(&image_record(Some(possible), None)).classification.as_deref(), Some("Sensitive"));
        assert_eq!(ImageMetadata::from(&image_record(Some(clean), None)).classification.as_deref(), Some("Public"));
        assert_eq!(ImageMetadata::from(&image_record(Some(SafeSearch::default()), None)).classification, None);
        assert_eq!(ImageMetadata::from(&image_record(None, Some("  "))).classification, None);
    }
}
