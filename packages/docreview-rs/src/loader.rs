//! Turns backend extraction records into a document's annotation store.
//!
//! Records with unusable geometry are skipped individually; a batch never fails as a
//! whole because of them.

use docreview_annotate::{
    normalize_box, reduce_vertices, Annotation, AnnotationId, AnnotationMetadata, DocumentAnnotations,
    ImageMetadata, ImageRecord, PageSize, TextBlockRecord, TextMetadata, ViewMode,
};
use tracing::{debug, warn};

/// Counts of what was kept and skipped while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub text_kept: usize,
    pub text_skipped: usize,
    pub images_kept: usize,
    pub images_skipped: usize,
}

impl LoadReport {
    pub fn kept(&self) -> usize {
        self.text_kept + self.images_kept
    }

    pub fn skipped(&self) -> usize {
        self.text_skipped + self.images_skipped
    }
}

/// Picks the id for a text block: the backend's own id unless it is missing or would
/// be mistaken for an image id.
fn text_block_id(record: &TextBlockRecord, page: u32, n: usize) -> AnnotationId {
    match record.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => {
            let parsed = AnnotationId::parse(id);
            if parsed.mode() == ViewMode::Text {
                parsed
            } else {
                let generated = AnnotationId::text_block(page, n);
                warn!("Text block id {} collides with image ids, using {}", id, generated);
                generated
            }
        }
        None => AnnotationId::text_block(page, n),
    }
}

/// Text annotations from per-page OCR blocks. The outer index is the 0-based page.
pub fn text_annotations(
    pages: &[Vec<TextBlockRecord>],
    report: &mut LoadReport,
) -> Vec<(Annotation, AnnotationMetadata)> {
    let mut out = Vec::new();
    for (page_idx, blocks) in pages.iter().enumerate() {
        let page = page_idx as u32 + 1;
        for (block_idx, record) in blocks.iter().enumerate() {
            let id = text_block_id(record, page, block_idx + 1);
            match reduce_vertices(&record.bounding_box.vertices, page, id) {
                Some(annotation) => {
                    report.text_kept += 1;
                    out.push((annotation, AnnotationMetadata::Text(TextMetadata::from(record))));
                }
                None => {
                    report.text_skipped += 1;
                    debug!(
                        "Skipping text block {} on page {}: {} vertices",
                        block_idx + 1,
                        page,
                        record.bounding_box.vertices.len()
                    );
                }
            }
        }
    }
    out
}

/// Image annotations, scaled from each page's native size into reference space.
pub fn image_annotations(
    records: &[ImageRecord],
    report: &mut LoadReport,
) -> Vec<(Annotation, AnnotationMetadata)> {
    let mut out = Vec::new();
    for record in records {
        let Some(source) = &record.bounding_box else {
            report.images_skipped += 1;
            debug!("Skipping image {} on page {}: no bounding box", record.image_index, record.page);
            continue;
        };
        let page = match (record.page_width, record.page_height) {
            (Some(w), Some(h)) => PageSize::new(w, h),
            _ => {
                report.images_skipped += 1;
                debug!("Skipping image {} on page {}: missing page size", record.image_index, record.page);
                continue;
            }
        };

        match normalize_box(source, page) {
            Some(rect) => {
                report.images_kept += 1;
                let annotation = Annotation {
                    id: AnnotationId::image(record.page, record.image_index),
                    page_number: record.page,
                    rect,
                };
                out.push((annotation, AnnotationMetadata::Image(ImageMetadata::from(record))));
            }
            None => {
                report.images_skipped += 1;
                debug!(
                    "Skipping image {} on page {}: page size {}x{}",
                    record.image_index, record.page, page.width, page.height
                );
            }
        }
    }
    out
}

/// Builds the full annotation store for one document.
pub fn load_document(
    document_id: &str,
    pages: &[Vec<TextBlockRecord>],
    images: &[ImageRecord],
) -> (DocumentAnnotations, LoadReport) {
    let mut report = LoadReport::default();
    let mut doc = DocumentAnnotations::new(document_id);

    let text = text_annotations(pages, &mut report);
    let image = image_annotations(images, &mut report);
    for (annotation, metadata) in text.into_iter().chain(image) {
        doc.insert(annotation, metadata);
    }

    debug!(
        "Loaded {} annotations for {} ({} skipped)",
        report.kept(),
        document_id,
        report.skipped()
    );
    (doc, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docreview_annotate::{Classification, SourceBox, Vertex};
    use docreview_annotate::wire::Polygon;

    fn block(id: Option<&str>, vertices: &[(f64, f64)], classification: Option<&str>) -> TextBlockRecord {
        TextBlockRecord {
            id: id.map(str::to_string),
            text: "text".to_string(),
            bounding_box: Polygon {
                vertices: vertices.iter().map(|&(x, y)| Vertex { x, y }).collect(),
            },
            block_type: "block".to_string(),
            classification: classification.map(str::to_string),
            confidence: None,
            explanation: None,
        }
    }

    fn image(page: u32, index: u32, width: Option<f64>, height: Option<f64>) -> ImageRecord {
        ImageRecord {
            page,
            image_index: index,
            xref: 7,
            extension: "jpeg".to_string(),
            size_bytes: 100,
            bounding_box: Some(SourceBox { x0: 0.0, y0: 0.0, x1: 100.0, y1: 200.0 }),
            page_width: width,
            page_height: height,
            safe_search: None,
            classification: Some("confidential".to_string()),
        }
    }

    #[test]
    fn test_text_ids_follow_page_and_position() {
        let pages = vec![
            vec![block(None, &[(0.0, 0.0), (1.0, 1.0)], Some("Public"))],
            vec![
                block(None, &[(0.0, 0.0)], None),
                block(None, &[(5.0, 5.0), (9.0, 2.0)], Some("unsafe")),
            ],
        ];
        let (doc, report) = load_document("doc", &pages, &[]);
        let ids: Vec<String> = doc.annotations().iter().map(|a| a.id.to_string()).collect();
        assert_eq!(ids, vec!["1-1", "2-2"]);
        assert_eq!(report.text_kept, 2);
        assert_eq!(report.text_skipped, 1);
        assert_eq!(doc.estimate_classification(), Some(Classification::Unsafe));
    }

    #[test]
    fn test_supplied_text_ids_are_kept_unless_image_like() {
        let pages = vec![vec![
            block(Some("block-a"), &[(0.0, 0.0), (1.0, 1.0)], None),
            block(Some("img-sneaky"), &[(0.0, 0.0), (1.0, 1.0)], None),
        ]];
        let (doc, _) = load_document("doc", &pages, &[]);
        let ids: Vec<String> = doc.annotations().iter().map(|a| a.id.to_string()).collect();
        assert_eq!(ids, vec!["block-a", "1-2"]);
        assert!(doc.annotations().iter().all(|a| a.mode() == ViewMode::Text));
    }

    #[test]
    fn test_images_are_normalized_and_bad_pages_skipped() {
        let records = vec![
            image(1, 0, Some(200.0), Some(400.0)),
            image(1, 1, Some(0.0), Some(400.0)),
            image(2, 0, None, Some(400.0)),
        ];
        let (doc, report) = load_document("doc", &[], &records);
        assert_eq!(report.images_kept, 1);
        assert_eq!(report.images_skipped, 2);

        let annotation = &doc.annotations()[0];
        assert_eq!(annotation.id.as_str(), "img-1-0");
        assert_eq!(annotation.mode(), ViewMode::Image);
        assert!((annotation.rect.end_x - 879.0).abs() < 1e-9);
        assert!((annotation.rect.end_y - 1137.5).abs() < 1e-9);
    }

    #[test]
    fn test_image_without_box_is_skipped_alone() {
        let mut boxless = image(1, 1, Some(200.0), Some(400.0));
        boxless.bounding_box = None;
        let records = vec![image(1, 0, Some(200.0), Some(400.0)), boxless, image(2, 0, Some(200.0), Some(400.0))];

        let (doc, report) = load_document("doc", &[], &records);
        assert_eq!(report.images_kept, 2);
        assert_eq!(report.images_skipped, 1);
        let ids: Vec<&str> = doc.annotations().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["img-1-0", "img-2-0"]);
    }

    #[test]
    fn test_store_keeps_geometry_and_metadata_in_step() {
        let pages = vec![vec![block(None, &[(0.0, 0.0), (3.0, 4.0)], Some("public"))]];
        let records = vec![image(1, 0, Some(612.0), Some(792.0))];
        let (doc, _) = load_document("doc", &pages, &records);
        for annotation in doc.annotations() {
            assert!(doc.metadata(&annotation.id).is_some());
        }
        assert_eq!(doc.len(), 2);
    }
}
