//! Reference-space geometry for annotation overlays.
//!
//! All annotation rectangles live on a fixed 1758 x 2275 canvas so overlay math does
//! not depend on the size any particular page is rendered at.

use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, AnnotationId};

/// Width of the reference canvas.
pub const REFERENCE_WIDTH: f64 = 1758.0;
/// Height of the reference canvas.
pub const REFERENCE_HEIGHT: f64 = 2275.0;

/// Axis-aligned box in a page's native pixel space, corners in any order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// A polygon vertex as emitted by OCR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Native dimensions of a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Rectangle in reference space. `start_*` is never greater than `end_*` when built
/// through [`normalize_box`] or [`reduce_vertices`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl Rect {
    /// Builds a rect from two corners, ordering each axis.
    pub fn from_corners(ax: f64, ay: f64, bx: f64, by: f64) -> Self {
        Self {
            start_x: ax.min(bx),
            start_y: ay.min(by),
            end_x: ax.max(bx),
            end_y: ay.max(by),
        }
    }

    pub fn width(&self) -> f64 {
        self.end_x - self.start_x
    }

    pub fn height(&self) -> f64 {
        self.end_y - self.start_y
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.start_x && x <= self.end_x && y >= self.start_y && y <= self.end_y
    }
}

/// Scales a native-space box into reference space.
///
/// Returns `None` when the page has no usable dimensions; the caller should skip the
/// record. Degenerate and out-of-bounds boxes are passed through scaled but otherwise
/// untouched.
pub fn normalize_box(source: &SourceBox, page: PageSize) -> Option<Rect> {
    if !page.is_usable() {
        return None;
    }

    let scale_x = REFERENCE_WIDTH / page.width;
    let scale_y = REFERENCE_HEIGHT / page.height;

    Some(Rect::from_corners(
        source.x0 * scale_x,
        source.y0 * scale_y,
        source.x1 * scale_x,
        source.y1 * scale_y,
    ))
}

/// Reduces an OCR polygon to its bounding rectangle.
///
/// Vertices are expected in reference space already. Fewer than two vertices cannot
/// describe a region, so no annotation is produced.
pub fn reduce_vertices(vertices: &[Vertex], page_number: u32, id: AnnotationId) -> Option<Annotation> {
    if vertices.len() < 2 {
        return None;
    }

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for v in vertices {
        min_x = min_x.min(v.x);
        min_y = min_y.min(v.y);
        max_x = max_x.max(v.x);
        max_y = max_y.max(v.y);
    }

    Some(Annotation {
        id,
        page_number,
        rect: Rect {
            start_x: min_x,
            start_y: min_y,
            end_x: max_x,
            end_y: max_y,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_id(s: &str) -> AnnotationId {
        AnnotationId::Text(s.to_string())
    }

    #[test]
    fn test_normalize_scales_each_axis() {
        let source = SourceBox { x0: 0.0, y0: 0.0, x1: 100.0, y1: 200.0 };
        let rect = normalize_box(&source, PageSize::new(200.0, 400.0)).unwrap();
        assert_eq!(rect.start_x, 0.0);
        assert_eq!(rect.start_y, 0.0);
        assert!((rect.end_x - 879.0).abs() < 1e-9);
        assert!((rect.end_y - 1137.5).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_orders_swapped_corners() {
        let source = SourceBox { x0: 300.0, y0: 90.0, x1: 10.0, y1: 5.0 };
        let rect = normalize_box(&source, PageSize::new(612.0, 792.0)).unwrap();
        assert!(rect.start_x <= rect.end_x);
        assert!(rect.start_y <= rect.end_y);
    }

    #[test]
    fn test_normalize_ordering_holds_for_many_boxes() {
        let pages = [PageSize::new(1.0, 1.0), PageSize::new(612.0, 792.0), PageSize::new(3000.0, 17.5)];
        let coords = [-50.0, 0.0, 12.5, 400.0, 9999.0];
        for page in pages {
            for &x0 in &coords {
                for &x1 in &coords {
                    for &y0 in &coords {
                        let source = SourceBox { x0, y0, x1, y1: y0 * -0.5 };
                        let rect = normalize_box(&source, page).unwrap();
                        assert!(rect.start_x <= rect.end_x);
                        assert!(rect.start_y <= rect.end_y);
                    }
                }
            }
        }
    }

    #[test]
    fn test_normalize_rejects_unusable_pages() {
        let source = SourceBox { x0: 0.0, y0: 0.0, x1: 1.0, y1: 1.0 };
        assert!(normalize_box(&source, PageSize::new(0.0, 400.0)).is_none());
        assert!(normalize_box(&source, PageSize::new(200.0, 0.0)).is_none());
        assert!(normalize_box(&source, PageSize::new(-1.0, 400.0)).is_none());
        assert!(normalize_box(&source, PageSize::new(f64::NAN, 400.0)).is_none());
    }

    #[test]
    fn test_normalize_passes_degenerate_box_through() {
        let source = SourceBox { x0: 10.0, y0: 10.0, x1: 10.0, y1: 10.0 };
        let rect = normalize_box(&source, PageSize::new(1758.0, 2275.0)).unwrap();
        assert_eq!(rect.width(), 0.0);
        assert_eq!(rect.height(), 0.0);
    }

    #[test]
    fn test_reduce_contains_every_vertex() {
        let vertices = vec![
            Vertex { x: 40.0, y: 12.0 },
            Vertex { x: 3.0, y: 80.0 },
            Vertex { x: 25.0, y: 0.5 },
            Vertex { x: 60.0, y: 44.0 },
        ];
        let annotation = reduce_vertices(&vertices, 2, text_id("2-1")).unwrap();
        assert_eq!(annotation.page_number, 2);
        assert_eq!(annotation.rect, Rect { start_x: 3.0, start_y: 0.5, end_x: 60.0, end_y: 80.0 });
        for v in &vertices {
            assert!(annotation.rect.contains(v.x, v.y));
        }
    }

    #[test]
    fn test_reduce_needs_two_vertices() {
        assert!(reduce_vertices(&[], 1, text_id("1-1")).is_none());
        assert!(reduce_vertices(&[Vertex { x: 1.0, y: 1.0 }], 1, text_id("1-1")).is_none());
        assert!(reduce_vertices(&[Vertex { x: 1.0, y: 1.0 }, Vertex { x: 2.0, y: 3.0 }], 1, text_id("1-1")).is_some());
    }
}
