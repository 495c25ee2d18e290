use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Wire prefix marking image-derived annotation ids.
pub const IMAGE_ID_PREFIX: &str = "img-";

/// Which family of annotations the reviewer is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Text,
    Image,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Annotation identifier, tagged with the namespace it belongs to.
///
/// The wire form is a plain string; ids starting with `img-` are image annotations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnnotationId {
    Text(String),
    Image(String),
}

impl AnnotationId {
    /// Classifies a wire id by its prefix.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with(IMAGE_ID_PREFIX) {
            Self::Image(raw.to_string())
        } else {
            Self::Text(raw.to_string())
        }
    }

    /// Id for the `n`th (1-based) text block on `page`.
    pub fn text_block(page: u32, n: usize) -> Self {
        Self::Text(format!("{}-{}", page, n))
    }

    /// Id for an extracted image.
    pub fn image(page: u32, image_index: u32) -> Self {
        Self::Image(format!("{}{}-{}", IMAGE_ID_PREFIX, page, image_index))
    }

    pub fn mode(&self) -> ViewMode {
        match self {
            Self::Text(_) => ViewMode::Text,
            Self::Image(_) => ViewMode::Image,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Image(s) => s,
        }
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl From<String> for AnnotationId {
    fn from(raw: String) -> Self {
        if raw.starts_with(IMAGE_ID_PREFIX) {
            Self::Image(raw)
        } else {
            Self::Text(raw)
        }
    }
}

impl From<AnnotationId> for String {
    fn from(id: AnnotationId) -> Self {
        match id {
            AnnotationId::Text(s) | AnnotationId::Image(s) => s,
        }
    }
}

/// A rectangular region on one page of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    /// 1-based page number.
    pub page_number: u32,
    pub rect: Rect,
}

impl Annotation {
    pub fn mode(&self) -> ViewMode {
        self.id.mode()
    }
}

/// Splits annotations into `(text, image)` subsets, preserving order.
pub fn partition_by_mode(annotations: &[Annotation]) -> (Vec<&Annotation>, Vec<&Annotation>) {
    annotations.iter().partition(|a| a.mode() == ViewMode::Text)
}
