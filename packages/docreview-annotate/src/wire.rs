//! JSON shapes exchanged with the review backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::{SourceBox, Vertex};

/// A stored document as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default, alias = "uploadDate", deserialize_with = "lenient_timestamp")]
    pub upload_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub length: Option<u64>,
}

/// One page of the document listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPage {
    #[serde(default)]
    pub files: Vec<Document>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
}

/// A text block extracted by OCR, with its classification if one was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlockRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bounding_box: Polygon,
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Safe-search likelihood buckets, weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Likelihood {
    #[default]
    Unknown,
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

impl Likelihood {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "VERY_UNLIKELY" => Self::VeryUnlikely,
            "UNLIKELY" => Self::Unlikely,
            "POSSIBLE" => Self::Possible,
            "LIKELY" => Self::Likely,
            "VERY_LIKELY" => Self::VeryLikely,
            _ => Self::Unknown,
        }
    }

    /// Numeric codes follow the Cloud Vision enum (0 = unknown .. 5 = very likely).
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::VeryUnlikely,
            2 => Self::Unlikely,
            3 => Self::Possible,
            4 => Self::Likely,
            5 => Self::VeryLikely,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for Likelihood {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Code(i64),
            Missing(()),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Name(name) => Self::from_name(&name),
            Raw::Code(code) => Self::from_code(code),
            Raw::Missing(()) => Self::Unknown,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SafeSearch {
    #[serde(default)]
    pub adult: Likelihood,
    #[serde(default)]
    pub spoof: Likelihood,
    #[serde(default)]
    pub medical: Likelihood,
    #[serde(default)]
    pub violence: Likelihood,
    #[serde(default)]
    pub racy: Likelihood,
}

impl SafeSearch {
    /// Strongest signal among the categories that affect classification.
    pub fn worst(&self) -> Likelihood {
        self.adult.max(self.violence).max(self.racy)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An image extracted from a PDF page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub page: u32,
    pub image_index: u32,
    #[serde(default)]
    pub xref: i64,
    #[serde(default)]
    pub extension: String,
    #[serde(default)]
    pub size_bytes: u64,
    /// Native-space box. Records without one are skipped when loading.
    #[serde(default)]
    pub bounding_box: Option<SourceBox>,
    #[serde(default)]
    pub page_width: Option<f64>,
    #[serde(default)]
    pub page_height: Option<f64>,
    #[serde(default)]
    pub safe_search: Option<SafeSearch>,
    #[serde(default)]
    pub classification: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub filename: String,
    #[serde(default, alias = "pdf_file_id")]
    pub file_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiEditRequest {
    pub classification: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Accepts RFC 3339 or a naive ISO timestamp (taken as UTC); anything else becomes `None`.
fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_page_accepts_mongo_style_ids() {
        let json = r#"{
            "files": [
                {"_id": "abc", "filename": "a.pdf", "uploadDate": "2024-03-01T10:00:00.123", "length": 42},
                {"id": "def", "filename": "b.pdf", "upload_date": "not a date", "extra": true}
            ],
            "count": 2
        }"#;
        let page: DocumentPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.files[0].id, "abc");
        assert!(page.files[0].upload_date.is_some());
        assert_eq!(page.files[1].id, "def");
        assert!(page.files[1].upload_date.is_none());
    }

    #[test]
    fn test_text_block_record_defaults() {
        let json = r#"{"text": "Hello", "bounding_box": {"vertices": [{"x": 1, "y": 2}, {"x": 5}]}, "type": "block"}"#;
        let record: TextBlockRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.block_type, "block");
        assert_eq!(record.bounding_box.vertices[1], Vertex { x: 5.0, y: 0.0 });
        assert!(record.id.is_none());
        assert!(record.classification.is_none());
    }

    #[test]
    fn test_records_without_geometry_still_decode() {
        let json = r#"{"text": "Hello", "bounding_box": null, "type": "block"}"#;
        let record: TextBlockRecord = serde_json::from_str(json).unwrap();
        assert!(record.bounding_box.vertices.is_empty());

        let json = r#"[
            {"page": 1, "image_index": 0, "bounding_box": {"x0": 0, "y0": 0, "x1": 10, "y1": 10}, "page_width": 100, "page_height": 100},
            {"page": 1, "image_index": 1, "page_width": 100, "page_height": 100},
            {"page": 1, "image_index": 2, "bounding_box": null}
        ]"#;
        let images: Vec<ImageRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(images.len(), 3);
        assert!(images[0].bounding_box.is_some());
        assert!(images[1].bounding_box.is_none());
        assert!(images[2].bounding_box.is_none());
    }

    #[test]
    fn test_likelihood_accepts_names_and_codes() {
        let json = r#"{"adult": "VERY_UNLIKELY", "spoof": 3, "medical": null, "violence": "likely"}"#;
        let safe: SafeSearch = serde_json::from_str(json).unwrap();
        assert_eq!(safe.adult, Likelihood::VeryUnlikely);
        assert_eq!(safe.spoof, Likelihood::Possible);
        assert_eq!(safe.medical, Likelihood::Unknown);
        assert_eq!(safe.violence, Likelihood::Likely);
        assert_eq!(safe.racy, Likelihood::Unknown);
        assert_eq!(safe.worst(), Likelihood::Likely);
    }

    #[test]
    fn test_upload_response_accepts_either_id_field() {
        let a: UploadResponse = serde_json::from_str(r#"{"filename": "x.pdf", "pdf_file_id": "1", "message": "ok"}"#).unwrap();
        let b: UploadResponse = serde_json::from_str(r#"{"filename": "x.pdf", "file_id": "2", "message": "ok"}"#).unwrap();
        assert_eq!(a.file_id.as_deref(), Some("1"));
        assert_eq!(b.file_id.as_deref(), Some("2"));
    }
}
