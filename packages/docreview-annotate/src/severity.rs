//! Classification labels and their severity ranking.

use std::fmt;

/// Canonical classification labels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Classification {
    Public,
    Confidential,
    Sensitive,
    Unsafe,
}

impl Classification {
    /// Parses a free-form label. Case, `_`/`-` separators and surrounding or repeated
    /// whitespace are ignored. `"highly sensitive"` is treated as `Sensitive`.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label
            .to_lowercase()
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        match normalized.as_str() {
            "public" => Some(Self::Public),
            "confidential" => Some(Self::Confidential),
            "sensitive" | "highly sensitive" => Some(Self::Sensitive),
            "unsafe" => Some(Self::Unsafe),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Confidential => "Confidential",
            Self::Sensitive => "Sensitive",
            Self::Unsafe => "Unsafe",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Severity rank of a label. Unknown, empty and missing labels rank above every
/// known classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Known(Classification),
    Unknown,
}

impl Severity {
    pub fn of(label: Option<&str>) -> Self {
        match label.and_then(Classification::parse) {
            Some(c) => Self::Known(c),
            None => Self::Unknown,
        }
    }

    /// Flagged for review: anything above `Public`, unknown included.
    pub fn is_critical(&self) -> bool {
        *self > Self::Known(Classification::Public)
    }
}

/// Reduces a set of labels to the worst known classification.
///
/// Empty labels are skipped and unknown labels never win. `None` means no label had a
/// determinable classification. The fold is order independent.
pub fn estimate_document_classification<'a, I>(labels: I) -> Option<Classification>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    labels
        .into_iter()
        .flatten()
        .filter(|label| !label.trim().is_empty())
        .filter_map(Classification::parse)
        .max()
}

/// Display form of an estimate.
pub fn describe_estimate(estimate: Option<Classification>) -> &'static str {
    estimate.map(|c| c.label()).unwrap_or("No classification")
}
