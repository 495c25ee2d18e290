//! Markdown summary of a document's review state.
use anyhow::{Context, Result};
use chrono::Utc;
use docreview_annotate::{describe_estimate, Annotation, AnnotationMetadata, DocumentAnnotations, ViewMode};
use std::path::PathBuf;
use tokio::fs;

/// Configuration that controls how the report is produced.
pub struct ReviewReportOptions {
  pub output_file_path: Option<PathBuf>,
  /// Title shown instead of the document id, usually the uploaded filename
  pub title: Option<String>,
  pub verbose: bool,
}

impl Default for ReviewReportOptions {
  fn default() -> Self {
    Self {
      output_file_path: None,
      title: None,
      verbose: true,
    }
  }
}

/// Result returned after a report run.
#[derive(Debug, Clone)]
pub struct ReviewReportResult {
  pub markdown: String,
  pub written_to: Option<PathBuf>,
  pub flagged: usize,
}

pub struct ReviewReport {
  options: ReviewReportOptions,
}

impl ReviewReport {
  pub fn new(options: ReviewReportOptions) -> Self {
    Self { options }
  }

  /// Renders the markdown for `doc`.
  pub fn render(&self, doc: &DocumentAnnotations) -> String {
    let title = self
      .options
      .title
      .clone()
      .unwrap_or_else(|| doc.document_id().to_string());

    let mut markdown = format!("# Review: {}\n\n", title);
    markdown.push_str(&format!("- Document: `{}`\n", doc.document_id()));
    markdown.push_str(&format!(
      "- Estimated classification: **{}**\n",
      describe_estimate(doc.estimate_classification())
    ));
    markdown.push_str(&format!("- Generated: {}\n", Utc::now().to_rfc3339()));

    for mode in [ViewMode::Text, ViewMode::Image] {
      let rows: Vec<&Annotation> = doc.in_mode(mode).collect();
      markdown.push_str(&format!(
        "\n## {} annotations ({}, {} flagged)\n\n",
        capitalize(mode.as_str()),
        rows.len(),
        doc.critical_count(mode)
      ));

      if rows.is_empty() {
        markdown.push_str("_None._\n");
        continue;
      }

      markdown.push_str("| Id | Page | Rect | Classification | Confidence | Flagged | Detail |\n");
      markdown.push_str("|----|------|------|----------------|------------|---------|--------|\n");
      for annotation in rows {
        markdown.push_str(&row(annotation, doc.metadata(&annotation.id)));
      }
    }

    markdown
  }

  /// Renders the report and writes it when an output path is configured.
  pub async fn generate(&self, doc: &DocumentAnnotations) -> Result<ReviewReportResult> {
    let markdown = self.render(doc);
    let flagged = doc.critical_count(ViewMode::Text) + doc.critical_count(ViewMode::Image);

    if let Some(path) = &self.options.output_file_path {
      fs::write(path, &markdown)
        .await
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
      if self.options.verbose {
        println!("Review report created at {}", path.display());
      }
    }

    Ok(ReviewReportResult {
      markdown,
      written_to: self.options.output_file_path.clone(),
      flagged,
    })
  }
}

fn row(annotation: &Annotation, metadata: Option<&AnnotationMetadata>) -> String {
  let r = &annotation.rect;
  let rect = format!("{:.1},{:.1} → {:.1},{:.1}", r.start_x, r.start_y, r.end_x, r.end_y);
  let classification = metadata.and_then(|m| m.classification()).unwrap_or("-");
  let flagged = metadata.map(|m| m.is_critical()).unwrap_or(true);

  let (confidence, detail) = match metadata {
    Some(AnnotationMetadata::Text(m)) => (
      m.confidence.map(|c| format!("{:.2}", c)).unwrap_or_default(),
      m.explanation.clone().unwrap_or_else(|| preview(&m.text)),
    ),
    Some(AnnotationMetadata::Image(m)) => (
      String::new(),
      format!("{} image, {} bytes", m.extension, m.size_bytes),
    ),
    None => (String::new(), String::new()),
  };

  format!(
    "| {} | {} | {} | {} | {} | {} | {} |\n",
    annotation.id,
    annotation.page_number,
    rect,
    classification,
    confidence,
    if flagged { "yes" } else { "" },
    escape_cell(&detail)
  )
}

fn preview(text: &str) -> String {
  let line = text.lines().next().unwrap_or("");
  if line.chars().count() > 60 {
    format!("{}…", line.chars().take(60).collect::<String>())
  } else {
    line.to_string()
  }
}

fn escape_cell(text: &str) -> String {
  text.replace('|', "\\|").replace('\n', " ")
}

fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
