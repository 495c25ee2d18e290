//! Implementations of the `docreview` subcommands.
use anyhow::{anyhow, bail, Context, Result};
use docreview_annotate::{
  describe_estimate, AnnotationId, AnnotationMetadata, Direction, DocumentAnnotations, ReviewBackend, ViewMode,
};
use docreview_rs::{
  collect_pdfs, upload_all, HttpBackend, OpenOutcome, ReviewConfig, ReviewReport, ReviewReportOptions, ReviewSession,
  SessionError, TracingHost,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::cli::{Args, Commands};

const REVIEW_HELP: &str = "commands: n/p next/previous, cn/cp next/previous flagged, m text|image, \
j <id> jump, c <id> click, s status, q quit";

pub async fn run(args: Args) -> Result<()> {
  if let Commands::Version = args.command {
    println!("docreview {}", env!("CARGO_PKG_VERSION"));
    return Ok(());
  }

  let config = ReviewConfig::load(args.config.as_deref())?.with_api_url(args.api_url);
  info!("Using backend at {}", config.api_url);
  let backend = Arc::new(HttpBackend::new(&config)?);

  match args.command {
    Commands::Version => Ok(()),
    Commands::List { limit, skip } => list(&backend, limit.unwrap_or(config.page_size), skip).await,
    Commands::Upload { paths } => upload(&backend, &paths).await,
    Commands::Download { id, output } => download(&backend, &id, output).await,
    Commands::Annotations { id, mode, critical } => {
      let session = open(backend, &id).await?;
      let doc = session.document().await.ok_or_else(|| anyhow!("Document {} is not loaded", id))?;
      print_annotations(&doc, mode.map(ViewMode::from), critical);
      Ok(())
    }
    Commands::Classify { id } => {
      let session = open(backend, &id).await?;
      let estimate = session.estimate_classification().await?;
      println!("{}", describe_estimate(estimate));
      Ok(())
    }
    Commands::Review { id, mode } => {
      let session = open(backend, &id).await?;
      review(&session, mode.into()).await
    }
    Commands::Report { id, output } => {
      let title = match backend.find_document(&id, config.page_size).await {
        Ok(doc) => doc.map(|d| d.filename).filter(|f| !f.is_empty()),
        Err(e) => {
          warn!("Could not look up document {}: {}", id, e);
          None
        }
      };
      let session = open(backend, &id).await?;
      let doc = session.document().await.ok_or_else(|| anyhow!("Document {} is not loaded", id))?;
      let to_stdout = output.is_none();
      let report = ReviewReport::new(ReviewReportOptions {
        output_file_path: output,
        title,
        verbose: true,
      });
      let result = report.generate(&doc).await?;
      if to_stdout {
        print!("{}", result.markdown);
      }
      Ok(())
    }
    Commands::Suggest {
      classification,
      suggestion,
    } => {
      let message = backend.ai_edit(&classification, &suggestion).await?;
      println!("{}", message);
      Ok(())
    }
  }
}

async fn open(backend: Arc<HttpBackend>, id: &str) -> Result<ReviewSession<HttpBackend>> {
  let session = ReviewSession::new(backend, Box::new(TracingHost::new()));
  match session
    .open_document(id)
    .await
    .with_context(|| format!("Failed to load annotations for {}", id))?
  {
    OpenOutcome::Applied(report) => {
      if report.skipped() > 0 {
        info!("Skipped {} annotations with unusable geometry", report.skipped());
      }
      Ok(session)
    }
    OpenOutcome::Discarded => Err(anyhow!("Loading {} was superseded", id)),
  }
}

async fn list(backend: &HttpBackend, limit: u32, skip: u32) -> Result<()> {
  let page = backend.list_documents(limit, skip).await?;
  for doc in &page.files {
    let uploaded = doc
      .upload_date
      .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
      .unwrap_or_else(|| "-".to_string());
    let size = doc.length.map(|l| format!("{} bytes", l)).unwrap_or_default();
    println!("{}  {}  {}  {}", doc.id, uploaded, doc.filename, size);
  }
  if page.files.is_empty() {
    println!("No documents (total {})", page.count);
  } else {
    println!("Showing {} of {}", showing_range(skip, page.files.len()), page.count);
  }
  Ok(())
}

/// 1-based range label for a listing page.
fn showing_range(skip: u32, shown: usize) -> String {
  let first = u64::from(skip) + 1;
  format!("{}-{}", first, u64::from(skip) + shown as u64)
}

async fn upload(backend: &HttpBackend, paths: &[PathBuf]) -> Result<()> {
  let files = collect_pdfs(paths)?;
  if files.is_empty() {
    bail!("No PDF files found");
  }

  let outcomes = upload_all(backend, &files).await;
  let mut failed = 0;
  for outcome in &outcomes {
    match &outcome.result {
      Ok(resp) => println!(
        "{}: {} ({})",
        outcome.path.display(),
        resp.file_id.as_deref().unwrap_or("-"),
        resp.message
      ),
      Err(e) => {
        failed += 1;
        println!("{}: failed: {:#}", outcome.path.display(), e);
      }
    }
  }

  if failed > 0 {
    bail!("{} of {} uploads failed", failed, outcomes.len());
  }
  Ok(())
}

async fn download(backend: &HttpBackend, id: &str, output: Option<PathBuf>) -> Result<()> {
  let bytes = backend.download_document(id).await?;
  let path = output.unwrap_or_else(|| PathBuf::from(format!("{}.pdf", id)));
  tokio::fs::write(&path, &bytes)
    .await
    .with_context(|| format!("Failed to write {}", path.display()))?;
  println!("Saved {} bytes to {}", bytes.len(), path.display());
  Ok(())
}

fn print_annotations(doc: &DocumentAnnotations, mode: Option<ViewMode>, critical_only: bool) {
  for annotation in doc.annotations() {
    if mode.is_some_and(|m| m != annotation.mode()) {
      continue;
    }
    let metadata = doc.metadata(&annotation.id);
    let critical = metadata.map(AnnotationMetadata::is_critical).unwrap_or(true);
    if critical_only && !critical {
      continue;
    }
    println!("{}", describe_annotation(doc, &annotation.id));
  }
}

fn describe_annotation(doc: &DocumentAnnotations, id: &AnnotationId) -> String {
  let Some((annotation, metadata)) = doc.get(id) else {
    return format!("{} (unknown)", id);
  };
  let r = &annotation.rect;
  let label = metadata.classification().unwrap_or("unclassified");
  let flag = if metadata.is_critical() { "!" } else { " " };
  let detail = match metadata {
    AnnotationMetadata::Text(m) => m.text.lines().next().unwrap_or("").chars().take(60).collect::<String>(),
    AnnotationMetadata::Image(m) => format!("{} image, {} bytes", m.extension, m.size_bytes),
  };
  format!(
    "{} {:<12} p{:<3} [{:.1}, {:.1}, {:.1}, {:.1}] {:<14} {}",
    flag, annotation.id, annotation.page_number, r.start_x, r.start_y, r.end_x, r.end_y, label, detail
  )
}

async fn review(session: &ReviewSession<HttpBackend>, mode: ViewMode) -> Result<()> {
  session.switch_mode(mode).await?;
  let doc = session
    .document()
    .await
    .ok_or_else(|| anyhow!("No document loaded"))?;

  println!(
    "{} annotations, estimated classification {}",
    doc.len(),
    describe_estimate(doc.estimate_classification())
  );
  println!("{}", REVIEW_HELP);

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  while let Some(line) = lines.next_line().await? {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or("");
    let arg = parts.next();

    let result = match (command, arg) {
      ("", _) => continue,
      ("q", _) | ("quit", _) => break,
      ("n", _) => session.navigate(Direction::Next, false).await.map(|_| ()),
      ("p", _) => session.navigate(Direction::Previous, false).await.map(|_| ()),
      ("cn", _) => session.navigate(Direction::Next, true).await.map(|_| ()),
      ("cp", _) => session.navigate(Direction::Previous, true).await.map(|_| ()),
      ("m", Some("text")) => session.switch_mode(ViewMode::Text).await,
      ("m", Some("image")) => session.switch_mode(ViewMode::Image).await,
      ("j", Some(id)) => session.jump_to(id).await.map(|_| ()),
      ("c", Some(id)) => session.click(id).await.map(|selection| {
        if !selection.is_selected() {
          println!("{} belongs to the other view, selection cleared", id);
        }
      }),
      ("s", _) => Ok(()),
      _ => {
        println!("{}", REVIEW_HELP);
        continue;
      }
    };

    match result {
      Ok(()) => print_status(session, &doc).await,
      Err(SessionError::UnknownAnnotation(id)) => println!("No annotation {}", id),
      Err(e) => return Err(e.into()),
    }
  }
  Ok(())
}

async fn print_status(session: &ReviewSession<HttpBackend>, doc: &DocumentAnnotations) {
  let snap = session.snapshot().await;
  let position = if snap.total == 0 {
    "0/0".to_string()
  } else {
    format!("{}/{}", snap.index + 1, snap.total)
  };
  let header = format!("[{} {} | {} flagged]", snap.mode, position, snap.critical);
  match (snap.selection.id(), &snap.current) {
    (Some(id), _) => println!("{} {}", header, describe_annotation(doc, id)),
    (None, Some(cursor)) => println!("{} nothing selected, cursor on {}", header, cursor),
    (None, None) => println!("{} nothing selected", header),
  }
}
