//! Batch PDF upload.
use anyhow::{anyhow, Context, Result};
use docreview_annotate::{ReviewBackend, UploadResponse};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};
use walkdir::WalkDir;

fn is_pdf(path: &Path) -> bool {
  path
    .extension()
    .and_then(|e| e.to_str())
    .map(|e| e.eq_ignore_ascii_case("pdf"))
    .unwrap_or(false)
}

/// Expands the given paths into PDF files. Directories are walked recursively;
/// files are taken as given so a mislabelled upload still reaches the backend.
pub fn collect_pdfs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
  let mut files = Vec::new();
  for path in paths {
    if path.is_dir() {
      let mut found: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_pdf(e.path()))
        .map(|e| e.into_path())
        .collect();
      found.sort();
      files.extend(found);
    } else if path.is_file() {
      files.push(path.clone());
    } else {
      return Err(anyhow!("No such file or directory: {}", path.display()));
    }
  }
  Ok(files)
}

/// Outcome of uploading one file.
#[derive(Debug)]
pub struct UploadOutcome {
  pub path: PathBuf,
  pub result: Result<UploadResponse>,
}

/// Uploads files one at a time. A failed file does not stop the rest.
pub async fn upload_all<B: ReviewBackend + ?Sized>(backend: &B, files: &[PathBuf]) -> Vec<UploadOutcome> {
  let mut outcomes = Vec::with_capacity(files.len());
  for (idx, path) in files.iter().enumerate() {
    info!("Uploading {}/{}: {}", idx + 1, files.len(), path.display());
    let result = upload_one(backend, path).await;
    if let Err(e) = &result {
      warn!("Upload failed for {}: {:#}", path.display(), e);
    }
    outcomes.push(UploadOutcome {
      path: path.clone(),
      result,
    });
  }
  outcomes
}

async fn upload_one<B: ReviewBackend + ?Sized>(backend: &B, path: &Path) -> Result<UploadResponse> {
  let bytes = fs::read(path)
    .await
    .with_context(|| format!("Failed to read {}", path.display()))?;
  let filename = path
    .file_name()
    .and_then(|n| n.to_str())
    .ok_or_else(|| anyhow!("Invalid file name: {}", path.display()))?;
  Ok(backend.upload_pdf(filename, bytes).await?)
}
