//! Command line arguments backing the `docreview` binary.
use clap::{Parser, Subcommand, ValueEnum};
use docreview_annotate::ViewMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
  name = "docreview",
  about = "A CLI tool for uploading PDFs and reviewing their sensitivity annotations",
  version
)]
pub struct Args {
  /// Base URL of the review backend (overrides the config file)
  #[arg(long, global = true, env = "DOCREVIEW_API_URL")]
  pub api_url: Option<String>,

  /// Path to a TOML config file
  #[arg(long, global = true)]
  pub config: Option<PathBuf>,

  /// Log progress to stderr
  #[arg(long, short = 'v', global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
  Text,
  Image,
}

impl From<ModeArg> for ViewMode {
  fn from(mode: ModeArg) -> Self {
    match mode {
      ModeArg::Text => ViewMode::Text,
      ModeArg::Image => ViewMode::Image,
    }
  }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Print version information
  Version,
  /// List uploaded documents
  List {
    /// Number of documents to fetch (defaults to the configured page size)
    #[arg(long, short = 'n')]
    limit: Option<u32>,

    /// Number of documents to skip
    #[arg(long, default_value = "0")]
    skip: u32,
  },
  /// Upload PDF files, or every PDF under the given directories
  Upload {
    #[arg(required = true)]
    paths: Vec<PathBuf>,
  },
  /// Download a document's PDF
  Download {
    id: String,

    /// Output file path (defaults to <id>.pdf)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
  },
  /// Print a document's annotations in reference coordinates
  Annotations {
    id: String,

    /// Only show annotations of this kind
    #[arg(long, short = 'm', value_enum)]
    mode: Option<ModeArg>,

    /// Only show flagged annotations
    #[arg(long)]
    critical: bool,
  },
  /// Estimate a document's overall classification
  Classify { id: String },
  /// Step through a document's annotations interactively (reads commands from stdin)
  Review {
    id: String,

    /// Annotation kind to start in
    #[arg(long, short = 'm', value_enum, default_value = "text")]
    mode: ModeArg,
  },
  /// Write a markdown review report for a document
  Report {
    id: String,

    /// Output file path for the report (prints to stdout when omitted)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
  },
  /// Ask the backend agent to edit content of a given classification
  Suggest {
    #[arg(long, short = 'c')]
    classification: String,

    #[arg(long, short = 's')]
    suggestion: String,
  },
}
