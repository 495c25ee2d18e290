mod cli;
mod commands;

use clap::Parser;
use cli::Args;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
  // Load .env before parsing so DOCREVIEW_API_URL can come from it
  let _ = dotenvy::dotenv();

  let args = Args::parse();

  let default_filter = if args.verbose {
    "docreview=info,docreview_rs=info"
  } else {
    "docreview=warn,docreview_rs=warn"
  };

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  if let Err(e) = commands::run(args).await {
    eprintln!("Error: {:#}", e);
    std::process::exit(1);
  }
}
