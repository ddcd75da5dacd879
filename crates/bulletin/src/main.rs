//! Bulletin CLI binary.
//!
//! Runs the event bulletin pipeline for one date:
//! research, write the script, storyboard, film, produce and write the post.

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    if let Err(e) = cli::run_pipeline(cli).await {
        tracing::error!(error = %e, "Run failed");
        return Err(e.into());
    }

    Ok(())
}
