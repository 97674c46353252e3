//! PDFWatcher Dist - Release pipeline for the PDFWatcher desktop app.
//!
//! This binary runs the packaging pipeline that turns the PDFWatcher entry
//! script into a standalone windowed distributable and publishes it as a
//! named build artifact.

mod cli;
mod error;
mod manifest;
mod pipeline;
mod trigger;

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
