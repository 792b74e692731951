//! Grabitar: screen captures with box and text annotations.
//!
//! The crate wires together:
//! - Screen acquisition with a placeholder fallback (capture/)
//! - The annotation model and its renderer (annotation/)
//! - Captures, their encodings, and the capture store (session/)
//! - A one-shot command line front end (cli.rs)

pub mod annotation;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod session;

pub use annotation::{Annotation, BoxAnnotation, FontBook, TextAnnotation};
pub use capture::{Region, ScreenSource};
pub use config::Config;
pub use error::{DecodeError, Error, Result};
pub use session::{Capture, CaptureMetadata, CaptureStore, OutputFormat};

/// Entry point for the `grabitar` binary.
pub fn run() {
    env_logger::init();

    match cli::main_with_args() {
        Ok(()) => {}
        // Help, version and usage errors print and exit the way clap wants.
        Err(cli::CliError::Args(e)) => e.exit(),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
