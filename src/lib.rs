//! # file-combiner
//!
//! Turns a selection of files and folders into one text artifact for pasting
//! into a chat tool.
//!
//! ## Features
//!
//! - Deterministic, deduplicated directory expansion
//! - Per-file size ceiling and binary-content detection
//! - Header templates with `${index}`, `${relpath}` and `${basename}`
//! - Output to stdout (clipboard mode) or to a new temp file (temp mode)
//!
//! ## Quick Start
//!
//! ```no_run
//! use file_combiner::{Config, OutputMode, Request};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .mode(OutputMode::Clipboard)
//!     .header_format("File ${index}: ${relpath}")
//!     .separator("\\n---\\n")
//!     .build()?;
//!
//! let request = Request::parse(r#"{"paths":["README.md","src"],"workspace_root":"."}"#)?;
//! file_combiner::run(config, &request, &mut std::io::stdout().lock())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! One request flows through a pipeline:
//! 1. **Request**: decodes the JSON request
//! 2. **Resolver**: expands directories, deduplicates, computes display paths
//! 3. **Loader**: reads files, applies size and binary policy
//! 4. **Formatter**: renders headers and joins blocks
//! 5. **Output**: writes to stdout or a temp file

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod file;
mod formatter;
mod loader;
mod output;
mod pipeline;
mod request;
mod resolver;

pub use config::{
    unescape, Config, ConfigBuilder, OutputMode, DEFAULT_HEADER_FORMAT, DEFAULT_MAX_KB,
    DEFAULT_SEPARATOR,
};
pub use error::{Error, Result};
pub use file::{looks_binary, FileStatus, ResolvedFile, BINARY_SAMPLE_SIZE};
pub use formatter::{CombinedBlock, HeaderTemplate};
pub use output::CombinedOutput;
pub use pipeline::{CombineStats, Combined, Pipeline};
pub use request::Request;

/// Runs one request end to end, writing to `out`.
///
/// This is the main entry point for the library.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - No entry of the request resolves to a readable file
/// - Output cannot be written
pub fn run(
    config: Config,
    request: &Request,
    out: &mut impl std::io::Write,
) -> Result<CombinedOutput> {
    Pipeline::new(config)?.run(request, out).map(|(output, _)| output)
}
