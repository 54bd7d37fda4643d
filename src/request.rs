//! Decoding of the JSON request delivered on stdin.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::io::Read;
use tracing::debug;

const EXPECTED_SHAPE: &str = r#"{"paths":["path1","path2"],"workspace_root":"optional"}"#;

/// A single combine request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Request {
    /// Files or directories, in the order the caller selected them.
    pub paths: Vec<String>,

    /// Base for relative display paths.
    #[serde(default, alias = "workspaceRoot")]
    pub workspace_root: Option<String>,
}

impl Request {
    /// Creates a request directly, bypassing JSON decoding.
    #[must_use]
    pub fn new<I, S>(paths: I, workspace_root: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            workspace_root,
        }
    }

    /// Parses a request from a text blob.
    ///
    /// Unknown fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Input`] if the blob is empty, is not valid JSON of the
    /// expected shape, or names no paths.
    pub fn parse(blob: &str) -> Result<Self> {
        let blob = blob.trim();
        if blob.is_empty() {
            return Err(Error::input(format!(
                "No input provided. Expected JSON on stdin like: {EXPECTED_SHAPE}"
            )));
        }

        let request: Self = serde_json::from_str(blob).map_err(|e| {
            Error::input(format!(
                "Failed to parse JSON input ({e}). Expected format: {EXPECTED_SHAPE}"
            ))
        })?;

        if request.paths.is_empty() {
            return Err(Error::input("No paths provided in input JSON"));
        }

        debug!(
            "Decoded request: {} path(s), workspace_root={:?}",
            request.paths.len(),
            request.workspace_root
        );
        Ok(request)
    }

    /// Reads the whole input channel once and parses it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Input`] if reading fails or the blob is invalid.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut blob = String::new();
        reader
            .read_to_string(&mut blob)
            .map_err(|e| Error::input(format!("Failed to read request from stdin: {e}")))?;
        Self::parse(&blob)
    }
}
