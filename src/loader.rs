use crate::{
    config::Config,
    file::{looks_binary, FileStatus, ResolvedFile},
};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, trace};

/// Reads resolved files and applies the size and binary policies.
pub(crate) struct Loader {
    max_size_bytes: u64,
    skip_binary: bool,
}

/// Outcome of reading one file's bytes.
enum ReadOutcome {
    Fits(Vec<u8>),
    TooLarge(u64),
}

impl Loader {
    /// Creates a new loader from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            max_size_bytes: config.max_size_bytes(),
            skip_binary: config.skip_binary,
        }
    }

    /// Classifies every pending file in place.
    ///
    /// Records already classified, such as entries the resolver marked
    /// unreadable, are left untouched.
    pub(crate) fn load_all(&self, files: &mut [ResolvedFile]) {
        for file in files.iter_mut().filter(|f| f.is_pending()) {
            self.load(file);
        }
    }

    /// Reads one file and sets its size and status.
    pub(crate) fn load(&self, file: &mut ResolvedFile) {
        trace!("Loading {}", file.relative_path);

        let outcome = match self.read_capped(&file.absolute_path) {
            Ok(outcome) => outcome,
            Err(e) => {
                file.status = FileStatus::SkippedUnreadable {
                    reason: e.to_string(),
                };
                debug!(
                    "  -> Skipped {}: {} ({})",
                    file.relative_path,
                    file.status.label(),
                    e
                );
                return;
            }
        };

        match outcome {
            ReadOutcome::TooLarge(size) => {
                file.size_bytes = size;
                file.status = FileStatus::SkippedTooLarge;
                debug!(
                    "  -> Skipped {}: {} ({} bytes > {} bytes)",
                    file.relative_path,
                    file.status.label(),
                    size,
                    self.max_size_bytes
                );
            }
            ReadOutcome::Fits(bytes) => {
                file.size_bytes = bytes.len() as u64;

                if self.skip_binary && looks_binary(&bytes) {
                    file.status = FileStatus::SkippedBinary;
                    debug!("  -> Skipped {}: {}", file.relative_path, file.status.label());
                    return;
                }

                file.status = FileStatus::Included {
                    content: decode_lossy(bytes),
                };
                debug!(
                    "  -> {} {}: {} bytes",
                    file.status.label(),
                    file.relative_path,
                    file.size_bytes
                );
            }
        }
    }

    /// Reads at most the ceiling plus one probe byte.
    fn read_capped(&self, path: &Path) -> std::io::Result<ReadOutcome> {
        let file = File::open(path)?;
        let reported = file.metadata().map(|md| md.len()).unwrap_or(0);

        let mut bytes = Vec::new();
        file.take(self.max_size_bytes.saturating_add(1))
            .read_to_end(&mut bytes)?;

        if bytes.len() as u64 > self.max_size_bytes {
            return Ok(ReadOutcome::TooLarge(reported.max(bytes.len() as u64)));
        }

        Ok(ReadOutcome::Fits(bytes))
    }
}

/// Decodes bytes as UTF-8, replacing invalid sequences with U+FFFD.
fn decode_lossy(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
