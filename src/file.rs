use std::path::PathBuf;

/// Number of leading bytes inspected by [`looks_binary`].
pub const BINARY_SAMPLE_SIZE: usize = 8192;

/// Fraction of control bytes above which a sample is treated as binary.
const CONTROL_THRESHOLD: f64 = 0.02;

/// Classification of one resolved file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Resolved but not read yet
    Pending,

    /// File is part of the combined output
    Included {
        /// Decoded text content
        content: String,
    },

    /// Content looked binary and the skip-binary policy is on
    SkippedBinary,

    /// File exceeded the size ceiling
    SkippedTooLarge,

    /// File could not be accessed or read
    SkippedUnreadable {
        /// Why the file could not be read
        reason: String,
    },
}

impl FileStatus {
    /// Short label used in diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Included { .. } => "included",
            Self::SkippedBinary => "binary",
            Self::SkippedTooLarge => "too large",
            Self::SkippedUnreadable { .. } => "unreadable",
        }
    }
}

/// A file produced by resolution and classified by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Absolute path to the file
    pub absolute_path: PathBuf,

    /// Display path, always using `/`
    pub relative_path: String,

    /// Size in bytes (as far as it could be determined)
    pub size_bytes: u64,

    /// Classification
    pub status: FileStatus,
}

impl ResolvedFile {
    /// Creates a record for a file that has not been read yet.
    #[must_use]
    pub(crate) const fn pending(absolute_path: PathBuf, relative_path: String) -> Self {
        Self {
            absolute_path,
            relative_path,
            size_bytes: 0,
            status: FileStatus::Pending,
        }
    }

    /// Creates a record for an entry that could not be accessed.
    #[must_use]
    pub(crate) fn unreadable(
        absolute_path: PathBuf,
        relative_path: String,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            absolute_path,
            relative_path,
            size_bytes: 0,
            status: FileStatus::SkippedUnreadable {
                reason: reason.into(),
            },
        }
    }

    /// Returns true if the file still waits for the loader.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, FileStatus::Pending)
    }

    /// Returns true if the file is part of the combined output.
    #[must_use]
    pub const fn is_included(&self) -> bool {
        matches!(self.status, FileStatus::Included { .. })
    }

    /// Returns the content if the file is included.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match &self.status {
            FileStatus::Included { content } => Some(content),
            _ => None,
        }
    }

    /// Returns the final path component, or the display path if there is none.
    #[must_use]
    pub fn basename(&self) -> &str {
        self.absolute_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.relative_path)
    }
}

/// Decides whether a byte sample looks like binary data.
///
/// The sample is capped at [`BINARY_SAMPLE_SIZE`] bytes. It is binary if it:
/// 1. Contains a NUL byte
/// 2. Contains a sequence that is not valid UTF-8 (a multi-byte character cut
///    off where the input was truncated to the sample size does not count)
/// 3. Has more than 2% control bytes other than tab, LF, VT, FF, CR and ESC
#[must_use]
pub fn looks_binary(sample: &[u8]) -> bool {
    let truncated = sample.len() > BINARY_SAMPLE_SIZE;
    let sample = &sample[..sample.len().min(BINARY_SAMPLE_SIZE)];
    if sample.is_empty() {
        return false;
    }

    if memchr::memchr(0, sample).is_some() {
        return true;
    }

    if let Err(e) = std::str::from_utf8(sample) {
        // error_len() is None only for an incomplete sequence at the very end
        if e.error_len().is_some() || !truncated {
            return true;
        }
    }

    let control = sample
        .iter()
        .filter(|&&b| b < 9 || ((14..32).contains(&b) && b != 27) || b == 127)
        .count();

    control as f64 > CONTROL_THRESHOLD * sample.len() as f64
}
