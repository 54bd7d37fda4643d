use crate::{
    config::{Config, OutputMode},
    error::{Error, Result},
};
use std::{
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::Builder as TempBuilder;
use tracing::debug;

const TEMP_PREFIX: &str = "combined-";
const TEMP_SUFFIX: &str = ".txt";

/// Terminal artifact of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombinedOutput {
    /// Text was written to the primary output stream.
    Clipboard {
        /// The combined text
        text: String,
    },
    /// Text was written to a new file whose path was printed.
    Temp {
        /// Absolute path of the new file
        path: PathBuf,
    },
}

impl CombinedOutput {
    /// Returns the output mode that produced this artifact.
    #[must_use]
    pub const fn mode(&self) -> OutputMode {
        match self {
            Self::Clipboard { .. } => OutputMode::Clipboard,
            Self::Temp { .. } => OutputMode::Temp,
        }
    }
}

/// Delivers combined text to stdout or to a temp file.
pub(crate) struct OutputSink {
    mode: OutputMode,
    temp_dir: PathBuf,
}

impl OutputSink {
    /// Creates a new sink from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            mode: config.mode,
            temp_dir: pick_temp_dir(config.ram_dir.as_deref()),
        }
    }

    /// Emits `text` according to the configured mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`] if writing to `out` fails or the temp file
    /// cannot be created, written, or kept.
    pub(crate) fn emit(&self, text: &str, out: &mut impl Write) -> Result<CombinedOutput> {
        match self.mode {
            OutputMode::Clipboard => {
                debug!("Output mode: clipboard, {} bytes", text.len());
                out.write_all(text.as_bytes())
                    .and_then(|()| out.flush())
                    .map_err(|e| Error::stdout(&e))?;

                Ok(CombinedOutput::Clipboard {
                    text: text.to_string(),
                })
            }
            OutputMode::Temp => {
                debug!("Output mode: temp file in {}", self.temp_dir.display());
                let path = self.write_temp(text)?;

                writeln!(out, "{}", path.display())
                    .and_then(|()| out.flush())
                    .map_err(|e| Error::stdout(&e))?;

                Ok(CombinedOutput::Temp { path })
            }
        }
    }

    /// Writes `text` to a new uniquely named file that outlives the process.
    fn write_temp(&self, text: &str) -> Result<PathBuf> {
        let mut file = TempBuilder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&self.temp_dir)
            .map_err(|e| Error::output(&self.temp_dir, &e))?;

        file.write_all(text.as_bytes())
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| Error::output(file.path(), &e))?;

        let (_, path) = file
            .keep()
            .map_err(|e| Error::output(&self.temp_dir, &e.error))?;

        debug!("Wrote {} bytes to {}", text.len(), path.display());
        Ok(std::path::absolute(&path).unwrap_or(path))
    }
}

/// Chooses the directory for temp mode output.
///
/// An explicit directory wins. On Linux the per-user runtime directory and
/// `/dev/shm` are preferred since they are memory backed.
pub(crate) fn pick_temp_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(xdg) = std::env::var_os("XDG_RUNTIME_DIR") {
            let dir = PathBuf::from(xdg);
            if dir.is_dir() {
                return dir;
            }
        }
        let shm = Path::new("/dev/shm");
        if shm.is_dir() {
            return shm.to_path_buf();
        }
    }

    std::env::temp_dir()
}
