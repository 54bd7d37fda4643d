use crate::error::{Error, Result};
use std::path::PathBuf;

/// Default per-file size ceiling in KiB.
pub const DEFAULT_MAX_KB: u64 = 1024;

/// Default header template.
pub const DEFAULT_HEADER_FORMAT: &str = "file ${index}: ${relpath}";

/// Default separator, still escaped as it arrives from the command line.
pub const DEFAULT_SEPARATOR: &str = "\\n\\n";

/// Where the combined text is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Print the text on stdout for the caller to place on the clipboard.
    Clipboard,
    /// Write the text to a new temporary file and print its path.
    #[default]
    Temp,
}

impl OutputMode {
    /// Returns the command-line name of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clipboard => "clipboard",
            Self::Temp => "temp",
        }
    }
}

/// Configuration for a combine run.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Output sink
    pub mode: OutputMode,

    /// Header template, already unescaped
    pub header_format: String,

    /// Separator between blocks, already unescaped
    pub separator: String,

    /// Per-file ceiling in KiB
    pub max_kb: u64,

    /// Exclude files whose content looks binary
    pub skip_binary: bool,

    /// Directory for temp mode output; picked automatically when unset
    pub ram_dir: Option<PathBuf>,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use file_combiner::{Config, OutputMode};
    ///
    /// let config = Config::builder()
    ///     .mode(OutputMode::Clipboard)
    ///     .separator("\\n---\\n")
    ///     .build()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.separator, "\n---\n");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `max_kb` is zero or overflows a byte count
    /// - The header template is empty
    /// - `ram_dir` is set but is not an existing directory
    pub fn validate(&self) -> Result<()> {
        if self.max_kb == 0 {
            return Err(Error::config("max_kb must be greater than 0"));
        }

        if self.max_kb.checked_mul(1024).is_none() {
            return Err(Error::config(format!("max_kb ({}) is too large", self.max_kb)));
        }

        if self.header_format.is_empty() {
            return Err(Error::config("header_format must not be empty"));
        }

        if let Some(ref dir) = self.ram_dir {
            if !dir.is_dir() {
                return Err(Error::config(format!(
                    "ram_dir is not an existing directory: {}",
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Returns the per-file ceiling in bytes.
    #[must_use]
    pub const fn max_size_bytes(&self) -> u64 {
        self.max_kb.saturating_mul(1024)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            header_format: unescape(DEFAULT_HEADER_FORMAT),
            separator: unescape(DEFAULT_SEPARATOR),
            max_kb: DEFAULT_MAX_KB,
            skip_binary: true,
            ram_dir: None,
        }
    }
}

/// Builder for creating a [`Config`].
///
/// Header and separator are given in their escaped command-line form and
/// decoded by [`ConfigBuilder::build`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    mode: Option<OutputMode>,
    header_format: Option<String>,
    separator: Option<String>,
    max_kb: Option<u64>,
    skip_binary: Option<bool>,
    ram_dir: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Sets the output mode.
    #[must_use]
    pub fn mode(mut self, mode: OutputMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets the header template (escape sequences allowed).
    ///
    /// Recognized placeholders are `${index}`, `${relpath}` and `${basename}`.
    #[must_use]
    pub fn header_format(mut self, template: impl Into<String>) -> Self {
        self.header_format = Some(template.into());
        self
    }

    /// Sets the separator (escape sequences allowed).
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Sets the per-file ceiling in KiB.
    #[must_use]
    pub fn max_kb(mut self, max_kb: u64) -> Self {
        self.max_kb = Some(max_kb);
        self
    }

    /// Enables or disables skipping binary-looking files.
    #[must_use]
    pub fn skip_binary(mut self, enabled: bool) -> Self {
        self.skip_binary = Some(enabled);
        self
    }

    /// Sets the directory temp mode writes into.
    #[must_use]
    pub fn ram_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.ram_dir = Some(dir.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            mode: self.mode.unwrap_or_default(),
            header_format: unescape(
                self.header_format
                    .as_deref()
                    .unwrap_or(DEFAULT_HEADER_FORMAT),
            ),
            separator: unescape(self.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR)),
            max_kb: self.max_kb.unwrap_or(DEFAULT_MAX_KB),
            skip_binary: self.skip_binary.unwrap_or(true),
            ram_dir: self.ram_dir,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Decodes `\n`, `\r`, `\t`, `\0` and `\\` into their literal characters.
///
/// Any other backslash sequence, and a trailing lone backslash, is kept as is.
#[must_use]
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
