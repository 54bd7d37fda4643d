use crate::{
    config::Config,
    error::{Error, Result},
    file::{FileStatus, ResolvedFile},
    formatter::Formatter,
    loader::Loader,
    output::{CombinedOutput, OutputSink},
    request::Request,
    resolver::Resolver,
};
use serde::Serialize;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Statistics collected during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CombineStats {
    /// Records produced by resolution, skipped ones included
    pub resolved_files: usize,

    /// Files that made it into the output
    pub included_files: usize,

    /// Files skipped as binary
    pub skipped_binary: usize,

    /// Files skipped for exceeding the size ceiling
    pub skipped_too_large: usize,

    /// Entries that could not be read
    pub skipped_unreadable: usize,

    /// Bytes of source content included
    pub included_bytes: u64,

    /// Time spent resolving paths
    pub resolve_duration: Duration,

    /// Time spent reading files
    pub load_duration: Duration,
}

impl CombineStats {
    /// Tallies classified files.
    #[must_use]
    pub fn from_files(files: &[ResolvedFile]) -> Self {
        let mut stats = Self {
            resolved_files: files.len(),
            ..Self::default()
        };

        for file in files {
            match file.status {
                FileStatus::Pending => {}
                FileStatus::Included { .. } => {
                    stats.included_files += 1;
                    stats.included_bytes += file.size_bytes;
                }
                FileStatus::SkippedBinary => stats.skipped_binary += 1,
                FileStatus::SkippedTooLarge => stats.skipped_too_large += 1,
                FileStatus::SkippedUnreadable { .. } => stats.skipped_unreadable += 1,
            }
        }

        stats
    }

    /// Total number of skipped records.
    #[must_use]
    pub const fn skipped_files(&self) -> usize {
        self.skipped_binary + self.skipped_too_large + self.skipped_unreadable
    }
}

/// Combined text together with the classified files it was built from.
#[derive(Debug, Clone)]
pub struct Combined {
    /// Joined, trimmed text
    pub text: String,

    /// Every resolved record, in output order
    pub files: Vec<ResolvedFile>,

    /// Run statistics
    pub stats: CombineStats,
}

/// Orchestrates resolve, load, format and output for one request.
pub struct Pipeline {
    config: Config,
    loader: Loader,
    formatter: Formatter,
    sink: OutputSink,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let loader = Loader::new(&config);
        let formatter = Formatter::new(&config.header_format, config.separator.clone());
        let sink = OutputSink::new(&config);

        Ok(Self {
            config,
            loader,
            formatter,
            sink,
        })
    }

    /// Resolves, loads and formats the request without emitting anything.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if no entry of the request resolves to a
    /// readable file. Files skipped by size or binary policy do not count as a
    /// failure.
    pub fn combine(&self, request: &Request) -> Result<Combined> {
        let resolve_start = Instant::now();
        let resolver = Resolver::new(request.workspace_root.as_deref());
        let mut files = resolver.resolve(&request.paths);
        let resolve_duration = resolve_start.elapsed();

        if !files.iter().any(ResolvedFile::is_pending) {
            let reasons: Vec<String> = files
                .iter()
                .filter_map(|f| match &f.status {
                    FileStatus::SkippedUnreadable { reason } => {
                        Some(format!("{}: {}", f.relative_path, reason))
                    }
                    _ => None,
                })
                .collect();

            let mut message = format!("No files found from provided paths: {:?}", request.paths);
            if !reasons.is_empty() {
                message.push('\n');
                message.push_str(&reasons.join("\n"));
            }
            return Err(Error::validation(message));
        }

        debug!("Resolved {} entries in {:.2?}", files.len(), resolve_duration);

        let load_start = Instant::now();
        self.loader.load_all(&mut files);
        let load_duration = load_start.elapsed();

        let text = self.formatter.format(&files);

        let stats = CombineStats {
            resolve_duration,
            load_duration,
            ..CombineStats::from_files(&files)
        };

        Ok(Combined { text, files, stats })
    }

    /// Executes the complete run, emitting to `out`.
    ///
    /// # Process
    ///
    /// 1. **Resolve**: expands request paths into an ordered file list
    /// 2. **Load**: reads files and applies size/binary policy
    /// 3. **Format**: renders headers and joins blocks
    /// 4. **Emit**: writes the text to `out` or to a temp file
    ///
    /// # Errors
    ///
    /// Returns an error if resolution yields nothing or output fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use file_combiner::{Config, OutputMode, Pipeline, Request};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder().mode(OutputMode::Clipboard).build()?;
    /// let request = Request::parse(r#"{"paths":["src"],"workspace_root":"."}"#)?;
    ///
    /// Pipeline::new(config)?.run(&request, &mut std::io::stdout().lock())?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all, fields(mode = self.config.mode.as_str(), paths = request.paths.len()))]
    pub fn run(
        &self,
        request: &Request,
        out: &mut impl Write,
    ) -> Result<(CombinedOutput, CombineStats)> {
        let start = Instant::now();

        let combined = self.combine(request)?;
        let stats = combined.stats;

        info!(
            "Combined {} of {} files ({} binary, {} too large, {} unreadable skipped)",
            stats.included_files,
            stats.resolved_files,
            stats.skipped_binary,
            stats.skipped_too_large,
            stats.skipped_unreadable
        );

        let output = self.sink.emit(&combined.text, out)?;

        debug!("Run completed in {:.2?}", start.elapsed());
        Ok((output, stats))
    }
}
