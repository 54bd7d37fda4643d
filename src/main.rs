use anyhow::Context;
use clap::{ArgAction, Parser};
use file_combiner::{
    Config, OutputMode, Pipeline, Request, DEFAULT_HEADER_FORMAT, DEFAULT_MAX_KB,
    DEFAULT_SEPARATOR,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit status used when stdin is an interactive terminal.
const EXIT_NO_PIPE: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "file-combiner",
    version,
    author,
    about = "Combine selected files and folders into one text artifact",
    long_about = "Combine selected files and folders into one text artifact.\n\n\
    Reads a JSON request from stdin, expands directories, skips oversized and binary \
    files, renders a header per file and joins everything with a separator. The \
    result goes to stdout (clipboard mode) or into a new temp file whose path is \
    printed (temp mode).\n\n\
    USAGE EXAMPLES:\n  \
      # Copy a folder as text\n  \
      echo '{\"paths\":[\"src\"],\"workspace_root\":\".\"}' | file-combiner --mode clipboard\n\n  \
      # Produce an attachment file\n  \
      echo '{\"paths\":[\"README.md\",\"src\"]}' | file-combiner --mode temp\n\n  \
      # Custom header and separator\n  \
      echo '{\"paths\":[\"a.txt\"]}' | file-combiner --mode clipboard --separator '\\n---\\n'"
)]
struct Cli {
    /// Where the combined text goes
    #[arg(long, value_enum, default_value = "temp", env = "FILE_COMBINER_MODE")]
    mode: CliMode,

    /// Header template; supports ${index}, ${relpath} and ${basename}
    #[arg(long, default_value = DEFAULT_HEADER_FORMAT, env = "FILE_COMBINER_HEADER_FORMAT")]
    header_format: String,

    /// Separator between files; supports \n, \r, \t, \0 and \\
    #[arg(long, default_value = DEFAULT_SEPARATOR, env = "FILE_COMBINER_SEPARATOR")]
    separator: String,

    /// Max size per file in KiB
    #[arg(long, default_value_t = DEFAULT_MAX_KB, env = "FILE_COMBINER_MAX_KB")]
    max_kb: u64,

    /// Skip binary-looking files (default)
    #[arg(long, overrides_with = "include_binary")]
    skip_binary: bool,

    /// Include binary-looking files, decoded with replacement characters
    #[arg(long, overrides_with = "skip_binary", env = "FILE_COMBINER_INCLUDE_BINARY")]
    include_binary: bool,

    /// Directory for temp mode output (Linux default: $XDG_RUNTIME_DIR or /dev/shm)
    #[arg(long, value_name = "DIR", env = "FILE_COMBINER_RAM_DIR")]
    ram_dir: Option<PathBuf>,

    /// Verbose diagnostics on stderr (repeat for trace output)
    #[arg(short = 'v', long = "debug", visible_alias = "verbose", action = ArgAction::Count)]
    debug: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliMode {
    /// Print the text on stdout
    Clipboard,
    /// Write a temp file and print its path
    Temp,
}

impl From<CliMode> for OutputMode {
    fn from(m: CliMode) -> Self {
        match m {
            CliMode::Clipboard => Self::Clipboard,
            CliMode::Temp => Self::Temp,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_tracing(cli.debug);

    if std::io::stdin().is_terminal() {
        eprintln!("This command expects JSON on stdin (pipe).\n\nExample:");
        eprintln!(
            "  echo '{{\"paths\":[\".\"]}}' | {} --mode temp",
            env!("CARGO_BIN_NAME")
        );
        eprintln!("Use --help for details.");
        return ExitCode::from(EXIT_NO_PIPE);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<file_combiner::Error>()
                .map_or(1, file_combiner::Error::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    debug!("Args: {:?}", cli);

    let mut builder = Config::builder()
        .mode(cli.mode.into())
        .header_format(cli.header_format)
        .separator(cli.separator)
        .max_kb(cli.max_kb)
        .skip_binary(cli.skip_binary || !cli.include_binary);

    if let Some(dir) = cli.ram_dir {
        builder = builder.ram_dir(dir);
    }

    let config = builder.build().context("Failed to build configuration")?;

    let request = Request::from_reader(std::io::stdin().lock())?;

    let mut stdout = std::io::stdout().lock();
    Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run(&request, &mut stdout)?;

    Ok(())
}

fn setup_tracing(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "file_combiner=warn",
        1 => "file_combiner=debug",
        _ => "file_combiner=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .init();
}
