use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use framewire_core::{
    DecodeReport, DecoderConfig, EncodeError, MAX_PAYLOAD_LEN, ReaderSource, SessionOptions,
    SyncMode, decode_file, decode_source, encode, parse_hex, to_hex,
};
use glob::glob;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("FRAMEWIRE_BUILD_COMMIT"),
    ", ",
    env!("FRAMEWIRE_BUILD_DATE"),
    ")"
);

const STDIN_INPUT: &str = "-";

#[derive(Parser, Debug)]
#[command(name = "framewire")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Encode and decode STX/ETX checksummed frames.",
    long_about = None,
    after_help = "Examples:\n  framewire encode --text ABC\n  framewire encode payload.bin -o frame.bin\n  framewire decode frame.bin --stdout --pretty\n  framewire decode --hex '02 03 41 42 43 c6 03' --stdout"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Wrap a payload (at most 255 bytes) in a frame.
    Encode {
        /// Payload file, or '-' for stdin
        #[arg(
            required_unless_present_any = ["hex", "text"],
            conflicts_with_all = ["hex", "text"]
        )]
        input: Option<PathBuf>,

        /// Payload given as hex digits
        #[arg(long, conflicts_with = "text")]
        hex: Option<String>,

        /// Payload given as literal text (UTF-8 bytes)
        #[arg(long)]
        text: Option<String>,

        /// Write the raw frame to this file instead of printing hex
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Print the raw frame bytes to stdout instead of hex
        #[arg(long, conflicts_with = "output")]
        raw: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },

    /// Decode one frame and generate a JSON report.
    #[command(
        after_help = "Examples:\n  framewire decode frame.bin -o report.json\n  framewire decode capture.bin --resync --expire-at-eof --stdout"
    )]
    Decode {
        /// Input file (glob patterns must match exactly one file), or '-' for stdin
        #[arg(required_unless_present = "hex", conflicts_with = "hex")]
        input: Option<PathBuf>,

        /// Frame bytes given as hex digits
        #[arg(long)]
        hex: Option<String>,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Skip bytes until a START marker instead of failing on them
        #[arg(long)]
        resync: bool,

        /// Treat end of input as a deadline: an unfinished frame is malformed
        #[arg(long)]
        expire_at_eof: bool,

        /// Exit with a non-zero code unless the frame is complete
        #[arg(long)]
        strict: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Encode {
            input,
            hex,
            text,
            output,
            raw,
            quiet,
        } => cmd_encode(input, hex, text, output, raw, quiet),
        Commands::Decode {
            input,
            hex,
            report,
            stdout,
            pretty,
            compact,
            resync,
            expire_at_eof,
            strict,
            quiet,
        } => {
            let options = SessionOptions {
                config: DecoderConfig {
                    sync: if resync {
                        SyncMode::Resync
                    } else {
                        SyncMode::Strict
                    },
                },
                expire_at_eof,
            };
            cmd_decode(
                input, hex, report, stdout, pretty, compact, options, strict, quiet,
            )
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_encode(
    input: Option<PathBuf>,
    hex: Option<String>,
    text: Option<String>,
    output: Option<PathBuf>,
    raw: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let payload = match (input, hex, text) {
        (_, Some(hex), _) => parse_hex_arg(&hex)?,
        (_, _, Some(text)) => text.into_bytes(),
        (Some(input), _, _) => read_input_bytes(&input)?,
        (None, None, None) => {
            return Err(CliError::new(
                "missing payload",
                Some("pass a payload file, --hex or --text".to_string()),
            ));
        }
    };

    let frame = encode(&payload).map_err(|err| match err {
        EncodeError::PayloadTooLarge { .. } => CliError::new(
            err.to_string(),
            Some(format!(
                "split the payload into frames of at most {} bytes",
                MAX_PAYLOAD_LEN
            )),
        ),
    })?;
    debug!(payload_len = payload.len(), frame_len = frame.len(), "payload encoded");

    if let Some(output) = output {
        write_file(&output, &frame)?;
        if !quiet {
            eprintln!("OK: frame written -> {}", output.display());
        }
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    let written = if raw {
        stdout.write_all(&frame)
    } else {
        writeln!(stdout, "{}", to_hex(&frame))
    };
    written.context("Failed to write frame to stdout")?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_decode(
    input: Option<PathBuf>,
    hex: Option<String>,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    options: SessionOptions,
    strict: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let report_path = if stdout {
        None
    } else {
        Some(report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    let rep = match (input, hex) {
        (_, Some(hex)) => {
            let bytes = parse_hex_arg(&hex)?;
            decode_source("hex", vec![bytes].into_iter(), options)
                .context("frame decoding failed")?
        }
        (Some(input), None) if input.as_os_str() == STDIN_INPUT => {
            decode_source(STDIN_INPUT, ReaderSource::new(io::stdin().lock()), options)
                .context("frame decoding failed")?
        }
        (Some(input), None) => {
            let resolved_input = resolve_input_path(&input)?;
            validate_input_file(&resolved_input)?;
            if let Some(report_path) = report_path.as_ref() {
                ensure_distinct_paths(&resolved_input, report_path)?;
            }
            decode_file(&resolved_input, options).context("frame decoding failed")?
        }
        (None, None) => {
            return Err(CliError::new(
                "missing input",
                Some("pass a frame file, '-' for stdin, or --hex".to_string()),
            ));
        }
    };
    info!(status = rep.verdict.status.as_str(), "frame decoded");

    let json = serialize_report(&rep, pretty, compact)?;

    match report_path {
        None => {
            print!("{}", json);
        }
        Some(report_path) => {
            write_file(&report_path, json.as_bytes())?;
            if !quiet {
                eprintln!(
                    "OK: report written -> {} ({})",
                    report_path.display(),
                    rep.verdict.status
                );
            }
        }
    }

    if strict && !is_complete(&rep) {
        let hint = rep
            .verdict
            .reason
            .clone()
            .unwrap_or_else(|| "inspect the report verdict".to_string());
        return Err(CliError::new(
            format!("frame not complete: {}", rep.verdict.status),
            Some(hint),
        ));
    }
    Ok(())
}

fn is_complete(rep: &DecodeReport) -> bool {
    rep.verdict.status == "complete"
}

fn serialize_report(rep: &DecodeReport, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn parse_hex_arg(hex: &str) -> Result<Vec<u8>, CliError> {
    parse_hex(hex).map_err(|err| {
        CliError::new(
            format!("invalid hex input: {}", err),
            Some("use pairs of hex digits, e.g. '02 03 41'".to_string()),
        )
    })
}

fn read_input_bytes(input: &Path) -> Result<Vec<u8>, CliError> {
    if input.as_os_str() == STDIN_INPUT {
        let mut bytes = Vec::new();
        io::Read::read_to_end(&mut io::stdin().lock(), &mut bytes)
            .context("Failed to read stdin")?;
        return Ok(bytes);
    }
    let resolved = resolve_input_path(input)?;
    validate_input_file(&resolved)?;
    fs::read(&resolved)
        .with_context(|| format!("Failed to read input file: {}", resolved.display()))
        .map_err(Into::into)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn ensure_distinct_paths(input: &Path, report_path: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let report_dir = report_path
        .parent()
        .map(|parent| {
            if parent.as_os_str().is_empty() {
                fs::canonicalize(".")
            } else {
                fs::canonicalize(parent)
            }
        })
        .transpose()
        .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
    if let (Some(report_dir), Some(file_name)) = (report_dir, report_path.file_name()) {
        if report_dir.join(file_name) == input_abs {
            return Err(CliError::new(
                format!(
                    "report path must differ from input: {}",
                    report_path.display()
                ),
                Some("choose a different output path".to_string()),
            ));
        }
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("check the path, or use '-' to read stdin".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a regular file containing raw bytes".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single frame file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
