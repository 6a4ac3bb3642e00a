use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("CROWDSCAN_BUILD_COMMIT"),
    ", ",
    env!("CROWDSCAN_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "crowdscan")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Offline decoder for people-counter LoRaWAN uplinks.",
    long_about = None,
    after_help = "Examples:\n  crowdscan uplink decode uplinks.jsonl -o report.json\n  crowdscan uplink decode uplinks.jsonl --stdout --pretty\n  crowdscan payload decode 0001000200030201ff01"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on uplink record files (offline-first).
    Uplink {
        #[command(subcommand)]
        command: UplinkCommands,
    },
    /// Operations on single raw payloads.
    Payload {
        #[command(subcommand)]
        command: PayloadCommands,
    },
}

#[derive(Subcommand, Debug)]
enum UplinkCommands {
    /// Decode a JSON-lines uplink file and generate a versioned JSON report.
    #[command(
        after_help = "Examples:\n  crowdscan uplink decode uplinks.jsonl -o report.json\n  crowdscan uplink decode uplinks.jsonl --stdout --strict"
    )]
    Decode {
        /// Path to a .jsonl uplink record file
        input: PathBuf,

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

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if any uplink decoded with warnings
        #[arg(long)]
        strict: bool,

        /// List decode warnings after the report is produced
        #[arg(long)]
        list_warnings: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PayloadCommands {
    /// Decode one hex payload and print the data/warnings object.
    Decode {
        /// Raw payload as a hex string (e.g. 0001000200030201ff01)
        hex: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Uplink { command } => match command {
            UplinkCommands::Decode {
                input,
                report,
                stdout,
                pretty,
                compact,
                quiet,
                strict,
                list_warnings,
            } => cmd_uplink_decode(
                input,
                report,
                stdout,
                pretty,
                compact,
                quiet,
                strict,
                list_warnings,
            ),
        },
        Commands::Payload { command } => match command {
            PayloadCommands::Decode { hex, pretty } => cmd_payload_decode(&hex, pretty),
        },
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
        CliError::new(err.to_string(), None)
    }
}

fn cmd_uplink_decode(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
    list_warnings: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
    let report = if stdout {
        None
    } else {
        Some(report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    if let Some(report_path) = report.as_ref() {
        let report_abs = report_path
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
        if let Some(report_dir) = report_abs {
            let report_target = report_dir.join(
                report_path
                    .file_name()
                    .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?,
            );
            if report_target == input_abs {
                return Err(CliError::new(
                    format!(
                        "report path must differ from input: {}",
                        report_path.display()
                    ),
                    Some("choose a different output path".to_string()),
                ));
            }
        }
    }

    let meta = fs::metadata(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;

    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .jsonl uplink record file".to_string()),
        ));
    }

    let rep =
        crowdscan_core::decode_uplink_file(&resolved_input).context("uplink decode failed")?;
    let json = serialize_report(&rep, pretty, compact)?;

    if stdout {
        print!("{}", json);
        if list_warnings && !quiet {
            print_warnings(&rep);
        }
        if strict && has_warnings(&rep) {
            return Err(CliError::new(
                "decode warnings detected",
                Some("use --list-warnings to inspect".to_string()),
            ));
        }
        return Ok(());
    }

    let report = report.expect("report required when not using stdout");
    if let Some(parent) = report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    fs::write(&report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;

    if list_warnings && !quiet {
        print_warnings(&rep);
    }
    if !quiet {
        eprintln!("OK: report written -> {}", report.display());
    }
    if strict && has_warnings(&rep) {
        return Err(CliError::new(
            "decode warnings detected",
            Some("use --list-warnings to inspect".to_string()),
        ));
    }
    Ok(())
}

fn cmd_payload_decode(hex: &str, pretty: bool) -> Result<(), CliError> {
    let payload = crowdscan_core::decode_hex(hex).map_err(|err| {
        CliError::new(
            format!("invalid payload hex: {}", err),
            Some("pass an even-length hex string, e.g. 0001000200030201ff01".to_string()),
        )
    })?;
    let decoded = crowdscan_core::decode_counter_payload(&payload);
    let json = if pretty {
        serde_json::to_string_pretty(&decoded)
    } else {
        serde_json::to_string(&decoded)
    }
    .context("JSON serialization failed")
    .map_err(CliError::from)?;
    println!("{}", json);
    Ok(())
}

fn serialize_report(
    rep: &crowdscan_core::Report,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
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

fn has_warnings(rep: &crowdscan_core::Report) -> bool {
    rep.uplinks.iter().any(|uplink| !uplink.warnings.is_empty())
}

fn print_warnings(rep: &crowdscan_core::Report) {
    eprintln!("Decode warnings:");
    for (index, uplink) in rep.uplinks.iter().enumerate() {
        for warning in &uplink.warnings {
            eprintln!("  uplink {} [{}]: {}", index + 1, uplink.payload_hex, warning);
        }
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .jsonl uplink record file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "jsonl" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .jsonl uplink record file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
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
            Some("check the path or quote the pattern; expected a .jsonl file".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single uplink file, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches.iter().take(3).collect::<Vec<_>>();
        if !listed.is_empty() {
            let mut details = String::new();
            details.push_str("; matches: ");
            details.push_str(
                &listed
                    .into_iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            if matches.len() > 3 {
                details.push_str(", ...");
            }
            message.push_str(&details);
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
