//! Supercoder CLI - batch conversion of Datavyu exports
//!
//! Commands:
//! - convert: Convert every file in the input directory (default)
//! - validate: Parse inputs and report malformed rows without writing
//! - doctor: Diagnose directories and configuration

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use datavyu_supercoder::pipeline::{BatchSummary, Converter, FileStatus, ValidationReport};
use datavyu_supercoder::{ConvertError, ConverterConfig, FrameRate, CONVERTER_VERSION, PRODUCER_NAME};

/// Supercoder - convert Datavyu annotation CSVs into frame-based Supercoder CSVs
#[derive(Parser)]
#[command(name = "supercoder")]
#[command(version = CONVERTER_VERSION)]
#[command(about = "Convert Datavyu CSV exports to Supercoder frame tables", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every file in the input directory (default)
    Convert {
        #[command(flatten)]
        config: ConfigArgs,

        /// Print the batch summary as JSON
        #[arg(long)]
        json: bool,

        /// Exit with a failure code if any file failed to convert
        #[arg(long)]
        strict: bool,
    },

    /// Parse input files and report malformed rows without writing output
    Validate {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose directories and configuration
    Doctor {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Default)]
struct ConfigArgs {
    /// Load settings from a JSON file (flags override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding Datavyu exports [default: Input]
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Directory receiving converted files [default: Output]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Prefix for output file names [default: OUTPUT_]
    #[arg(long)]
    prefix: Option<String>,

    /// Video frame rate [default: 29.97]
    #[arg(long)]
    frame_rate: Option<f64>,

    /// Code marking the start of a trial [default: B]
    #[arg(long)]
    marker: Option<String>,

    /// Create the output directory if it does not exist
    #[arg(long)]
    create_output_dir: bool,

    /// Process files in name order instead of directory order
    #[arg(long)]
    sorted: bool,
}

impl ConfigArgs {
    fn resolve(self) -> Result<ConverterConfig, CliFailure> {
        let mut config = match &self.config {
            Some(path) => ConverterConfig::load(path)?,
            None => ConverterConfig::default(),
        };

        if let Some(dir) = self.input_dir {
            config.input_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(prefix) = self.prefix {
            config.output_prefix = prefix;
        }
        if let Some(fps) = self.frame_rate {
            config.frame_rate = FrameRate(fps);
        }
        if let Some(marker) = self.marker {
            config.trial_marker = marker;
        }
        config.create_output_dir |= self.create_output_dir;
        config.sorted |= self.sorted;

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliFailure> {
    let command = cli.command.unwrap_or(Commands::Convert {
        config: ConfigArgs::default(),
        json: false,
        strict: false,
    });

    match command {
        Commands::Convert {
            config,
            json,
            strict,
        } => cmd_convert(config.resolve()?, json, strict),
        Commands::Validate { config, json } => cmd_validate(config.resolve()?, json),
        Commands::Doctor { config, json } => cmd_doctor(config.resolve()?, json),
    }
}

fn cmd_convert(config: ConverterConfig, json: bool, strict: bool) -> Result<(), CliFailure> {
    let converter = Converter::new(config)?;
    let summary = converter.run()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    if strict && summary.has_failures() {
        Err(CliFailure::ConversionFailed(summary.failed()))
    } else {
        Ok(())
    }
}

fn print_summary(summary: &BatchSummary) {
    for file in &summary.files {
        let tag = match file.status {
            FileStatus::Converted => "[OK]",
            FileStatus::PartiallyConverted => "[PARTIAL]",
            FileStatus::ReadFailed => "[READ ERR]",
            FileStatus::WriteFailed => "[WRITE ERR]",
        };
        match (&file.output_path, &file.error) {
            (Some(output), _) => println!(
                "{} {} -> {} ({} records, {} trials)",
                tag,
                file.file_name,
                output.display(),
                file.records,
                file.trials
            ),
            (None, Some(err)) => println!("{} {}: {}", tag, file.file_name, err),
            (None, None) => println!("{} {}", tag, file.file_name),
        }
        for row_error in &file.row_errors {
            println!("    skipped {}", row_error);
        }
    }

    println!();
    println!(
        "{} of {} files converted into {} ({} failed, {} rows skipped)",
        summary.converted(),
        summary.files.len(),
        summary.output_dir.display(),
        summary.failed(),
        summary.row_error_count()
    );
}

fn cmd_validate(config: ConverterConfig, json: bool) -> Result<(), CliFailure> {
    let converter = Converter::new(config)?;
    let report = converter.validate_inputs()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_validation(&report);
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliFailure::ValidationFailed(
            report.total_files - report.clean_files,
        ))
    }
}

fn print_validation(report: &ValidationReport) {
    println!("Validation Report");
    println!("=================");
    println!("Total files: {}", report.total_files);
    println!("Clean files: {}", report.clean_files);

    for file in &report.files {
        match &file.error {
            Some(err) => println!("\n{}: unreadable ({})", file.file_name, err),
            None => println!(
                "\n{}: {} records, {} trials, {} malformed rows",
                file.file_name,
                file.records,
                file.trials,
                file.row_errors.len()
            ),
        }
        for row_error in &file.row_errors {
            println!("  - {}", row_error);
        }
    }
}

fn cmd_doctor(config: ConverterConfig, json: bool) -> Result<(), CliFailure> {
    let mut checks: Vec<DoctorCheck> = vec![
        DoctorCheck::ok(
            "version",
            format!("{} version {}", PRODUCER_NAME, CONVERTER_VERSION),
        ),
        DoctorCheck::ok(
            "frame_rate",
            format!(
                "Converting at {}, trial marker {:?}",
                config.frame_rate, config.trial_marker
            ),
        ),
    ];

    checks.push(check_input_dir(&config));
    checks.push(check_output_dir(&config));

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: CONVERTER_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Supercoder Doctor Report");
        println!("========================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(CliFailure::DoctorFailed)
    } else {
        Ok(())
    }
}

fn check_input_dir(config: &ConverterConfig) -> DoctorCheck {
    let dir = &config.input_dir;
    match Converter::new(config.clone()).and_then(|c| c.list_inputs()) {
        Ok(inputs) if inputs.is_empty() => DoctorCheck {
            name: "input_dir".to_string(),
            status: CheckStatus::Warning,
            message: format!("{} contains no files", dir.display()),
        },
        Ok(inputs) => DoctorCheck::ok(
            "input_dir",
            format!("{} contains {} files", dir.display(), inputs.len()),
        ),
        Err(e) => DoctorCheck::error("input_dir", e.to_string()),
    }
}

fn check_output_dir(config: &ConverterConfig) -> DoctorCheck {
    let dir: &Path = &config.output_dir;
    if dir.is_dir() {
        DoctorCheck::ok("output_dir", format!("{} exists", dir.display()))
    } else if config.create_output_dir {
        DoctorCheck {
            name: "output_dir".to_string(),
            status: CheckStatus::Warning,
            message: format!("{} does not exist and will be created", dir.display()),
        }
    } else {
        DoctorCheck::error(
            "output_dir",
            format!(
                "{} does not exist (create it or pass --create-output-dir)",
                dir.display()
            ),
        )
    }
}

// Error types

#[derive(Debug)]
enum CliFailure {
    Convert(ConvertError),
    Json(serde_json::Error),
    ConversionFailed(usize),
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<ConvertError> for CliFailure {
    fn from(e: ConvertError) -> Self {
        CliFailure::Convert(e)
    }
}

impl From<serde_json::Error> for CliFailure {
    fn from(e: serde_json::Error) -> Self {
        CliFailure::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CliFailure> for CliError {
    fn from(e: CliFailure) -> Self {
        match e {
            CliFailure::Convert(e) => {
                let (code, hint) = match &e {
                    ConvertError::Io { .. } => ("IO_ERROR", "Check file paths and permissions"),
                    ConvertError::Json(_) => ("CONFIG_ERROR", "Check the JSON syntax of the config file"),
                    ConvertError::InvalidConfig(_) => {
                        ("CONFIG_ERROR", "Run 'supercoder doctor' to review settings")
                    }
                    ConvertError::MissingInputDir(_) => {
                        ("MISSING_INPUT_DIR", "Create the input directory or pass --input-dir")
                    }
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            CliFailure::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            CliFailure::ConversionFailed(count) => CliError {
                code: "CONVERSION_FAILED".to_string(),
                message: format!("{} files failed to convert", count),
                hint: Some("Review the summary above for per-file errors".to_string()),
            },
            CliFailure::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} files have malformed rows or could not be read", count),
                hint: Some("Fix the reported rows and retry".to_string()),
            },
            CliFailure::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

impl DoctorCheck {
    fn ok(name: &str, message: String) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message,
        }
    }

    fn error(name: &str, message: String) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message,
        }
    }
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
