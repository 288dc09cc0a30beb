use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use option_schema_core::{SchemaDescription, ValidateOptions, validate_with};
use option_schema_loader::{
    DocumentFormat, SchemaDocument, ValidatorConfig, load_record, load_schema, plugin_name,
    schema_files,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for `validate`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Output format for `describe`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum DescribeFormat {
    Json,
    Yaml,
}

impl From<DescribeFormat> for DocumentFormat {
    fn from(fmt: DescribeFormat) -> Self {
        match fmt {
            DescribeFormat::Json => Self::Json,
            DescribeFormat::Yaml => Self::Yaml,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "optcheck", version)]
#[command(about = "Validate plugin options against declarative option schemas")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate an options file against a schema document.
    Validate(ValidateArgs),
    /// Check that schema documents describe well-formed schemas.
    Check(CheckArgs),
    /// Print the normalized description of a schema document.
    Describe(DescribeArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema document (.json, .yaml, .yml).
    #[arg(long)]
    schema: PathBuf,
    /// Options file to validate (.json, .yaml, .yml).
    #[arg(long)]
    options: PathBuf,
    /// Validator configuration YAML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the normalized options record when valid.
    #[arg(long)]
    print_value: bool,
    /// Report format.
    #[arg(long, default_value = "text")]
    format: ReportFormat,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Schema documents and/or directories containing schema documents.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    /// Schema document (.json, .yaml, .yml).
    #[arg(long)]
    schema: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: DescribeFormat,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli.command) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    init_logging(cli.verbose, &config.logging.level);
    tracing::debug!(version = PACKAGE_VERSION, "optcheck starting");

    let result = match cli.command {
        Command::Validate(args) => run_validate(args, &config),
        Command::Check(args) => run_check(args),
        Command::Describe(args) => run_describe(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_config(command: &Command) -> Result<ValidatorConfig, String> {
    match command {
        Command::Validate(ValidateArgs {
            config: Some(path), ..
        }) => ValidatorConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display())),
        _ => Ok(ValidatorConfig::default()),
    }
}

fn init_logging(verbose: u8, configured_level: &str) {
    let level = match verbose {
        0 => configured_level,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ---------------------------------------------------------------------------
// validate command
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ValidationReport<'a> {
    is_valid: bool,
    errors: Vec<&'a str>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    warnings: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a option_schema_core::Record>,
}

fn run_validate(args: ValidateArgs, config: &ValidatorConfig) -> Result<(), String> {
    let document = load_document(&args.schema)?;
    let schema = document
        .schema()
        .map_err(|e| format!("Invalid schema '{}': {e}", args.schema.display()))?;
    let options = load_record(&args.options)
        .map_err(|e| format!("Failed to load options '{}': {e}", args.options.display()))?;

    if document.description().external_check_count() > 0 {
        tracing::warn!(
            "schema document lists external checks; they cannot be run from a document"
        );
    }

    let validate_options: ValidateOptions = config.validate_options();
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    let result = runtime.block_on(validate_with(&schema, &options, &validate_options));

    match args.format {
        ReportFormat::Json => {
            let report = ValidationReport {
                is_valid: result.is_valid(),
                errors: result.errors(),
                warnings: result.warnings(),
                value: result.value(),
            };
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| format!("Failed to serialize report: {e}"))?;
            println!("{json}");
        }
        ReportFormat::Text => {
            for warning in result.warnings() {
                eprintln!("warning: {warning}");
            }
            for error in result.errors() {
                eprintln!("{error}");
            }
            if let (true, Some(value)) = (args.print_value, result.value()) {
                let json = serde_json::to_string_pretty(value)
                    .map_err(|e| format!("Failed to serialize options: {e}"))?;
                println!("{json}");
            } else if result.is_valid() {
                println!("Options in '{}' are valid.", args.options.display());
            }
        }
    }

    if result.is_valid() {
        Ok(())
    } else {
        Err(format!(
            "'{}' has {} invalid option(s)",
            args.options.display(),
            result.errors().len()
        ))
    }
}

// ---------------------------------------------------------------------------
// check command
// ---------------------------------------------------------------------------

fn run_check(args: CheckArgs) -> Result<(), String> {
    let mut files: Vec<PathBuf> = Vec::new();
    let mut failures: Vec<String> = Vec::new();

    for input in &args.inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }
        let listed = schema_files(input)
            .map_err(|e| format!("Failed to read '{}': {e}", input.display()))?;

        // Same-stem documents would shadow each other in a registry.
        let mut seen: HashMap<String, PathBuf> = HashMap::new();
        for path in listed {
            if let Some(plugin) = plugin_name(&path) {
                if let Some(first) = seen.get(plugin) {
                    failures.push(format!(
                        "{}: duplicate schema for plugin \"{plugin}\" (also in {})",
                        path.display(),
                        first.display()
                    ));
                } else {
                    seen.insert(plugin.to_string(), path.clone());
                }
            }
            files.push(path);
        }
    }

    for path in &files {
        let outcome = load_schema(path)
            .map_err(|e| e.to_string())
            .and_then(|doc| doc.schema().map(|_| ()).map_err(|e| e.to_string()));
        if let Err(err) = outcome {
            failures.push(format!("{}: {err}", path.display()));
        }
    }

    if !failures.is_empty() {
        for failure in &failures {
            eprintln!("{failure}");
        }
        return Err(format!(
            "{} problem(s) found in {} schema document(s)",
            failures.len(),
            files.len()
        ));
    }

    println!("Checked {} schema document(s).", files.len());
    Ok(())
}

// ---------------------------------------------------------------------------
// describe command
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DescribeOutput {
    fingerprint: String,
    #[serde(flatten)]
    description: SchemaDescription,
}

fn run_describe(args: DescribeArgs) -> Result<(), String> {
    let document = load_document(&args.schema)?;
    let schema = document
        .schema()
        .map_err(|e| format!("Invalid schema '{}': {e}", args.schema.display()))?;
    let fingerprint = document
        .fingerprint()
        .map_err(|e| format!("Failed to fingerprint schema: {e}"))?;

    let output = DescribeOutput {
        fingerprint,
        description: schema.describe(),
    };

    let raw = match DocumentFormat::from(args.format) {
        DocumentFormat::Json => serde_json::to_string_pretty(&output)
            .map_err(|e| format!("Failed to serialize description: {e}"))?,
        DocumentFormat::Yaml => serde_yaml::to_string(&output)
            .map_err(|e| format!("Failed to serialize description: {e}"))?,
    };
    println!("{raw}");
    Ok(())
}

fn load_document(path: &Path) -> Result<SchemaDocument, String> {
    load_schema(path).map_err(|e| format!("Failed to load schema '{}': {e}", path.display()))
}
