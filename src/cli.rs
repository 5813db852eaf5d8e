use crate::config::CliOverrides;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "./codebase_snapshot.md";
pub const DEFAULT_SAMPLE_CONFIG: &str = "codebase_config.json";

#[derive(Parser, Debug)]
#[command(name = "codescribe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract and document code from a codebase")]
#[command(
    long_about = "Codescribe walks a directory tree and writes every selected file, \
                  with a metadata header, into a single Markdown snapshot."
)]
#[command(after_help = "EXAMPLES:\n  \
    codescribe\n  \
    codescribe --base-dir ../service --output service.md\n  \
    codescribe --include src README.md --config codescribe/codebase_config.json\n  \
    codescribe --dry-run -v")]
pub struct Cli {
    /// Base directory for extraction
    #[arg(short, long, default_value = "./")]
    pub base_dir: PathBuf,

    /// Output file path, truncated and overwritten
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Configuration file path (JSON, or TOML for .toml files)
    #[arg(short, long, env = "CODESCRIBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Additional file or directory paths to include
    #[arg(short, long, num_args = 1..)]
    pub include: Vec<String>,

    /// Maximum file size in MB, overriding the configuration
    #[arg(long, value_parser = parse_size_mb)]
    pub max_size: Option<f64>,

    /// Do not write the metadata header
    #[arg(long)]
    pub no_metadata: bool,

    /// Reproduce the double fence around binary placeholders and read errors
    #[arg(long)]
    pub legacy_fences: bool,

    /// Output format for diagnostics
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// List the files that would be extracted without writing the snapshot
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a sample configuration file
    #[arg(long)]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn create_cli_overrides(&self) -> CliOverrides {
        let max_file_size = self
            .max_size
            .map(|mb| (mb * 1024.0 * 1024.0) as u64); // Convert MB to bytes

        CliOverrides::new()
            .with_max_file_size(max_file_size)
            .with_legacy_fences(self.legacy_fences.then_some(true))
    }

    pub fn sample_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAMPLE_CONFIG))
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

pub fn parse_size_mb(s: &str) -> std::result::Result<f64, String> {
    let number: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number format: {}", s))?;

    if !number.is_finite() || number < 0.0 {
        return Err("Size must be a non-negative number".to_string());
    }

    Ok(number)
}
