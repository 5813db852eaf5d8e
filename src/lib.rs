pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ConfigResolution};
pub use error::{CodescribeError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{ExtractionSummary, FenceStyle, RecordOutcome, SnapshotWriter};
pub use scanner::{FileFilter, ScanResult, SourceFile, SourceScanner};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Main library interface: one configured extraction over one base directory.
pub struct Codescribe {
    config: Config,
    base_directory: PathBuf,
    output_path: PathBuf,
    include_paths: Vec<String>,
    add_metadata: bool,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl Codescribe {
    /// `caller_includes` are placed ahead of the configuration's own include
    /// paths.
    pub fn new(
        config: Config,
        base_directory: PathBuf,
        output_path: PathBuf,
        caller_includes: &[String],
        output_formatter: OutputFormatter,
    ) -> Self {
        let include_paths = config.effective_include_paths(caller_includes);
        let progress_manager = ProgressManager::new(
            output_formatter.mode() == OutputMode::Human && !output_formatter.is_quiet(),
        );

        Self {
            config,
            base_directory,
            output_path,
            include_paths,
            add_metadata: true,
            output_formatter,
            progress_manager,
        }
    }

    pub fn with_metadata(mut self, add_metadata: bool) -> Self {
        self.add_metadata = add_metadata;
        self
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress_manager = ProgressManager::new(enabled);
        self
    }

    /// Create a Codescribe instance from CLI arguments. Configuration load
    /// problems are reported as warnings and never abort.
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };
        let formatter = OutputFormatter::new(output_mode, cli_args.verbose, cli_args.quiet);

        let ConfigResolution {
            mut config,
            source,
            fallback,
        } = Config::resolve_with_defaults(cli_args.config.as_ref());

        if let Some(error) = fallback {
            formatter.warning(&format!("{}. Using default config.", error.user_message()));
        }
        if let Some(path) = source {
            formatter.debug(&format!("Loaded configuration from {}", path.display()));
        }

        config.merge_with_cli_args(&cli_args.create_cli_overrides());
        if let Err(error) = config.validate() {
            formatter.warning(&error.user_message());
        }

        let base_directory = absolute_path(&cli_args.base_dir)?;

        Ok(Self::new(
            config,
            base_directory,
            cli_args.output.clone(),
            &cli_args.include,
            formatter,
        )
        .with_metadata(!cli_args.no_metadata))
    }

    /// Write the snapshot. Per-file problems are recorded in the summary;
    /// only a failure to create or write the output aborts.
    pub fn extract(&self) -> Result<ExtractionSummary> {
        self.check_base_directory()?;

        let file = File::create(&self.output_path).map_err(|source| CodescribeError::OutputFile {
            path: self.output_path.clone(),
            source,
        })?;

        let mut writer =
            SnapshotWriter::new(BufWriter::new(file)).with_fence_style(self.fence_style());
        let mut summary = ExtractionSummary::new(self.output_path.clone(), self.include_paths.clone());

        if self.add_metadata {
            writer
                .write_metadata(&extractor::extraction_timestamp(), &self.include_paths)
                .map_err(|e| self.output_error(e))?;
        }

        let scan = self.scan()?;
        self.report_missing(&scan.missing);
        for missing in scan.missing {
            summary.add_missing_include(missing);
        }

        let file_progress = self
            .progress_manager
            .create_file_progress(scan.files.len() as u64);

        for source_file in &scan.files {
            let outcome = writer
                .write_record(source_file)
                .map_err(|e| self.output_error(e))?;
            summary.record(source_file, &outcome);
            ui::progress::update_file_progress(&file_progress, &source_file.relative_path);
        }

        ui::progress::finish_progress(&file_progress);
        writer.finish().map_err(|e| self.output_error(e))?;

        Ok(summary.finish())
    }

    /// Resolve the file set without touching the output file.
    pub fn plan(&self) -> Result<ScanResult> {
        self.check_base_directory()?;
        let scan = self.scan()?;
        self.report_missing(&scan.missing);
        Ok(scan)
    }

    fn scan(&self) -> Result<ScanResult> {
        let spinner = self.progress_manager.create_spinner("Scanning files");

        let scanner = SourceScanner::new(&self.config).with_excluded_path(&self.output_path);
        let result = scanner.scan(&self.base_directory, &self.include_paths);
        ui::progress::finish_progress(&spinner);

        let result = result?;
        self.output_formatter
            .debug(&scanner.get_statistics(&result.files).display_summary());
        Ok(result)
    }

    fn report_missing(&self, missing: &[String]) {
        for path in missing {
            let error = CodescribeError::IncludePathNotFound { path: path.clone() };
            self.output_formatter.warning(&error.user_message());
        }
    }

    fn check_base_directory(&self) -> Result<()> {
        if self.base_directory.is_dir() {
            Ok(())
        } else {
            Err(CodescribeError::InvalidPath {
                path: self.base_directory.display().to_string(),
            })
        }
    }

    fn fence_style(&self) -> FenceStyle {
        if self.config.legacy_fences {
            FenceStyle::Legacy
        } else {
            FenceStyle::Clean
        }
    }

    fn output_error(&self, error: CodescribeError) -> CodescribeError {
        match error {
            CodescribeError::Io(source) => CodescribeError::OutputFile {
                path: self.output_path.clone(),
                source,
            },
            other => other,
        }
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        std::fs::write(output_path.as_ref(), Config::create_sample_config())?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn include_paths(&self) -> &[String] {
        &self.include_paths
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &CodescribeError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Convenience function: snapshot `base_directory` into `output_path` with
/// the built-in configuration and no terminal output.
pub fn extract_snapshot(base_directory: &Path, output_path: &Path) -> Result<ExtractionSummary> {
    let codescribe = Codescribe::new(
        Config::default(),
        absolute_path(base_directory)?,
        output_path.to_path_buf(),
        &[],
        OutputFormatter::new(OutputMode::Plain, 0, true),
    );

    codescribe.extract()
}

fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
