use anyhow::Context;
use clap::Parser;
use codescribe::{Cli, Codescribe, CodescribeError, OutputFormatter, OutputMode};
use std::path::Path;
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();
    setup_logging(cli.verbosity_level());

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let codescribe = match Codescribe::from_cli(&cli) {
        Ok(codescribe) => codescribe,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    if cli.dry_run {
        return handle_dry_run(&codescribe);
    }

    match codescribe.extract() {
        Ok(summary) => {
            codescribe
                .output_formatter()
                .print_extraction_summary(&summary);
            0
        }
        Err(e) => {
            codescribe.handle_error(&e);
            1
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli.sample_config_path();

    match write_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path.display());
            println!("\nTo use this configuration:");
            println!("  codescribe --config {}", config_path.display());
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {:#}", e);
            1
        }
    }
}

fn write_sample_config(path: &Path) -> anyhow::Result<()> {
    Codescribe::generate_sample_config(path)
        .with_context(|| format!("cannot write {}", path.display()))
}

fn handle_dry_run(codescribe: &Codescribe) -> i32 {
    let formatter = codescribe.output_formatter();

    formatter.info("DRY RUN MODE - No snapshot will be written");
    formatter.print_separator();

    let config = codescribe.config();
    formatter.info(&format!("Base directory: {}", codescribe.base_directory().display()));
    formatter.info(&format!("Output file: {}", codescribe.output_path().display()));
    formatter.info(&format!("Ignore patterns: {}", config.ignore_patterns.join(", ")));
    formatter.info(&format!("Ignore extensions: {}", config.ignore_extensions.join(", ")));
    formatter.info(&format!(
        "List-only extensions: {}",
        config.list_only_extensions.join(", ")
    ));
    formatter.info(&format!("Max file size: {} bytes", config.max_file_size));
    formatter.info(&format!("Include paths: {:?}", codescribe.include_paths()));
    formatter.print_separator();

    match codescribe.plan() {
        Ok(scan) => {
            formatter.print_plan(&scan.files);
            formatter.print_separator();
            formatter.success(&format!("Dry run completed: {} files", scan.files.len()));
            0
        }
        Err(e) => {
            codescribe.handle_error(&e);
            1
        }
    }
}

fn print_startup_error(error: &CodescribeError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 | 1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };

    let env = env_logger::Env::default().default_filter_or(format!("codescribe={}", level));
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.json");

        let cli = Cli::try_parse_from([
            "codescribe",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("\"list_only_extensions\""));
    }

    #[test]
    fn test_generate_config_reports_failure() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("missing/dir/test.json");

        let cli = Cli::try_parse_from([
            "codescribe",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(handle_generate_config(&cli), 1);
    }

    #[test]
    fn test_dry_run_mode() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("lib.rs"), "pub fn f() {}").unwrap();
        let output = temp_dir.path().join("out.md");

        let cli = Cli::try_parse_from([
            "codescribe",
            "--base-dir",
            temp_dir.path().to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--output-format",
            "plain",
            "--quiet",
            "--dry-run",
        ])
        .unwrap();

        let codescribe = Codescribe::from_cli(&cli).unwrap();
        assert_eq!(handle_dry_run(&codescribe), 0);
        assert!(!output.exists());
    }
}
