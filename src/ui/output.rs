use crate::error::{format_bytes, CodescribeError, UserFriendlyError};
use crate::extractor::ExtractionSummary;
use crate::scanner::SourceFile;
use console::{style, Emoji, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✓ ", "v ");
static CROSS: Emoji = Emoji("❌ ", "x ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static PAGE: Emoji = Emoji("📄 ", "> ");

/// Operator-facing diagnostics. Never writes into the snapshot document.
pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => eprintln!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &CodescribeError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    pub fn print_extraction_summary(&self, summary: &ExtractionSummary) {
        match self.mode {
            OutputMode::Human => self.print_human_summary(summary),
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Plain => self.print_plain_summary(summary),
        }
    }

    /// Files a dry run would write, in snapshot order.
    pub fn print_plan(&self, files: &[SourceFile]) {
        match self.mode {
            OutputMode::Json => {
                let entries: Vec<_> = files
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "path": f.relative_path,
                            "size": f.size,
                            "list_only": f.list_only,
                        })
                    })
                    .collect();
                self.print_json_object(&serde_json::json!({
                    "type": "plan",
                    "files": entries,
                }));
            }
            _ => {
                for file in files {
                    let marker = if file.list_only { " [listed only]" } else { "" };
                    if self.use_colors {
                        println!(
                            "{}{} {}{}",
                            PAGE,
                            file.relative_path,
                            style(file.format_size()).dim(),
                            style(marker).yellow()
                        );
                    } else {
                        println!("{} ({}){}", file.relative_path, file.format_size(), marker);
                    }
                }
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        if self.use_colors {
            let line = match msg_type {
                MessageType::Success => format!("{}{}", CHECKMARK, style(message).green().bold()),
                MessageType::Error => format!("{}{}", CROSS, style(message).red().bold()),
                MessageType::Warning => format!("{}{}", WARNING, style(message).yellow().bold()),
                MessageType::Info => format!("{}{}", INFO, style(message).cyan()),
            };

            match msg_type {
                MessageType::Success | MessageType::Info => println!("{}", line),
                MessageType::Error | MessageType::Warning => eprintln!("{}", line),
            }
        } else {
            match msg_type {
                MessageType::Success => println!("✓ {}", message),
                MessageType::Info => println!("{}", message),
                MessageType::Warning => eprintln!("Warning: {}", message),
                MessageType::Error => eprintln!("❌ {}", message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Local::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(&self, summary: &ExtractionSummary) {
        self.success(&format!(
            "Codebase documentation generated: {}",
            summary.output_path.display()
        ));

        if !self.should_show_message(1) {
            return;
        }

        println!();
        println!("  Records written: {}", summary.records_written);
        println!("  Listed only:     {}", summary.list_only_records);
        println!("  Content:         {}", format_bytes(summary.bytes_written));
        println!("  Time taken:      {}", format_duration(summary.extraction_duration));

        if !summary.missing_include_paths.is_empty() {
            println!("  Missing paths:   {}", summary.missing_include_paths.len());
        }

        if !summary.errors.is_empty() {
            println!("  Errors:          {}", summary.errors.len());
            for error in &summary.errors {
                println!("    - {}", error);
            }
        }
    }

    fn print_plain_summary(&self, summary: &ExtractionSummary) {
        if self.quiet {
            return;
        }
        println!("COMPLETED: {}", summary.output_path.display());
        println!("Records: {}", summary.records_written);
        println!("Listed only: {}", summary.list_only_records);
        println!("Bytes: {}", summary.bytes_written);
        println!("Duration: {:?}", summary.extraction_duration);
        if !summary.errors.is_empty() {
            println!("Errors: {}", summary.errors.len());
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
