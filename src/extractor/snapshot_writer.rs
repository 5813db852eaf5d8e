use crate::error::Result;
use crate::scanner::SourceFile;
use serde::Serialize;
use std::fs;
use std::io::Write;

pub const DOCUMENT_TITLE: &str = "# Codebase Documentation";
pub const BINARY_PLACEHOLDER: &str = "[Binary file - content not extracted]";
const FENCE: &str = "```";

/// How list-only and unreadable records are fenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FenceStyle {
    /// One fence pair around the placeholder or error note.
    #[default]
    Clean,
    /// Byte-compatible with older snapshots: an extra close/open fence pair
    /// precedes the placeholder or error note.
    Legacy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Content { bytes: u64 },
    ListOnly,
    ReadError { reason: String },
}

#[derive(Serialize)]
struct Metadata<'a> {
    #[serde(rename = "Extraction Date")]
    extraction_date: &'a str,
    #[serde(rename = "Include Paths")]
    include_paths: &'a [String],
}

/// Local time at second precision, as written in the metadata header.
pub fn extraction_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Appends the snapshot document to `W`. Failures writing to `W` are
/// returned; failures reading a source file become an inline note.
pub struct SnapshotWriter<W: Write> {
    writer: W,
    fence_style: FenceStyle,
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            fence_style: FenceStyle::Clean,
        }
    }

    pub fn with_fence_style(mut self, fence_style: FenceStyle) -> Self {
        self.fence_style = fence_style;
        self
    }

    pub fn write_metadata(&mut self, extraction_date: &str, include_paths: &[String]) -> Result<()> {
        let metadata = Metadata {
            extraction_date,
            include_paths,
        };

        write!(self.writer, "{}\n\n", DOCUMENT_TITLE)?;
        write!(
            self.writer,
            "{}\n\n",
            serde_json::to_string_pretty(&metadata)?
        )?;
        Ok(())
    }

    pub fn write_record(&mut self, file: &SourceFile) -> Result<RecordOutcome> {
        write!(self.writer, "### {}\n{}\n", file.relative_path, FENCE)?;

        if file.list_only {
            self.write_note(BINARY_PLACEHOLDER)?;
            return Ok(RecordOutcome::ListOnly);
        }

        match fs::read(&file.source_path) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes);
                self.writer.write_all(content.as_bytes())?;
                write!(self.writer, "\n{}\n\n", FENCE)?;
                Ok(RecordOutcome::Content {
                    bytes: bytes.len() as u64,
                })
            }
            Err(e) => {
                log::debug!("failed to read {}: {}", file.source_path.display(), e);
                let reason = e.to_string();
                self.write_note(&format!("Error reading file: {}", reason))?;
                Ok(RecordOutcome::ReadError { reason })
            }
        }
    }

    // The opening fence has already been written.
    fn write_note(&mut self, note: &str) -> Result<()> {
        if self.fence_style == FenceStyle::Legacy {
            writeln!(self.writer, "{}", FENCE)?;
        }
        write!(self.writer, "{}\n{}\n\n", note, FENCE)?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
