use crate::config::Config;
use crate::error::{format_bytes, CodescribeError, Result};
use crate::scanner::file_filter::FileFilter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file selected for the snapshot.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub source_path: PathBuf,
    /// Heading used in the snapshot, `/`-separated.
    pub relative_path: String,
    pub filename: String,
    pub size: u64,
    pub list_only: bool,
}

impl SourceFile {
    pub fn new(source_path: PathBuf, relative_path: String, size: u64, list_only: bool) -> Self {
        let filename = source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            source_path,
            relative_path,
            filename,
            size,
            list_only,
        }
    }

    pub fn format_size(&self) -> String {
        format_bytes(self.size)
    }
}

#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<SourceFile>,
    /// Include paths that resolved to neither a file nor a directory.
    pub missing: Vec<String>,
}

pub struct SourceScanner {
    filter: FileFilter,
    excluded: Option<PathBuf>,
}

impl SourceScanner {
    pub fn new(config: &Config) -> Self {
        Self {
            filter: FileFilter::new(config),
            excluded: None,
        }
    }

    /// Never yield `path`; used to keep the snapshot out of itself.
    pub fn with_excluded_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        self.excluded = Some(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()));
        self
    }

    /// Resolve the file set: the listed include paths in order, or the whole
    /// base directory when `include_paths` is empty.
    pub fn scan(&self, base: &Path, include_paths: &[String]) -> Result<ScanResult> {
        if !base.exists() {
            return Err(CodescribeError::InvalidPath {
                path: base.display().to_string(),
            });
        }

        if !base.is_dir() {
            return Err(CodescribeError::InvalidPath {
                path: format!("{} is not a directory", base.display()),
            });
        }

        let mut result = ScanResult::default();

        if include_paths.is_empty() {
            self.walk_directory(base, base, None, &mut result.files);
            return Ok(result);
        }

        for include in include_paths {
            let absolute = base.join(include);

            if absolute.is_file() {
                let relative = relative_heading(base, &absolute, None)
                    .unwrap_or_else(|| include.clone());
                if let Some(file) = self.consider_file(&absolute, relative) {
                    result.files.push(file);
                }
            } else if absolute.is_dir() {
                self.walk_directory(&absolute, base, Some(include), &mut result.files);
            } else {
                log::debug!("include path {} resolved to {}", include, absolute.display());
                result.missing.push(include.clone());
            }
        }

        Ok(result)
    }

    // Files of a directory come before its subdirectories; both sorted by name.
    fn walk_directory(
        &self,
        root: &Path,
        base: &Path,
        include: Option<&String>,
        files: &mut Vec<SourceFile>,
    ) {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || self.filter.should_traverse_directory(e.path())
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::debug!("skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            let relative = relative_heading(base, path, include.map(|i| (root, i.as_str())))
                .unwrap_or_else(|| path.display().to_string());

            if let Some(file) = self.consider_file(path, relative) {
                files.push(file);
            }
        }
    }

    fn consider_file(&self, path: &Path, relative: String) -> Option<SourceFile> {
        // Symlinks to directories are listed as non-directories by the walker.
        if !path.is_file() || self.is_excluded(path) {
            return None;
        }

        match self.filter.admit(path, &relative) {
            Some(size) => {
                let file = SourceFile::new(path.to_path_buf(), relative, size, false);
                let list_only = self.filter.is_list_only(&file.filename);
                Some(SourceFile { list_only, ..file })
            }
            None => {
                log::trace!("skipped {}", relative);
                None
            }
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let Some(excluded) = &self.excluded else {
            return false;
        };

        if path.file_name() != excluded.file_name() {
            return false;
        }

        path.canonicalize()
            .map(|p| &p == excluded)
            .unwrap_or(false)
    }

    pub fn get_statistics(&self, files: &[SourceFile]) -> ScanStatistics {
        let (largest_file_size, largest_file_path) = files
            .iter()
            .max_by_key(|f| f.size)
            .map(|f| (f.size, f.relative_path.clone()))
            .unwrap_or_default();

        ScanStatistics {
            total_files: files.len(),
            list_only_files: files.iter().filter(|f| f.list_only).count(),
            total_size: files.iter().map(|f| f.size).sum(),
            largest_file_size,
            largest_file_path,
        }
    }
}

/// Path of `path` relative to `base` with `/` separators. When `path` lies
/// outside `base` and was reached through an include entry, the heading is
/// built from the include string as the user wrote it.
fn relative_heading(base: &Path, path: &Path, include: Option<(&Path, &str)>) -> Option<String> {
    if let Ok(relative) = path.strip_prefix(base) {
        return Some(to_heading(relative));
    }

    let (root, include) = include?;
    let below = path.strip_prefix(root).ok()?;
    Some(to_heading(&Path::new(include).join(below)))
}

fn to_heading(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub list_only_files: usize,
    pub total_size: u64,
    pub largest_file_size: u64,
    pub largest_file_path: String,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  Total files: {}\n  Listed only: {}\n  Total size: {}\n",
            self.total_files,
            self.list_only_files,
            format_bytes(self.total_size)
        );

        if self.largest_file_size > 0 {
            summary.push_str(&format!(
                "  Largest file: {} ({})\n",
                self.largest_file_path,
                format_bytes(self.largest_file_size)
            ));
        }

        summary
    }
}
