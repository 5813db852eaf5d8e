use crate::config::Config;
use std::fs;
use std::path::Path;

pub struct FileFilter {
    ignore_patterns: Vec<String>,
    ignore_extensions: Vec<String>,
    list_only_extensions: Vec<String>,
    max_file_size: u64,
}

impl FileFilter {
    pub fn new(config: &Config) -> Self {
        Self {
            ignore_patterns: config.ignore_patterns.clone(),
            ignore_extensions: config.ignore_extensions.clone(),
            list_only_extensions: config.list_only_extensions.clone(),
            max_file_size: config.max_file_size,
        }
    }

    /// Skip test applied to every candidate file. `relative` is the path
    /// relative to the base directory and is what ignore patterns match
    /// against. Returns the file size when the file is kept.
    pub fn admit(&self, path: &Path, relative: &str) -> Option<u64> {
        // Size first: an unreadable or oversized file is skipped regardless
        // of any pattern.
        let size = fs::metadata(path).ok()?.len();
        if !self.is_size_allowed(size) {
            return None;
        }

        if self.matches_any_pattern(relative) {
            return None;
        }

        let filename = file_name(path);
        if has_any_suffix(&filename, &self.ignore_extensions) {
            return None;
        }

        Some(size)
    }

    pub fn should_skip(&self, path: &Path, relative: &str) -> bool {
        self.admit(path, relative).is_none()
    }

    pub fn is_list_only(&self, filename: &str) -> bool {
        has_any_suffix(filename, &self.list_only_extensions)
    }

    /// Directories whose name contains an ignore pattern are pruned before
    /// they are descended into.
    pub fn should_traverse_directory(&self, path: &Path) -> bool {
        match path.file_name() {
            Some(name) => !self.matches_any_pattern(&name.to_string_lossy()),
            None => true,
        }
    }

    pub fn is_size_allowed(&self, size: u64) -> bool {
        size <= self.max_file_size
    }

    pub fn matches_any_pattern(&self, text: &str) -> bool {
        self.ignore_patterns
            .iter()
            .any(|pattern| text.contains(pattern.as_str()))
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_any_suffix(filename: &str, suffixes: &[String]) -> bool {
    suffixes.iter().any(|suffix| filename.ends_with(suffix.as_str()))
}
