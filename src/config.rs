use crate::error::{CodescribeError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Locations probed, in order, when no configuration file is named explicitly.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "codescribe/codebase_config.json",
    "codebase_config.json",
    "codescribe.toml",
    ".codescribe.toml",
];

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Effective extraction settings. Built once per run and never mutated after
/// CLI overrides are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub ignore_patterns: Vec<String>,
    pub ignore_extensions: Vec<String>,
    pub list_only_extensions: Vec<String>,
    /// Upper bound in bytes; `u64::MAX` means unlimited.
    pub max_file_size: u64,
    pub include_paths: Vec<String>,
    pub legacy_fences: bool,
}

/// On-disk shape of a configuration document. Every key is optional and
/// unknown keys are ignored.
#[derive(Debug, Default, Deserialize, Serialize)]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ignore_patterns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ignore_extensions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    list_only_extensions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_file_size_mb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    include_paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    legacy_fences: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Outcome of [`Config::resolve`]. When loading failed, `config` holds the
/// built-in defaults and `fallback` carries the reason.
#[derive(Debug)]
pub struct ConfigResolution {
    pub config: Config,
    pub source: Option<PathBuf>,
    pub fallback: Option<CodescribeError>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_patterns: strings(&[
                "env",
                "venv",
                ".git",
                "__pycache__",
                "node_modules",
                "build",
                "dist",
                ".idea",
                "app.py",
                "codebase_snapshot.md",
            ]),
            ignore_extensions: strings(&[
                ".log", ".tmp", ".bak", ".pyc", ".pyo", ".pyd", ".so", ".dll", ".dylib",
            ]),
            list_only_extensions: strings(&[
                ".png", ".jpg", ".jpeg", ".gif", ".ico", ".svg", ".db", ".sqlite", ".pdf", ".zip",
            ]),
            max_file_size: 10 * 1024 * 1024, // 10MB
            include_paths: Vec::new(),
            legacy_fences: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CodescribeError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CodescribeError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let file: ConfigFile = match ConfigFormat::from_path(path) {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| CodescribeError::Config {
                message: format!("Failed to parse config file {}: {}", path.display(), e),
            })?,
            ConfigFormat::Json => {
                serde_json::from_str(&content).map_err(|e| CodescribeError::Config {
                    message: format!("Failed to parse config file {}: {}", path.display(), e),
                })?
            }
        };

        Self::from_file(file)
    }

    // Keys missing from a parsed file are empty (or unlimited), not defaulted.
    fn from_file(file: ConfigFile) -> Result<Self> {
        let max_file_size = match file.max_file_size_mb {
            Some(mb) => mb_to_bytes(mb)?,
            None => u64::MAX,
        };

        Ok(Self {
            ignore_patterns: file.ignore_patterns.unwrap_or_default(),
            ignore_extensions: file.ignore_extensions.unwrap_or_default(),
            list_only_extensions: file.list_only_extensions.unwrap_or_default(),
            max_file_size,
            include_paths: file.include_paths.unwrap_or_default(),
            legacy_fences: file.legacy_fences.unwrap_or(false),
        })
    }

    fn to_file(&self) -> ConfigFile {
        ConfigFile {
            ignore_patterns: Some(self.ignore_patterns.clone()),
            ignore_extensions: Some(self.ignore_extensions.clone()),
            list_only_extensions: Some(self.list_only_extensions.clone()),
            max_file_size_mb: (self.max_file_size != u64::MAX)
                .then(|| self.max_file_size as f64 / BYTES_PER_MB),
            include_paths: Some(self.include_paths.clone()),
            legacy_fences: self.legacy_fences.then_some(true),
        }
    }

    /// Load `path` if given, falling back to the defaults entirely when the
    /// file cannot be read or parsed.
    pub fn resolve<P: AsRef<Path>>(path: Option<P>) -> ConfigResolution {
        let Some(path) = path else {
            return ConfigResolution {
                config: Self::default(),
                source: None,
                fallback: None,
            };
        };

        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => ConfigResolution {
                config,
                source: Some(path.to_path_buf()),
                fallback: None,
            },
            Err(e) => ConfigResolution {
                config: Self::default(),
                source: None,
                fallback: Some(e),
            },
        }
    }

    /// Like [`Config::resolve`], but probes [`DEFAULT_CONFIG_PATHS`] when no
    /// path was named. A missing conventional file is not an error.
    pub fn resolve_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> ConfigResolution {
        if let Some(path) = config_path {
            return Self::resolve(Some(path));
        }

        let found = DEFAULT_CONFIG_PATHS
            .iter()
            .map(Path::new)
            .find(|p| p.is_file());

        match found {
            Some(path) => {
                log::debug!("using configuration file {}", path.display());
                Self::resolve(Some(path))
            }
            None => {
                log::debug!("no configuration file found, using built-in defaults");
                Self::resolve(None::<&Path>)
            }
        }
    }

    /// Caller-supplied include paths first, then the configuration's own.
    pub fn effective_include_paths(&self, caller: &[String]) -> Vec<String> {
        caller
            .iter()
            .chain(self.include_paths.iter())
            .cloned()
            .collect()
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(max_size) = cli_args.max_file_size {
            self.max_file_size = max_size;
        }

        if let Some(legacy) = cli_args.legacy_fences {
            self.legacy_fences = legacy;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = self.to_file();
        let content = match ConfigFormat::from_path(path) {
            ConfigFormat::Toml => {
                toml::to_string_pretty(&file).map_err(|e| CodescribeError::Config {
                    message: format!("Failed to serialize config: {}", e),
                })?
            }
            ConfigFormat::Json => {
                serde_json::to_string_pretty(&file).map_err(|e| CodescribeError::Config {
                    message: format!("Failed to serialize config: {}", e),
                })?
            }
        };

        std::fs::write(path, content).map_err(|e| CodescribeError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    /// Reject settings that would silently exclude every file.
    pub fn validate(&self) -> Result<()> {
        if self.ignore_patterns.iter().any(|p| p.is_empty()) {
            return Err(CodescribeError::Config {
                message: "An empty ignore pattern matches every path".to_string(),
            });
        }

        if self.ignore_extensions.iter().any(|e| e.is_empty()) {
            return Err(CodescribeError::Config {
                message: "An empty ignore extension matches every file".to_string(),
            });
        }

        if self.max_file_size == 0 {
            return Err(CodescribeError::Config {
                message: "Maximum file size of 0 bytes only admits empty files".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        serde_json::to_string_pretty(&Self::default().to_file()).unwrap_or_default()
    }
}

fn mb_to_bytes(mb: f64) -> Result<u64> {
    if !mb.is_finite() || mb < 0.0 {
        return Err(CodescribeError::Config {
            message: format!("max_file_size_mb must be a non-negative number, got {}", mb),
        });
    }
    Ok((mb * BYTES_PER_MB) as u64)
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub max_file_size: Option<u64>,
    pub legacy_fences: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_file_size(mut self, max_size: Option<u64>) -> Self {
        self.max_file_size = max_size;
        self
    }

    pub fn with_legacy_fences(mut self, legacy: Option<bool>) -> Self {
        self.legacy_fences = legacy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn write_config(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.ignore_patterns.contains(&".git".to_string()));
        assert!(config.ignore_extensions.contains(&".log".to_string()));
        assert!(config.list_only_extensions.contains(&".png".to_string()));
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert!(config.include_paths.is_empty());
        assert!(!config.legacy_fences);
    }

    #[test]
    fn test_no_path_resolves_to_defaults() {
        let resolution = Config::resolve(None::<&Path>);
        assert_eq!(resolution.config, Config::default());
        assert!(resolution.fallback.is_none());
        assert!(resolution.source.is_none());
    }

    #[test]
    fn test_json_config_absent_keys_are_not_defaulted() {
        let file = write_config(".json", r#"{"ignore_patterns": ["target"], "extra": 1}"#);
        let config = Config::load_from_file(file.path()).unwrap();

        assert_eq!(config.ignore_patterns, vec!["target"]);
        assert!(config.ignore_extensions.is_empty());
        assert!(config.list_only_extensions.is_empty());
        assert_eq!(config.max_file_size, u64::MAX);
        assert!(config.include_paths.is_empty());
    }

    #[test]
    fn test_max_file_size_mb_conversion() {
        let file = write_config(".json", r#"{"max_file_size_mb": 0.00001}"#);
        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.max_file_size, 10);

        let file = write_config(".json", r#"{"max_file_size_mb": 2}"#);
        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.max_file_size, 2 * 1024 * 1024);
    }

    #[test]
    fn test_negative_size_is_rejected() {
        let file = write_config(".json", r#"{"max_file_size_mb": -1}"#);
        assert!(Config::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_toml_config_loading() {
        let file = write_config(
            ".toml",
            "ignore_patterns = [\"vendor\"]\nlist_only_extensions = [\".bin\"]\ninclude_paths = [\"src\"]\n",
        );
        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.ignore_patterns, vec!["vendor"]);
        assert_eq!(config.list_only_extensions, vec![".bin"]);
        assert_eq!(config.include_paths, vec!["src"]);
    }

    #[test]
    fn test_unparseable_config_falls_back_to_defaults() {
        let file = write_config(".json", "{ not json");
        let resolution = Config::resolve(Some(file.path()));
        assert_eq!(resolution.config, Config::default());
        assert!(matches!(
            resolution.fallback,
            Some(CodescribeError::Config { .. })
        ));
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let resolution = Config::resolve(Some(temp_dir.path().join("absent.json")));
        assert_eq!(resolution.config, Config::default());
        assert!(resolution.fallback.is_some());
    }

    #[test]
    fn test_effective_include_paths_order() {
        let config = Config {
            include_paths: vec!["b".to_string()],
            ..Config::default()
        };
        let effective = config.effective_include_paths(&["a".to_string()]);
        assert_eq!(effective, vec!["a", "b"]);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();
        let overrides = CliOverrides::new()
            .with_max_file_size(Some(2048))
            .with_legacy_fences(Some(true));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.max_file_size, 2048);
        assert!(config.legacy_fences);
    }

    #[test]
    fn test_config_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["saved.json", "saved.toml"] {
            let path = temp_dir.path().join(name);
            let config = Config::default();
            config.save_to_file(&path).unwrap();
            let loaded = Config::load_from_file(&path).unwrap();
            assert_eq!(loaded, config, "round trip through {}", name);
        }
    }

    #[test]
    fn test_validation() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.ignore_extensions.push(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(sample.contains("\"ignore_patterns\""));
        assert!(sample.contains("\"max_file_size_mb\": 10.0"));
        assert!(sample.contains("\"include_paths\": []"));
    }
}
