//! Configuration File Loading
//!
//! Handles loading and saving configuration files from various locations
//! with TOML and JSON formats and a fallback to defaults.

use super::Config;
use crate::error::{Error, Result};
use crate::platform::Platform;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory and file stem used under the config directories
const APP_DIR: &str = "mysh";

/// Configuration file loader
pub struct ConfigLoader {
    /// Search paths for configuration files (without extension)
    search_paths: Vec<PathBuf>,
    /// Supported configuration file formats
    supported_formats: Vec<ConfigFormat>,
    /// Current configuration file path (if loaded)
    current_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }

    /// Pick the format from a file extension, TOML otherwise
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether to fall back to the default config if none exists
    pub create_default: bool,
    /// Whether to validate configuration after loading
    pub validate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            create_default: true,
            validate: true,
        }
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            search_paths: Self::get_search_paths(),
            supported_formats: vec![ConfigFormat::Toml, ConfigFormat::Json],
            current_path: None,
        }
    }

    /// Load configuration with default options
    pub fn load() -> Result<Config> {
        Self::new().load_with_options(LoadOptions::default())
    }

    /// Load configuration from search paths with custom options
    pub fn load_with_options(&mut self, options: LoadOptions) -> Result<Config> {
        if let Some((path, config)) = self.find_and_load_config()? {
            if options.validate {
                validate_config(&config)?;
            }
            info!("Configuration loaded from {}", path.display());
            self.current_path = Some(path);
            return Ok(config);
        }

        if options.create_default {
            debug!("No configuration file found, using defaults");
            let config = Config::default();
            if options.validate {
                validate_config(&config)?;
            }
            Ok(config)
        } else {
            Err(Error::ConfigNotFound)
        }
    }

    /// Load and validate a specific configuration file
    pub fn load_from_path(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(Error::ConfigLoadFailed {
                path: path.to_path_buf(),
                reason: "file does not exist".to_string(),
            });
        }

        let config = load_config_file(path, ConfigFormat::from_path(path))?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Save configuration to a specific path, format chosen by extension
    pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let format = ConfigFormat::from_path(path);
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                }
            })?,
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })?
            }
        };

        fs::write(path, content)?;
        Ok(())
    }

    /// Find and load configuration from search paths
    fn find_and_load_config(&self) -> Result<Option<(PathBuf, Config)>> {
        for path in &self.search_paths {
            for format in &self.supported_formats {
                let config_path = path.with_extension(format.extension());

                if config_path.exists() {
                    match load_config_file(&config_path, *format) {
                        Ok(config) => return Ok(Some((config_path, config))),
                        Err(e) => {
                            // Keep searching; a broken file should not stop the shell
                            warn!("Failed to load config from {}: {}", config_path.display(), e);
                            continue;
                        }
                    }
                }
            }
        }

        Ok(None)
    }

    /// Get default search paths for configuration files
    fn get_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        let path_ops = Platform::paths();

        if let Ok(config_dir) = path_ops.config_dir() {
            paths.push(config_dir.join(APP_DIR).join("config"));
        }

        if let Some(home) = path_ops.home_dir() {
            paths.push(home.join(".config").join(APP_DIR).join("config"));
            paths.push(home.join(format!(".{}", APP_DIR)).join("config"));
        }

        if let Ok(cwd) = env::current_dir() {
            paths.push(cwd.join(format!(".{}", APP_DIR)));
        }

        paths.dedup();
        paths
    }

    /// Get the current configuration file path
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// List all search paths
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Clear all search paths and add a single path (without extension)
    pub fn set_search_path(&mut self, path: PathBuf) {
        self.search_paths = vec![path];
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a specific configuration file
fn load_config_file(path: &Path, format: ConfigFormat) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match format {
        ConfigFormat::Toml => toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
            format: format.name().to_string(),
            reason: e.to_string(),
        }),
        ConfigFormat::Json => {
            serde_json::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                format: format.name().to_string(),
                reason: e.to_string(),
            })
        }
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.shell.prompt.is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "shell.prompt".to_string(),
            reason: "Prompt cannot be empty".to_string(),
        });
    }

    if config.history.file.as_os_str().is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "history.file".to_string(),
            reason: "History file path cannot be empty".to_string(),
        });
    }

    if config.history.max_entries == 0 {
        return Err(Error::ConfigValidationFailed {
            field: "history.max_entries".to_string(),
            reason: "History must keep at least one entry".to_string(),
        });
    }

    if config.logging.level.trim().is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "logging.level".to_string(),
            reason: "Log level cannot be empty".to_string(),
        });
    }

    Ok(())
}
