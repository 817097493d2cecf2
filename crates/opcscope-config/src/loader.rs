// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading and processing for opcscope.
//!
//! # Loading Pipeline
//!
//! 1. Read the file (YAML, TOML or JSON, by extension)
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders in the raw content
//! 3. Parse into [`ScopeConfig`]
//! 4. Apply `OPCSCOPE_*` environment overrides
//! 5. Resolve a relative `pki_dir` against the file's directory
//! 6. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! OPCSCOPE_ENDPOINT=opc.tcp://plc-7:4840
//! OPCSCOPE_ROOT_NODE=ns=2;s=Line1
//! OPCSCOPE_MAX_COUNT=10000
//! OPCSCOPE_NAMESPACE_URI=urn:simple-server
//! OPCSCOPE_TARGET_NODE=ns=2;s=v4
//! OPCSCOPE_WRITE_VALUE=12.5
//! OPCSCOPE_LOG_LEVEL=debug
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{LogLevel, ScopeConfig};
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "OPCSCOPE";

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader.
///
/// # Examples
///
/// ```no_run
/// use opcscope_config::loader::ConfigLoader;
///
/// let loader = ConfigLoader::new();
/// let config = loader.load("opcscope.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve environment variables.
    resolve_env_vars: bool,
}

impl ConfigLoader {
    /// Creates a new configuration loader with default settings.
    pub fn new() -> Self {
        Self {
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            resolve_env_vars: true,
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Loads configuration from a file.
    ///
    /// The file format is determined by the extension: `.yaml`/`.yml`,
    /// `.toml` or `.json`. A missing file is an error.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<ScopeConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let base_path = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;
        let mut config = self.parse_content(&content, format, path)?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        resolve_relative_paths(&mut config, &base_path);

        config.validate()?;

        debug!(
            endpoint = %config.connection.endpoint,
            root = %config.traverse.root,
            probe_nodes = config.probe.nodes.len(),
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Loads `path` if given, otherwise starts from the built-in defaults.
    ///
    /// Environment overrides and validation apply either way.
    pub fn load_or_default(&self, path: Option<&Path>) -> ConfigResult<ScopeConfig> {
        match path {
            Some(path) => self.load(path),
            None => {
                debug!("No configuration file given, using defaults");
                let mut config = ScopeConfig::default();
                if self.resolve_env_vars {
                    self.apply_env_overrides(&mut config)?;
                }
                config.validate()?;
                Ok(config)
            }
        }
    }

    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    fn parse_content(&self, content: &str, format: ConfigFormat, path: &Path) -> ConfigResult<ScopeConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)?
        } else {
            content.to_string()
        };

        parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })
    }

    /// Resolves `${VAR_NAME}` and `${VAR_NAME:default}` placeholders.
    ///
    /// An unset variable without a default is left in place.
    fn resolve_env_placeholders(&self, content: &str) -> ConfigResult<String> {
        resolve_placeholders_with(content, |name| env::var(name).ok())
    }

    /// Applies `<prefix>_*` environment overrides.
    fn apply_env_overrides(&self, config: &mut ScopeConfig) -> ConfigResult<()> {
        apply_overrides_with(config, &self.env_prefix, |name| env::var(name).ok())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> ConfigResult<T> {
    match format {
        ConfigFormat::Yaml => yaml_parse(content),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// YAML parsing through the `config` crate.
fn yaml_parse<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigError::serialization(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

/// Resolves placeholders using `lookup` for variable values.
pub(crate) fn resolve_placeholders_with<F>(content: &str, lookup: F) -> ConfigResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' || chars.peek() != Some(&'{') {
            result.push(c);
            continue;
        }
        chars.next();

        let mut var_content = String::new();
        let mut found_close = false;
        for c in chars.by_ref() {
            if c == '}' {
                found_close = true;
                break;
            }
            var_content.push(c);
        }

        if !found_close {
            result.push_str("${");
            result.push_str(&var_content);
            continue;
        }

        let (var_name, default_value) = match var_content.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (var_content.as_str(), None),
        };

        match (lookup(var_name), default_value) {
            (Some(value), _) => result.push_str(&value),
            (None, Some(default)) => result.push_str(default),
            (None, None) => {
                warn!("Environment variable '{}' not found", var_name);
                result.push_str(&format!("${{{}}}", var_name));
            }
        }
    }

    Ok(result)
}

/// Applies `<prefix>_*` overrides using `lookup` for variable values.
pub(crate) fn apply_overrides_with<F>(config: &mut ScopeConfig, prefix: &str, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |suffix: &str| {
        let name = format!("{}_{}", prefix, suffix);
        lookup(&name).map(|value| (name, value))
    };

    if let Some((_, value)) = var("ENDPOINT") {
        config.connection.endpoint = value;
    }
    if let Some((_, value)) = var("ROOT_NODE") {
        config.traverse.root = value;
    }
    if let Some((name, value)) = var("MAX_COUNT") {
        config.traverse.max_count = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid_env_var(name, "expected a non-negative integer"))?;
    }
    if let Some((_, value)) = var("NAMESPACE_URI") {
        config.probe.namespace_uri = value;
    }
    if let Some((_, value)) = var("TARGET_NODE") {
        config.probe.target = value;
    }
    if let Some((name, value)) = var("WRITE_VALUE") {
        config.probe.write_value = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid_env_var(name, "expected a number"))?;
    }
    if let Some((name, value)) = var("LOG_LEVEL") {
        config.logging.level = value
            .parse::<LogLevel>()
            .map_err(|_| ConfigError::invalid_env_var(name, "expected trace, debug, info, warn or error"))?;
    }

    Ok(())
}

fn resolve_relative_paths(config: &mut ScopeConfig, base_path: &Path) {
    if let Some(ref mut pki_dir) = config.connection.pki_dir {
        if pki_dir.is_relative() {
            *pki_dir = base_path.join(&pki_dir);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
