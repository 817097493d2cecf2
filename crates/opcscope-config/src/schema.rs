// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions for opcscope.
//!
//! Every field has a default, so an empty document (or no document at all)
//! yields the settings of the demo tools.
//!
//! # Schema Structure
//!
//! ```text
//! ScopeConfig
//! ├── connection: ConnectionConfig
//! ├── traverse: TraverseConfig
//! ├── probe: ProbeConfig
//! └── logging: LoggingConfig
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use opcscope_opcua::probe::{self as ua_probe, ProbePlan};
use opcscope_opcua::traverse::{TraversalOptions, VisitPolicy, WorkListOrder, DEFAULT_MAX_COUNT, DEFAULT_PREVIEW};
use opcscope_opcua::types::{
    NodeId, OpcUaConfig, SecurityMode, SecurityPolicy, UserTokenType, DEFAULT_APPLICATION_NAME,
    DEFAULT_ENDPOINT,
};
use opcscope_opcua::OpcUaValue;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Default traversal root (the Objects folder).
pub const DEFAULT_ROOT_NODE: &str = "i=85";

/// Largest accepted preview length.
pub const MAX_PREVIEW: usize = 1000;

/// Default session timeout.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(60);

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeConfig {
    /// Server connection settings.
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Traversal settings.
    #[serde(default)]
    pub traverse: TraverseConfig,

    /// Read/write probe settings.
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScopeConfig {
    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.connection.validate()?;
        self.traverse.validate()?;
        self.probe.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Builds the client configuration.
    pub fn to_opcua_config(&self) -> ConfigResult<OpcUaConfig> {
        self.connection.to_opcua_config()
    }

    /// Returns the traversal root node.
    pub fn root_node(&self) -> ConfigResult<NodeId> {
        parse_node_id("traverse.root", &self.traverse.root)
    }

    /// Returns the traversal options.
    pub fn traversal_options(&self) -> TraversalOptions {
        TraversalOptions::with_max_count(self.traverse.max_count)
            .order(self.traverse.order)
            .visit(self.traverse.visit)
    }

    /// Returns the probe plan.
    pub fn probe_plan(&self) -> ConfigResult<ProbePlan> {
        self.probe.to_plan()
    }

    /// Returns the overall deadline, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.connection.deadline
    }
}

// =============================================================================
// Connection Configuration
// =============================================================================

/// Server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Message security mode.
    #[serde(default)]
    pub security_mode: SecurityMode,

    /// Security policy.
    #[serde(default)]
    pub security_policy: SecurityPolicy,

    /// Username; anonymous when absent.
    #[serde(default)]
    pub username: Option<String>,

    /// Password for `username`.
    #[serde(default)]
    pub password: Option<SecretValue>,

    /// Application name presented to the server.
    #[serde(default = "default_application_name")]
    pub application_name: String,

    /// Session timeout.
    #[serde(default = "default_session_timeout", with = "duration_serde")]
    pub session_timeout: Duration,

    /// Accept any server certificate.
    #[serde(default)]
    pub trust_all_certificates: bool,

    /// PKI directory.
    #[serde(default)]
    pub pki_dir: Option<PathBuf>,

    /// Overall deadline for connect plus work.
    #[serde(default, with = "option_duration_serde")]
    pub deadline: Option<Duration>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_application_name() -> String {
    DEFAULT_APPLICATION_NAME.to_string()
}

fn default_session_timeout() -> Duration {
    DEFAULT_SESSION_TIMEOUT
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            security_mode: SecurityMode::default(),
            security_policy: SecurityPolicy::default(),
            username: None,
            password: None,
            application_name: default_application_name(),
            session_timeout: default_session_timeout(),
            trust_all_certificates: false,
            pki_dir: None,
            deadline: None,
        }
    }
}

impl ConnectionConfig {
    /// Validates the connection settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::missing_field("connection.endpoint"));
        }
        if !self.endpoint.starts_with("opc.tcp://") {
            return Err(ConfigError::validation(
                "connection.endpoint",
                "endpoint must start with 'opc.tcp://'",
            ));
        }
        if self.security_mode.is_none() != (self.security_policy == SecurityPolicy::None) {
            return Err(ConfigError::validation(
                "connection.security_policy",
                format!(
                    "security mode {} is inconsistent with security policy {}",
                    self.security_mode, self.security_policy
                ),
            ));
        }
        match (&self.username, &self.password) {
            (Some(user), _) if user.is_empty() => {
                return Err(ConfigError::validation("connection.username", "username cannot be empty"));
            }
            (Some(_), None) => return Err(ConfigError::missing_field("connection.password")),
            (None, Some(_)) => {
                return Err(ConfigError::validation(
                    "connection.password",
                    "password given without a username",
                ));
            }
            _ => {}
        }
        if self.session_timeout.is_zero() {
            return Err(ConfigError::validation(
                "connection.session_timeout",
                "session timeout must be greater than zero",
            ));
        }
        if matches!(self.deadline, Some(d) if d.is_zero()) {
            return Err(ConfigError::validation(
                "connection.deadline",
                "deadline must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Converts to the client configuration.
    pub fn to_opcua_config(&self) -> ConfigResult<OpcUaConfig> {
        let user_token = match (&self.username, &self.password) {
            (Some(username), Some(password)) => UserTokenType::UserName {
                username: username.clone(),
                password: password.expose().to_string(),
            },
            _ => UserTokenType::Anonymous,
        };

        let config = OpcUaConfig {
            endpoint: self.endpoint.clone(),
            security_mode: self.security_mode,
            security_policy: self.security_policy,
            user_token,
            application_name: self.application_name.clone(),
            application_uri: None,
            session_timeout: self.session_timeout,
            pki_dir: self.pki_dir.as_ref().map(|p| p.display().to_string()),
            trust_all_certificates: self.trust_all_certificates,
        };

        config
            .validate()
            .map_err(|e| ConfigError::validation("connection", e.to_string()))?;
        Ok(config)
    }
}

// =============================================================================
// Traverse Configuration
// =============================================================================

/// Traversal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraverseConfig {
    /// Root node id.
    #[serde(default = "default_root_node")]
    pub root: String,

    /// Maximum number of nodes to collect.
    #[serde(default = "default_max_count")]
    pub max_count: usize,

    /// Work list order.
    #[serde(default)]
    pub order: WorkListOrder,

    /// Revisit policy.
    #[serde(default)]
    pub visit: VisitPolicy,

    /// Nodes printed after the summary line.
    #[serde(default = "default_preview")]
    pub preview: usize,
}

fn default_root_node() -> String {
    DEFAULT_ROOT_NODE.to_string()
}

fn default_max_count() -> usize {
    DEFAULT_MAX_COUNT
}

fn default_preview() -> usize {
    DEFAULT_PREVIEW
}

impl Default for TraverseConfig {
    fn default() -> Self {
        Self {
            root: default_root_node(),
            max_count: default_max_count(),
            order: WorkListOrder::default(),
            visit: VisitPolicy::default(),
            preview: default_preview(),
        }
    }
}

impl TraverseConfig {
    /// Validates the traversal settings.
    pub fn validate(&self) -> ConfigResult<()> {
        parse_node_id("traverse.root", &self.root)?;
        if self.preview > MAX_PREVIEW {
            return Err(ConfigError::out_of_range("traverse.preview", self.preview, 0, MAX_PREVIEW));
        }
        Ok(())
    }
}

// =============================================================================
// Probe Configuration
// =============================================================================

/// Read/write probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    /// Namespace URI to resolve.
    #[serde(default = "default_namespace_uri")]
    pub namespace_uri: String,

    /// Nodes read before the write.
    #[serde(default = "default_probe_nodes")]
    pub nodes: Vec<String>,

    /// Write target.
    #[serde(default = "default_target")]
    pub target: String,

    /// Value written to the target (as a Double).
    #[serde(default = "default_write_value")]
    pub write_value: f64,
}

fn default_namespace_uri() -> String {
    ua_probe::DEFAULT_NAMESPACE_URI.to_string()
}

fn default_probe_nodes() -> Vec<String> {
    ua_probe::default_read_nodes().iter().map(NodeId::to_string).collect()
}

fn default_target() -> String {
    ua_probe::default_target().to_string()
}

fn default_write_value() -> f64 {
    ua_probe::DEFAULT_WRITE_VALUE
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            namespace_uri: default_namespace_uri(),
            nodes: default_probe_nodes(),
            target: default_target(),
            write_value: default_write_value(),
        }
    }
}

impl ProbeConfig {
    /// Validates the probe settings.
    pub fn validate(&self) -> ConfigResult<()> {
        self.to_plan().map(|_| ())
    }

    /// Converts to a probe plan.
    pub fn to_plan(&self) -> ConfigResult<ProbePlan> {
        if self.namespace_uri.is_empty() {
            return Err(ConfigError::missing_field("probe.namespace_uri"));
        }
        if !self.write_value.is_finite() {
            return Err(ConfigError::validation("probe.write_value", "value must be finite"));
        }

        let read_nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, raw)| parse_node_id(&format!("probe.nodes[{}]", i), raw))
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(ProbePlan {
            namespace_uri: self.namespace_uri.clone(),
            read_nodes,
            target: parse_node_id("probe.target", &self.target)?,
            write_value: OpcUaValue::Double(self.write_value),
        })
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Validates the logging configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the filter directive for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ConfigError::validation(
                "logging.level",
                format!("unknown log level '{}'", other),
            )),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// Compact single-line format.
    Compact,
    /// JSON objects.
    Json,
}

// =============================================================================
// Secret Value
// =============================================================================

/// A secret that is redacted whenever it is printed or serialized.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(String);

impl SecretValue {
    /// Creates a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the plain value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue(***)")
    }
}

impl Serialize for SecretValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("***")
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Parses a node id, naming the field on failure.
pub fn parse_node_id(field: &str, raw: &str) -> ConfigResult<NodeId> {
    raw.parse::<NodeId>()
        .map_err(|e| ConfigError::invalid_node_id(field, raw, e.to_string()))
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        humantime::format_duration(*duration).to_string().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

mod option_duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        duration
            .map(|d| humantime::format_duration(d).to_string())
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => humantime::parse_duration(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_demo_tools() {
        let config = ScopeConfig::default();
        assert_eq!(config.connection.endpoint, "opc.tcp://localhost:4840");
        assert_eq!(config.root_node().unwrap(), NodeId::OBJECTS_FOLDER);
        assert_eq!(config.traverse.max_count, 500_000);
        assert_eq!(config.traverse.preview, 10);
        assert_eq!(config.probe.namespace_uri, "urn:simple-server");
        assert_eq!(config.probe.nodes, vec!["ns=2;s=v1", "ns=2;s=v2", "ns=2;s=v3", "ns=2;s=v4"]);
        assert_eq!(config.probe.target, "ns=2;s=v4");
        assert_eq!(config.probe.write_value, 50.0);
        assert!(config.deadline().is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_probe_plan_conversion() {
        let plan = ScopeConfig::default().probe_plan().unwrap();
        assert_eq!(plan, ProbePlan::default());
    }

    #[test]
    fn test_traversal_options_conversion() {
        let mut config = ScopeConfig::default();
        config.traverse.max_count = 42;
        config.traverse.order = WorkListOrder::Queue;
        config.traverse.visit = VisitPolicy::Deduplicate;

        let options = config.traversal_options();
        assert_eq!(options.max_count, 42);
        assert_eq!(options.order, WorkListOrder::Queue);
        assert!(options.visit.deduplicates());
    }

    #[test]
    fn test_endpoint_scheme_required() {
        let mut config = ScopeConfig::default();
        config.connection.endpoint = "http://localhost:4840".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_security_consistency() {
        let mut config = ScopeConfig::default();
        config.connection.security_mode = SecurityMode::Sign;
        assert!(config.validate().is_err());

        config.connection.security_policy = SecurityPolicy::Basic256Sha256;
        config.validate().unwrap();
        assert!(config.to_opcua_config().unwrap().uses_security());
    }

    #[test]
    fn test_username_requires_password() {
        let mut config = ScopeConfig::default();
        config.connection.username = Some("operator".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::MissingField { .. })));

        config.connection.password = Some(SecretValue::new("pw"));
        let ua = config.to_opcua_config().unwrap();
        assert!(!ua.user_token.is_anonymous());
    }

    #[test]
    fn test_bad_node_id_names_field() {
        let mut config = ScopeConfig::default();
        config.probe.nodes.push("nonsense".to_string());
        match config.validate() {
            Err(ConfigError::InvalidNodeId { field, node_id, .. }) => {
                assert_eq!(field, "probe.nodes[4]");
                assert_eq!(node_id, "nonsense");
            }
            other => panic!("expected InvalidNodeId, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_bound() {
        let mut config = ScopeConfig::default();
        config.traverse.preview = MAX_PREVIEW + 1;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange { .. })));
    }

    #[test]
    fn test_secret_redaction() {
        let secret = SecretValue::new("hunter2");
        assert_eq!(format!("{:?}", secret), "SecretValue(***)");
        assert_eq!(serde_json::to_string(&secret).unwrap(), "\"***\"");
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
