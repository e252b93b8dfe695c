//! Project configuration (resultgen.toml)
//!
//! Every key is optional; an absent file means the defaults below, which
//! match the conventional `[ErrorResult]` marker and `TDS.Results` runtime.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up from the input path upward
pub const CONFIG_FILE_NAME: &str = "resultgen.toml";

/// Project configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Which attribute marks a method for generation
    #[serde(default)]
    pub marker: MarkerConfig,

    /// What counts as a Result-shaped return type
    #[serde(default)]
    pub grammar: GrammarConfig,

    /// Output naming and policies
    #[serde(default)]
    pub emit: EmitConfig,
}

/// Marker attribute settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
    /// Full attribute type name
    pub full_name: String,

    /// Short alias without the `Attribute` suffix
    pub short_name: String,

    /// Parameter carrying the integer code
    pub code_parameter: String,

    /// Parameter carrying the message
    pub message_parameter: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            full_name: "ErrorResultAttribute".to_string(),
            short_name: "ErrorResult".to_string(),
            code_parameter: "errorCode".to_string(),
            message_parameter: "errorMessage".to_string(),
        }
    }
}

impl MarkerConfig {
    /// Whether an attribute name token names the marker, in either form
    pub fn matches(&self, name: &str) -> bool {
        name == self.full_name || name == self.short_name
    }
}

/// Result grammar settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrammarConfig {
    /// Simple name of the Result type
    pub result_type: String,

    /// Generic async wrappers that may hold a Result (`Task<Result>`)
    pub async_wrappers: Vec<String>,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            result_type: "Result".to_string(),
            async_wrappers: vec![
                "Task".to_string(),
                "UniTask".to_string(),
                "ValueTask".to_string(),
            ],
        }
    }
}

/// Which build variants get accessor bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Both, selected by a conditional compilation block
    Both,
    /// Message-carrying accessors only
    Debug,
    /// Message-stripped accessors only
    Release,
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "both" => Ok(Variant::Both),
            "debug" => Ok(Variant::Debug),
            "release" => Ok(Variant::Release),
            other => Err(format!("unknown variant `{}` (expected both, debug or release)", other)),
        }
    }
}

/// What to do when two annotations on one method share an error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateCodePolicy {
    /// Emit both and report a warning
    Warn,
    /// Fault the site
    Error,
    /// Emit both silently
    Allow,
}

/// What to do when two messages on one method derive the same accessor name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Append the error code to the later name and report a warning
    Suffix,
    /// Fault the site
    Error,
}

/// Emission settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitConfig {
    /// Namespace of the runtime `Result` types, imported by every artifact
    pub runtime_namespace: String,

    /// Conditional compilation symbol selecting the message-carrying variant
    pub debug_symbol: String,

    pub variant: Variant,

    /// Prefix of every artifact name
    pub file_prefix: String,

    /// Output directory, relative to the configuration file
    pub out_dir: PathBuf,

    pub duplicate_codes: DuplicateCodePolicy,

    pub name_collisions: CollisionPolicy,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            runtime_namespace: "TDS.Results".to_string(),
            debug_symbol: "DEBUG".to_string(),
            variant: Variant::Both,
            file_prefix: "Gen".to_string(),
            out_dir: PathBuf::from("Generated"),
            duplicate_codes: DuplicateCodePolicy::Warn,
            name_collisions: CollisionPolicy::Suffix,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let names = [
            ("marker.full_name", &self.marker.full_name),
            ("marker.short_name", &self.marker.short_name),
            ("marker.code_parameter", &self.marker.code_parameter),
            ("marker.message_parameter", &self.marker.message_parameter),
            ("grammar.result_type", &self.grammar.result_type),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("`{}` must not be empty", key)));
            }
        }
        if self.grammar.async_wrappers.iter().any(|w| w == &self.grammar.result_type) {
            return Err(ConfigError::Invalid(
                "`grammar.result_type` cannot also be an async wrapper".to_string(),
            ));
        }
        Ok(())
    }

    /// Find the nearest `resultgen.toml` at or above `start`
    pub fn discover(start: &Path) -> Option<PathBuf> {
        let mut dir = if start.is_file() {
            start.parent()?.to_path_buf()
        } else {
            start.to_path_buf()
        };
        loop {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Load the explicit file if given, else the discovered one, else defaults.
    /// Returns the directory relative paths in the configuration resolve
    /// against.
    pub fn resolve(explicit: Option<&Path>, start: &Path) -> Result<(Self, PathBuf), ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(start),
        };
        match path {
            Some(path) => {
                let config = Self::load(&path)?;
                let base = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                tracing::debug!(config = %path.display(), "loaded configuration");
                Ok((config, base))
            }
            None => {
                let base = if start.is_file() {
                    start.parent().map(Path::to_path_buf).unwrap_or_default()
                } else {
                    start.to_path_buf()
                };
                Ok((Self::default(), base))
            }
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
