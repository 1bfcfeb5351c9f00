//! Configuration loading and management.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::casemap::CaseMapping;
use crate::error::{NumericError, ProfileParseError};
use crate::numeric::{raw, NumericProfile, RawProfile};

/// Configuration errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown numeric profile: {0}")]
    UnknownProfile(String),
    #[error("invalid numeric profile file {path}: {source}")]
    ProfileFile {
        path: PathBuf,
        #[source]
        source: ProfileParseError,
    },
    #[error("numeric profile rejected: {0}")]
    Numeric(#[from] NumericError),
    #[error("missing parameter {param} for module {module}")]
    MissingParam { module: String, param: String },
    #[error("parameter {param} of module {module} is not a valid {expected}")]
    InvalidParam {
        module: String,
        param: String,
        expected: &'static str,
    },
}

/// Bot configuration for one connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix that introduces bot commands in messages (e.g. `!`).
    pub commands_prefix: String,
    /// Case mapping used to compare nicknames and channels.
    pub casemapping: CaseMapping,
    /// Builtin raw profiles to register, in order.
    pub numeric_profiles: Vec<String>,
    /// Raw profile files registered after the builtin ones.
    pub profile_files: Vec<PathBuf>,
    /// Per-module parameters.
    pub modules: BTreeMap<String, ModuleSettings>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            commands_prefix: "!".to_owned(),
            casemapping: CaseMapping::default(),
            numeric_profiles: vec!["RFC2812".to_owned()],
            profile_files: Vec::new(),
            modules: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(text)?;
        for (name, settings) in config.modules.iter_mut() {
            settings.module = name.clone();
        }
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "loading configuration");
        Self::from_toml_str(&text)
    }

    /// Build the numeric profile described by this configuration.
    pub fn numeric_profile(&self) -> Result<NumericProfile, ConfigError> {
        let mut numerics = NumericProfile::new();

        for name in &self.numeric_profiles {
            let profile = raw::builtin(name).ok_or_else(|| ConfigError::UnknownProfile(name.clone()))?;
            numerics.register(profile)?;
        }

        for path in &self.profile_files {
            let text = std::fs::read_to_string(path)?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let profile = RawProfile::parse(name, &text).map_err(|source| ConfigError::ProfileFile {
                path: path.clone(),
                source,
            })?;
            numerics.register(Arc::new(profile))?;
        }

        Ok(numerics)
    }

    /// Parameters of `module`; empty when the module has no section.
    pub fn module(&self, module: &str) -> ModuleSettings {
        self.modules.get(module).cloned().unwrap_or_else(|| ModuleSettings {
            module: module.to_owned(),
            params: BTreeMap::new(),
        })
    }
}

/// Parameters of one module, as written in its `[modules.<name>]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleSettings {
    #[serde(skip)]
    module: String,
    #[serde(flatten)]
    params: BTreeMap<String, toml::Value>,
}

impl ModuleSettings {
    /// Name of the module these settings belong to.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Whether `param` is set.
    pub fn contains(&self, param: &str) -> bool {
        self.params.contains_key(param)
    }

    /// A parameter as a string; scalar values are stringified.
    pub fn parse_string(&self, param: &str, default: Option<&str>) -> Result<String, ConfigError> {
        match self.params.get(param) {
            Some(toml::Value::String(s)) => Ok(s.clone()),
            Some(toml::Value::Integer(i)) => Ok(i.to_string()),
            Some(toml::Value::Float(f)) => Ok(f.to_string()),
            Some(toml::Value::Boolean(b)) => Ok(b.to_string()),
            Some(_) => Err(self.invalid(param, "string")),
            None => default.map(str::to_owned).ok_or_else(|| self.missing(param)),
        }
    }

    /// A parameter as a boolean.
    ///
    /// Besides TOML booleans, `true/false`, `yes/no`, `on/off` and `1/0`
    /// are accepted in any case.
    pub fn parse_bool(&self, param: &str, default: Option<bool>) -> Result<bool, ConfigError> {
        match self.params.get(param) {
            Some(toml::Value::Boolean(b)) => Ok(*b),
            Some(toml::Value::Integer(0)) => Ok(false),
            Some(toml::Value::Integer(1)) => Ok(true),
            Some(toml::Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(true),
                "false" | "no" | "off" | "0" => Ok(false),
                _ => Err(self.invalid(param, "boolean")),
            },
            Some(_) => Err(self.invalid(param, "boolean")),
            None => default.ok_or_else(|| self.missing(param)),
        }
    }

    /// A parameter as an integer.
    pub fn parse_int(&self, param: &str, default: Option<i64>) -> Result<i64, ConfigError> {
        match self.params.get(param) {
            Some(toml::Value::Integer(i)) => Ok(*i),
            Some(toml::Value::String(s)) => {
                s.trim().parse().map_err(|_| self.invalid(param, "integer"))
            }
            Some(_) => Err(self.invalid(param, "integer")),
            None => default.ok_or_else(|| self.missing(param)),
        }
    }

    /// A parameter as a real number.
    pub fn parse_real(&self, param: &str, default: Option<f64>) -> Result<f64, ConfigError> {
        match self.params.get(param) {
            Some(toml::Value::Float(f)) => Ok(*f),
            Some(toml::Value::Integer(i)) => Ok(*i as f64),
            Some(toml::Value::String(s)) => {
                s.trim().parse().map_err(|_| self.invalid(param, "real number"))
            }
            Some(_) => Err(self.invalid(param, "real number")),
            None => default.ok_or_else(|| self.missing(param)),
        }
    }

    fn missing(&self, param: &str) -> ConfigError {
        ConfigError::MissingParam {
            module: self.module.clone(),
            param: param.to_owned(),
        }
    }

    fn invalid(&self, param: &str, expected: &'static str) -> ConfigError {
        ConfigError::InvalidParam {
            module: self.module.clone(),
            param: param.to_owned(),
            expected,
        }
    }
}
