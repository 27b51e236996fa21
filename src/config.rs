//! Configuration management for IPJournal.
//!
//! Values come from an optional YAML file and from command-line arguments,
//! with the command line taking precedence. Keys use the same kebab-case
//! names in both places (`file-log`, `address-mask`, ...).

use anyhow::{Context, Result};
use serde::{de, Deserialize, Deserializer};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::JournalError;
use crate::filter::{FilterParams, RawFilter};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "ipjournal.yaml";

/// Unresolved configuration; every key may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Log file to read
    pub file_log: Option<PathBuf>,

    /// File the counts are written to
    pub file_output: Option<PathBuf>,

    /// Start address of the subnet filter
    #[serde(deserialize_with = "deserialize_scalar")]
    pub address_start: Option<String>,

    /// Mask length of the subnet filter (1-32)
    #[serde(deserialize_with = "deserialize_scalar")]
    pub address_mask: Option<String>,

    /// Lower bound of the time window (dd.MM.yyyy[ HH:mm:ss])
    #[serde(deserialize_with = "deserialize_scalar")]
    pub time_start: Option<String>,

    /// Upper bound of the time window (dd.MM.yyyy[ HH:mm:ss])
    #[serde(deserialize_with = "deserialize_scalar")]
    pub time_end: Option<String>,
}

/// Accept strings and bare numbers, so `address-mask: 24` works unquoted.
fn deserialize_scalar<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or number, found {:?}",
            other
        ))),
    }
}

/// Fully resolved inputs for one run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub file_log: PathBuf,
    pub file_output: PathBuf,
    pub filter: FilterParams,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to unit rather than a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load `path` if given, otherwise the default file if it exists.
    ///
    /// An explicitly requested file must exist; the default one is optional.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    debug!("Using config file {:?}", default);
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Layer `overrides` on top of `self`. Empty strings do not override.
    pub fn merge(self, overrides: Config) -> Config {
        fn pick<T>(base: Option<T>, over: Option<T>, empty: impl Fn(&T) -> bool) -> Option<T> {
            match over {
                Some(v) if !empty(&v) => Some(v),
                _ => base,
            }
        }
        let no_path = |p: &PathBuf| p.as_os_str().is_empty();
        let no_str = |s: &String| s.is_empty();

        Config {
            file_log: pick(self.file_log, overrides.file_log, no_path),
            file_output: pick(self.file_output, overrides.file_output, no_path),
            address_start: pick(self.address_start, overrides.address_start, no_str),
            address_mask: pick(self.address_mask, overrides.address_mask, no_str),
            time_start: pick(self.time_start, overrides.time_start, no_str),
            time_end: pick(self.time_end, overrides.time_end, no_str),
        }
    }

    pub fn raw_filter(&self) -> RawFilter<'_> {
        RawFilter {
            address_start: self.address_start.as_deref(),
            address_mask: self.address_mask.as_deref(),
            time_start: self.time_start.as_deref(),
            time_end: self.time_end.as_deref(),
        }
    }

    /// Check required keys and build the filter.
    pub fn resolve(&self) -> std::result::Result<RunSettings, JournalError> {
        let file_log = required(&self.file_log, "file-log")?;
        let file_output = required(&self.file_output, "file-output")?;
        let filter = FilterParams::build(self.raw_filter())?;

        Ok(RunSettings {
            file_log,
            file_output,
            filter,
        })
    }
}

fn required(value: &Option<PathBuf>, name: &str) -> std::result::Result<PathBuf, JournalError> {
    match value {
        Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
        _ => Err(JournalError::Config(format!(
            "Parameter --{} is required",
            name
        ))),
    }
}
