//! Variable sources and merging.
//! Loads variables from a YAML config file and `key=value` literals, then
//! merges them into the single mapping a template is rendered against.

use crate::error::{Error, Result};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Final key to value mapping bound to a template.
///
/// Keys are kept sorted so iteration order never depends on the order the
/// sources declared them in. Literal values are always strings; values loaded
/// from a config file keep the shape the document gives them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables(BTreeMap<String, serde_json::Value>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<BTreeMap<String, serde_json::Value>> for Variables {
    fn from(map: BTreeMap<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), serde_json::Value::String(v.into())))
                .collect(),
        )
    }
}

/// Where a variable comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableSource {
    /// A YAML or JSON document on disk.
    File(PathBuf),
    /// A single `key=value` override from the command line.
    Literal { key: String, value: String },
}

impl VariableSource {
    /// Parses a `key=value` string into a literal source.
    pub fn parse_literal(s: &str) -> Result<Self> {
        let (key, value) = parse_var(s)?;
        Ok(Self::Literal { key, value })
    }

    /// Loads the mapping this source contributes.
    pub fn load(&self) -> Result<Variables> {
        match self {
            VariableSource::File(path) => load_config(path),
            VariableSource::Literal { key, value } => {
                Ok(std::iter::once((key.as_str(), value.as_str())).collect())
            }
        }
    }
}

impl std::fmt::Display for VariableSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableSource::File(path) => write!(f, "config file: '{}'", path.display()),
            VariableSource::Literal { key, .. } => write!(f, "literal: '{key}'"),
        }
    }
}

/// Splits a `key=value` literal on the first `=`.
///
/// Key and value are trimmed of surrounding whitespace. The value may be
/// empty, the key may not.
///
/// # Errors
/// * `Error::FormatError` if the literal has no `=` or an empty key
pub fn parse_var(literal: &str) -> Result<(String, String)> {
    let Some((key, value)) = literal.split_once('=') else {
        return Err(Error::FormatError { literal: literal.to_string() });
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(Error::FormatError { literal: literal.to_string() });
    }

    Ok((key.to_string(), value.trim().to_string()))
}

/// Parses every literal in order, stopping at the first malformed one.
pub fn parse_vars<S: AsRef<str>>(literals: &[S]) -> Result<Vec<(String, String)>> {
    literals.iter().map(|s| parse_var(s.as_ref())).collect()
}

/// Loads variables from a YAML (or JSON) config file.
///
/// A missing file or an empty document yields an empty mapping.
///
/// # Errors
/// * `Error::ConfigReadError` if the file cannot be read, does not parse, or
///   its top level is not a mapping with string keys
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<Variables> {
    let config_path = config_path.as_ref();

    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(
                "Config file '{}' does not exist, no variables loaded from it",
                config_path.display()
            );
            return Ok(Variables::new());
        }
        Err(e) => {
            return Err(Error::ConfigReadError {
                path: config_path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    debug!("Loading variables from {}", config_path.display());
    parse_config(&content).map_err(|reason| Error::ConfigReadError {
        path: config_path.to_path_buf(),
        reason,
    })
}

/// Parses config file content; the error is a human-readable reason.
fn parse_config(content: &str) -> std::result::Result<Variables, String> {
    if content.trim().is_empty() {
        return Ok(Variables::new());
    }

    let document: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| format!("invalid YAML: {e}"))?;

    match document {
        serde_yaml::Value::Null => Ok(Variables::new()),
        serde_yaml::Value::Mapping(_) => {
            let map: BTreeMap<String, serde_json::Value> = serde_yaml::from_value(document)
                .map_err(|e| format!("unsupported variable: {e}"))?;
            Ok(Variables(map))
        }
        other => Err(format!("top level must be a mapping, found {}", yaml_kind(&other))),
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a list",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

/// Merges the file mapping with literal overrides.
///
/// File entries are copied first, then each literal is applied in order so
/// the last literal for a key wins over earlier literals and the file.
pub fn merge(file: Option<Variables>, literals: Vec<(String, String)>) -> Variables {
    let Variables(mut merged) = file.unwrap_or_default();

    for (key, value) in literals {
        if let Some(previous) = merged.insert(key.clone(), serde_json::Value::String(value)) {
            debug!("Variable '{key}' overrides previous value {previous}");
        }
    }

    Variables(merged)
}
