//! Raw value coercion.
//!
//! Converts raw, UI-collected values into schema-typed values. Text
//! fields normalize `""` and the literal `"None"` to unset; numeric
//! parameters parse from text; booleans pass through as-is; choices
//! must match an option. Coercion is all-or-nothing: the first failure
//! aborts the whole call.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::error::ConfigError;
use crate::config::schema::{ConfigSchema, ConfigValue, ParamKind};

/// A raw parameter value as collected by an external front end.
///
/// Form fields produce text; richer front ends may send typed numbers,
/// booleans, or an explicit null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Explicitly unset.
    Null,
    /// Boolean, from a checkbox or JSON bool.
    Boolean(bool),
    /// Integer number.
    Integer(i64),
    /// Real number.
    Real(f64),
    /// Text, from a form field.
    Text(String),
}

impl RawValue {
    /// Human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
        }
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Raw values keyed by parameter name.
///
/// Keys not present in the schema are ignored; validation follows the
/// schema's declaration order, not the map's.
pub type RawConfig = HashMap<String, RawValue>;

/// A schema-validated, type-coerced parameter set.
///
/// Keys are stored canonically ordered, so structurally equal configs
/// serialize identically regardless of how they were built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl ResolvedConfig {
    /// Look up a value by parameter name.
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.values.get(name)
    }

    /// The text value of a parameter, if set and text.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(ConfigValue::as_str)
    }

    /// The integer value of a parameter, if set and integer.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(ConfigValue::as_i64)
    }

    /// The real value of a parameter, if set and real.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(ConfigValue::as_f64)
    }

    /// The boolean value of a parameter, if set and boolean.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(ConfigValue::as_bool)
    }

    /// Iterate over values in canonical (sorted) key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the config has no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Canonical JSON serialization (sorted keys).
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(&self.values).unwrap_or_default()
    }

    /// SHA-256 hash of the canonical serialization, as lowercase hex.
    ///
    /// Structurally equal configs produce identical fingerprints.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_json().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Coerce raw values against a schema into a [`ResolvedConfig`].
///
/// Parameters absent from `raw` fall back to their schema default
/// unchanged. The first failing parameter (in schema order) aborts the
/// call; nothing partial is returned.
pub fn resolve(schema: &ConfigSchema, raw: &RawConfig) -> Result<ResolvedConfig, ConfigError> {
    let mut values = BTreeMap::new();

    for (name, spec) in schema.iter() {
        let value = match raw.get(name) {
            None => spec.default.clone(),
            Some(raw_value) => coerce_value(name, &spec.kind, raw_value)?,
        };
        values.insert(name.to_string(), value);
    }

    Ok(ResolvedConfig { values })
}

/// Coerce a single raw value against a parameter kind.
fn coerce_value(
    name: &str,
    kind: &ParamKind,
    raw: &RawValue,
) -> Result<ConfigValue, ConfigError> {
    // An explicit null is "unset" for every kind.
    if matches!(raw, RawValue::Null) {
        return Ok(ConfigValue::Null);
    }

    match kind {
        ParamKind::Text => match raw {
            RawValue::Text(s) if is_unset_text(s) => Ok(ConfigValue::Null),
            RawValue::Text(s) => Ok(ConfigValue::Text(s.clone())),
            other => Err(ConfigError::type_mismatch(name, "text", other.type_name())),
        },
        ParamKind::Integer => match raw {
            RawValue::Text(s) if is_unset_text(s) => Ok(ConfigValue::Null),
            RawValue::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(ConfigValue::Integer)
                .map_err(|_| ConfigError::parse_failure(name, s, "integer")),
            RawValue::Integer(i) => Ok(ConfigValue::Integer(*i)),
            other => Err(ConfigError::type_mismatch(name, "integer", other.type_name())),
        },
        ParamKind::Real => match raw {
            RawValue::Text(s) if is_unset_text(s) => Ok(ConfigValue::Null),
            RawValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(ConfigValue::Real)
                .map_err(|_| ConfigError::parse_failure(name, s, "real")),
            RawValue::Real(f) => Ok(ConfigValue::Real(*f)),
            RawValue::Integer(i) => Ok(ConfigValue::Real(*i as f64)),
            other => Err(ConfigError::type_mismatch(name, "real", other.type_name())),
        },
        ParamKind::Boolean => match raw {
            RawValue::Boolean(b) => Ok(ConfigValue::Boolean(*b)),
            other => Err(ConfigError::type_mismatch(name, "boolean", other.type_name())),
        },
        ParamKind::Choice { options } => match raw {
            RawValue::Text(s) if options.iter().any(|o| o == s) => {
                Ok(ConfigValue::Text(s.clone()))
            }
            RawValue::Text(s) => Err(ConfigError::not_an_option(name, s)),
            other => Err(ConfigError::type_mismatch(
                name,
                "enumerated-choice",
                other.type_name(),
            )),
        },
    }
}

/// `""` and the literal `"None"` mean "unset" in text form fields.
fn is_unset_text(s: &str) -> bool {
    s.is_empty() || s == "None"
}
