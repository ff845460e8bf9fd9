//! Declarative parameter schemas.
//!
//! A [`ConfigSchema`] describes a model's or tool's tunable parameters:
//! name, semantic kind, human description, allowed options and default.
//! Schemas serialize to the ordered-mapping JSON contract that selection
//! UIs render (`name -> {type, description, options, default}`).

use serde::{Deserialize, Serialize};

/// Semantic kind of a parameter, with the option set for choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParamKind {
    /// Free text.
    Text,
    /// Whole number.
    Integer,
    /// Floating point number.
    Real,
    /// True/false flag.
    Boolean,
    /// One of a fixed, non-empty set of text options.
    #[serde(rename = "enumerated-choice")]
    Choice { options: Vec<String> },
}

impl ParamKind {
    /// Human-readable kind name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Boolean => "boolean",
            Self::Choice { .. } => "enumerated-choice",
        }
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A schema-typed parameter value.
///
/// `Null` means "unset"; engines treat unset parameters as their own
/// internal defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Unset.
    #[default]
    Null,
    /// Boolean value.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// Real value.
    Real(f64),
    /// Text value.
    Text(String),
}

impl ConfigValue {
    /// Whether the value is unset.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The text value, if set and text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The integer value, if set and integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The real value, if set and real.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// The boolean value, if set and boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

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

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        Self::Real(f)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// Description of a single parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Semantic kind, with options for choices.
    #[serde(flatten)]
    pub kind: ParamKind,
    /// Human description, shown by selection UIs.
    pub description: String,
    /// Default value; `Null` means unset.
    #[serde(default)]
    pub default: ConfigValue,
}

/// An ordered set of parameter specs.
///
/// Declaration order is iteration order; coercion validates parameters
/// in this order so error reporting is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSchema {
    params: Vec<(String, ParamSpec)>,
}

impl ConfigSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a schema.
    pub fn builder() -> ConfigSchemaBuilder {
        ConfigSchemaBuilder::default()
    }

    /// Look up a parameter spec by name.
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    /// Iterate over parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamSpec)> {
        self.params.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the schema has no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The schema as the ordered-mapping JSON exchange value.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, spec) in &self.params {
            let value = serde_json::to_value(spec).unwrap_or_default();
            map.insert(name.clone(), value);
        }
        serde_json::Value::Object(map)
    }
}

/// Builder for [`ConfigSchema`].
///
/// Schemas are declared in code by model and tool authors, so misuse is
/// a programming error: the builder panics on a duplicate parameter
/// name, an empty option set, or a choice default outside its options.
#[derive(Debug, Default)]
pub struct ConfigSchemaBuilder {
    params: Vec<(String, ParamSpec)>,
}

impl ConfigSchemaBuilder {
    /// Add a text parameter.
    ///
    /// # Panics
    /// Panics if `name` is already declared.
    pub fn text(
        self,
        name: &str,
        description: &str,
        default: Option<&str>,
    ) -> Self {
        self.param(
            name,
            ParamKind::Text,
            description,
            default.map(ConfigValue::from).unwrap_or_default(),
        )
    }

    /// Add an integer parameter.
    ///
    /// # Panics
    /// Panics if `name` is already declared.
    pub fn integer(self, name: &str, description: &str, default: Option<i64>) -> Self {
        self.param(
            name,
            ParamKind::Integer,
            description,
            default.map(ConfigValue::from).unwrap_or_default(),
        )
    }

    /// Add a real parameter.
    ///
    /// # Panics
    /// Panics if `name` is already declared.
    pub fn real(self, name: &str, description: &str, default: Option<f64>) -> Self {
        self.param(
            name,
            ParamKind::Real,
            description,
            default.map(ConfigValue::from).unwrap_or_default(),
        )
    }

    /// Add a boolean parameter.
    ///
    /// # Panics
    /// Panics if `name` is already declared.
    pub fn boolean(self, name: &str, description: &str, default: Option<bool>) -> Self {
        self.param(
            name,
            ParamKind::Boolean,
            description,
            default.map(ConfigValue::from).unwrap_or_default(),
        )
    }

    /// Add an enumerated-choice parameter.
    ///
    /// # Panics
    /// Panics if `name` is already declared, if `options` is empty, or
    /// if `default` is not a member of `options`.
    pub fn choice(
        self,
        name: &str,
        description: &str,
        options: &[&str],
        default: Option<&str>,
    ) -> Self {
        assert!(
            !options.is_empty(),
            "choice parameter '{name}' has no options"
        );
        if let Some(default) = default {
            assert!(
                options.contains(&default),
                "choice parameter '{name}': default '{default}' is not an option"
            );
        }
        self.param(
            name,
            ParamKind::Choice {
                options: options.iter().map(|s| s.to_string()).collect(),
            },
            description,
            default.map(ConfigValue::from).unwrap_or_default(),
        )
    }

    /// Finish building.
    pub fn build(self) -> ConfigSchema {
        ConfigSchema {
            params: self.params,
        }
    }

    fn param(
        mut self,
        name: &str,
        kind: ParamKind,
        description: &str,
        default: ConfigValue,
    ) -> Self {
        assert!(
            !self.params.iter().any(|(n, _)| n == name),
            "parameter '{name}' declared twice"
        );
        self.params.push((
            name.to_string(),
            ParamSpec {
                kind,
                description: description.to_string(),
                default,
            },
        ));
        self
    }
}
