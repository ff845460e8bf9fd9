//! Model registry.
//!
//! Maps a model identifier to its metadata, config schema, and a
//! factory producing engine instances. A registry is built once at
//! startup, then shared read-only; there is no global instance.

use std::fmt;

use crate::config::{resolve, ConfigError, ConfigSchema, RawConfig, ResolvedConfig};
use crate::engines::SpeechModel;

/// Factory producing an engine instance from a resolved config.
pub type ModelFactory =
    Box<dyn Fn(&ResolvedConfig) -> Result<Box<dyn SpeechModel>, ModelError> + Send + Sync>;

/// Errors from registry lookups and model construction.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// No model registered under the identifier.
    #[error("Unknown model: '{0}'")]
    Unknown(String),

    /// The underlying engine failed to initialize.
    #[error("Failed to construct model '{identifier}': {message}")]
    Construction { identifier: String, message: String },

    /// The raw config failed schema coercion.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ModelError {
    /// Create an unknown-model error.
    pub fn unknown(identifier: impl Into<String>) -> Self {
        Self::Unknown(identifier.into())
    }

    /// Create a construction error.
    pub fn construction(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            identifier: identifier.into(),
            message: message.into(),
        }
    }
}

/// A registered model: identity, metadata, schema, and factory.
pub struct ModelDescriptor {
    identifier: String,
    description: String,
    url: String,
    schema: ConfigSchema,
    factory: ModelFactory,
}

impl ModelDescriptor {
    /// Create a descriptor.
    pub fn new(
        identifier: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        schema: ConfigSchema,
        factory: impl Fn(&ResolvedConfig) -> Result<Box<dyn SpeechModel>, ModelError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            description: description.into(),
            url: url.into(),
            schema,
            factory: Box::new(factory),
        }
    }

    /// The model identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Human description, shown by selection UIs.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Reference URL for the underlying engine.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The model's config schema.
    pub fn config_schema(&self) -> &ConfigSchema {
        &self.schema
    }
}

impl fmt::Debug for ModelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDescriptor")
            .field("identifier", &self.identifier)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Registry of available models, enumerable in registration order.
///
/// Iteration order drives selection UIs (local engines are registered
/// before API-backed ones), so it is the registration order, never
/// alphabetical.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: Vec<ModelDescriptor>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the engines compiled into this build.
    ///
    /// With no engine features enabled the registry is empty.
    pub fn with_builtin_models() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "whisper-cpp")]
        registry.register(crate::engines::whisper_cpp::descriptor());
        #[cfg(feature = "openai-api")]
        registry.register(crate::engines::openai_api::descriptor());
        registry
    }

    /// Register a model.
    ///
    /// # Panics
    /// Panics if the identifier is already registered; membership is
    /// declared once at startup, so a duplicate is a programming error.
    pub fn register(&mut self, descriptor: ModelDescriptor) {
        assert!(
            !self
                .models
                .iter()
                .any(|m| m.identifier == descriptor.identifier),
            "model '{}' registered twice",
            descriptor.identifier
        );
        tracing::debug!(identifier = %descriptor.identifier, "registered model");
        self.models.push(descriptor);
    }

    /// Look up a model by identifier.
    pub fn describe(&self, identifier: &str) -> Result<&ModelDescriptor, ModelError> {
        self.models
            .iter()
            .find(|m| m.identifier == identifier)
            .ok_or_else(|| ModelError::unknown(identifier))
    }

    /// The config schema of a model.
    pub fn config_schema(&self, identifier: &str) -> Result<&ConfigSchema, ModelError> {
        Ok(self.describe(identifier)?.config_schema())
    }

    /// Identifiers in registration order.
    pub fn list_models(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.identifier.as_str()).collect()
    }

    /// Registered descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter()
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Coerce a raw config against a model's schema.
    pub fn resolve_config(
        &self,
        identifier: &str,
        raw: &RawConfig,
    ) -> Result<ResolvedConfig, ModelError> {
        let descriptor = self.describe(identifier)?;
        Ok(resolve(descriptor.config_schema(), raw)?)
    }

    /// Instantiate a model from an already-resolved config.
    pub fn instantiate_resolved(
        &self,
        identifier: &str,
        config: &ResolvedConfig,
    ) -> Result<Box<dyn SpeechModel>, ModelError> {
        let descriptor = self.describe(identifier)?;
        tracing::info!(identifier, "instantiating model");
        (descriptor.factory)(config)
    }

    /// Coerce a raw config, then instantiate the model.
    ///
    /// Coercion failures surface before the factory runs; factory
    /// failures propagate with the original cause attached.
    pub fn instantiate(
        &self,
        identifier: &str,
        raw: &RawConfig,
    ) -> Result<Box<dyn SpeechModel>, ModelError> {
        let config = self.resolve_config(identifier, raw)?;
        self.instantiate_resolved(identifier, &config)
    }
}
