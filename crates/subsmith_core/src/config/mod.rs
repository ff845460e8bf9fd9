//! Declarative parameter schemas and raw value coercion.
//!
//! Models and tools describe their tunable parameters with a
//! [`ConfigSchema`]; external front ends collect [`RawValue`]s and
//! [`resolve`] turns them into a [`ResolvedConfig`] or fails with a
//! [`ConfigError`] naming the offending parameter.

mod coerce;
mod error;
mod schema;

pub use coerce::{resolve, RawConfig, RawValue, ResolvedConfig};
pub use error::ConfigError;
pub use schema::{ConfigSchema, ConfigSchemaBuilder, ConfigValue, ParamKind, ParamSpec};
