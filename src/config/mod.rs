//! Configuration system
//!
//! Resolver options are layered:
//! 1. Built-in defaults
//! 2. Config file (saas-config.toml)
//! 3. CLI flags

mod defaults;
mod effective;
mod options;

pub use defaults::BuiltinDefaults;
pub use effective::{ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig, OutputOptions, Settings};
pub use options::{DelegationPolicy, ResolverOptions, DEFAULT_SECTION_SEPARATOR};
