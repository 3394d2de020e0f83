//! SaaS Config - tenant configuration and secrets resolution
//!
//! This crate resolves a multi-tenant catalog (customers, products, features,
//! sub-features) into fully materialized per-customer configuration, and
//! derives from it the secrets each customer needs plus per-owner retrieval
//! manifests.

pub mod catalog;
pub mod config;
pub mod error;
pub mod inherit;
pub mod pipeline;
pub mod secrets;

pub use config::{DelegationPolicy, EffectiveConfig, ResolverOptions};
pub use error::{PipelineError, ResolveError, Stage};
pub use pipeline::{
    compute_customer_config, compute_customer_secrets, CustomerConfig, CustomerSecrets, Resolver,
};
pub use secrets::{SecretRecord, SecretSection, SecretSubject};
