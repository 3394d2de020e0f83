//! Secret requirement lists and per-owner retrieval manifests.

mod aggregate;
mod component;
mod feature;
mod record;

pub use aggregate::{aggregate_secrets, GroupedSecrets, SecretsAggregate, SecretsManifest};
pub use component::build_component_secrets;
pub use feature::build_feature_secrets;
pub use record::{SecretRecord, SecretSection, SecretSubject};
