//! Error types for the resolution engine.
//!
//! Shape problems inside nested values never reach this module: the
//! accessors in `saas_values` degrade them to defaults. What remains here is
//! fatal and aborts the whole computation.

use std::fmt;
use thiserror::Error;

/// A fatal resolution failure, identifying the offending key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A customer has no usable `name`.
    #[error("customer '{customer}' missing '{field}' field")]
    MissingField {
        customer: String,
        field: &'static str,
    },

    /// `secretsFrom` names a customer that is not in the catalog.
    #[error("customer '{customer}' references non-existent secretsFrom customer '{target}'")]
    DanglingReference { customer: String, target: String },

    /// A top-level entity has the wrong shape.
    #[error("{entity} '{key}' is not a {expected} (got {found})")]
    TypeMismatch {
        entity: &'static str,
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A customer present in one derived structure is missing from another.
    #[error("customer '{customer}' not found in {structure}")]
    UnresolvedReference {
        customer: String,
        structure: &'static str,
    },
}

impl ResolveError {
    pub(crate) fn not_a_map(entity: &'static str, key: &str, found: &serde_json::Value) -> Self {
        ResolveError::TypeMismatch {
            entity,
            key: key.to_string(),
            expected: "map",
            found: saas_values::type_name(found),
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::MissingField { .. } => "MISSING_FIELD",
            ResolveError::DanglingReference { .. } => "DANGLING_REFERENCE",
            ResolveError::TypeMismatch { .. } => "TYPE_MISMATCH",
            ResolveError::UnresolvedReference { .. } => "UNRESOLVED_REFERENCE",
        }
    }
}

/// Pipeline stage that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Input,
    CustomerInheritance,
    ProductInheritance,
    SubfeaturesInheritance,
    FeatureSecrets,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::CustomerInheritance => write!(f, "customer_inheritance"),
            Self::ProductInheritance => write!(f, "product_inheritance"),
            Self::SubfeaturesInheritance => write!(f, "subfeatures_inheritance"),
            Self::FeatureSecrets => write!(f, "feature_secrets"),
        }
    }
}

/// A [`ResolveError`] tagged with the stage it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage}: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: ResolveError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: ResolveError) -> Self {
        Self { stage, source }
    }
}

/// Attach a stage to a stage-local result.
pub(crate) trait InStage<T> {
    fn in_stage(self, stage: Stage) -> Result<T, PipelineError>;
}

impl<T> InStage<T> for Result<T, ResolveError> {
    fn in_stage(self, stage: Stage) -> Result<T, PipelineError> {
        self.map_err(|e| PipelineError::new(stage, e))
    }
}
