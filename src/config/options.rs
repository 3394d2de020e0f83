//! Options that change resolver behavior.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a `secretsFrom` delegation carries over from the parent customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegationPolicy {
    /// Only the credential owner changes; feature configuration stays the
    /// customer's own.
    #[default]
    CredentialsOnly,
    /// The parent's `product_config` is merged underneath the customer's own.
    CredentialsAndConfig,
}

impl DelegationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CredentialsOnly => "credentials_only",
            Self::CredentialsAndConfig => "credentials_and_config",
        }
    }
}

impl fmt::Display for DelegationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DelegationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credentials_only" => Ok(Self::CredentialsOnly),
            "credentials_and_config" => Ok(Self::CredentialsAndConfig),
            other => Err(format!(
                "unknown delegation policy '{}' (expected credentials_only or credentials_and_config)",
                other
            )),
        }
    }
}

/// Separator between the component/feature name and the secret name in a
/// manifest section key.
pub const DEFAULT_SECTION_SEPARATOR: &str = "-";

/// Resolver behavior knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    #[serde(default)]
    pub delegation: DelegationPolicy,

    #[serde(default = "default_separator")]
    pub section_separator: String,
}

fn default_separator() -> String {
    DEFAULT_SECTION_SEPARATOR.to_string()
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            delegation: DelegationPolicy::default(),
            section_separator: default_separator(),
        }
    }
}
