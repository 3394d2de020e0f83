//! Built-in defaults (layer 1)

use serde::{Deserialize, Serialize};

use super::options::{DelegationPolicy, DEFAULT_SECTION_SEPARATOR};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Delegation policy (default: credentials_only)
    pub delegation: DelegationPolicy,

    /// Manifest section separator (default: "-")
    pub section_separator: String,

    /// Pretty-print JSON output (default: true)
    pub pretty: bool,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            delegation: DelegationPolicy::CredentialsOnly,
            section_separator: DEFAULT_SECTION_SEPARATOR.to_string(),
            pretty: true,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "resolver": {
                "delegation": self.delegation.as_str(),
                "section_separator": self.section_separator
            },
            "output": {
                "pretty": self.pretty
            }
        })
    }
}
