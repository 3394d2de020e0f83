//! Secret requirement records and manifest sections.

use saas_values::get_str;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What a secret is required by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretSubject {
    Feature(String),
    Component(String),
}

impl SecretSubject {
    pub fn name(&self) -> &str {
        match self {
            Self::Feature(name) | Self::Component(name) => name,
        }
    }
}

/// One secret a customer needs.
///
/// Serializes flat: `{customer, feature|component, secret, fields,
/// secret_customer}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretRecord {
    /// Display name of the customer that needs the secret
    pub customer: String,

    #[serde(flatten)]
    pub subject: SecretSubject,

    pub secret: String,

    /// Field names to retrieve, as declared in the catalog
    pub fields: Vec<Value>,

    /// Customer whose credential material is actually fetched
    pub secret_customer: String,
}

impl SecretRecord {
    /// Manifest section key: subject name and secret name joined by `separator`.
    pub fn section_key(&self, separator: &str) -> String {
        format!("{}{}{}", self.subject.name(), separator, self.secret)
    }
}

/// One manifest entry: a section and the deduplicated fields to fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretSection {
    pub section_name: String,
    pub field_names: Vec<Value>,
}

/// `(name, secret_customer)` of a resolved customer.
///
/// The owner is `secretsFrom` when set, the customer's own name otherwise.
pub(crate) fn secret_owner(customer: &Map<String, Value>) -> (String, String) {
    let name = get_str(customer, "name");
    let owner = match get_str(customer, "secretsFrom") {
        "" => name,
        secrets_from => secrets_from,
    };
    (name.to_string(), owner.to_string())
}
