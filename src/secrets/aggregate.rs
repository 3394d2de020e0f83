//! Secret aggregation per owning customer.
//!
//! Records are grouped by `secret_customer` (the customer whose credentials
//! are actually fetched) and by section key, so a delegating customer and
//! its parent share one retrieval manifest.

use saas_values::{distinct, flatten};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use super::record::{SecretRecord, SecretSection};

/// Raw grouping: owner -> section key -> list of `fields` lists.
pub type GroupedSecrets = BTreeMap<String, BTreeMap<String, Vec<Value>>>;

/// Final manifest: owner -> sections with deduplicated field names.
pub type SecretsManifest = BTreeMap<String, Vec<SecretSection>>;

/// Result of [`aggregate_secrets`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretsAggregate {
    /// Distinct owning customers, sorted
    pub customers: Vec<String>,
    pub components_grouped: GroupedSecrets,
    pub components: SecretsManifest,
    pub products_grouped: GroupedSecrets,
    pub products: SecretsManifest,
}

/// Group and deduplicate feature and component secrets per owner.
///
/// The grouped maps hold every owner × section key pair, with an empty list
/// when no record matches. The manifests drop those empty pairs.
pub fn aggregate_secrets(
    product_secrets: &[SecretRecord],
    component_secrets: &[SecretRecord],
    separator: &str,
) -> SecretsAggregate {
    let owners: BTreeSet<&str> = component_secrets
        .iter()
        .chain(product_secrets)
        .map(|r| r.secret_customer.as_str())
        .filter(|owner| !owner.is_empty())
        .collect();

    let components_grouped = group_by_owner(component_secrets, &owners, separator);
    let products_grouped = group_by_owner(product_secrets, &owners, separator);

    SecretsAggregate {
        customers: owners.iter().map(|owner| owner.to_string()).collect(),
        components: manifest(&components_grouped),
        components_grouped,
        products: manifest(&products_grouped),
        products_grouped,
    }
}

fn group_by_owner(records: &[SecretRecord], owners: &BTreeSet<&str>, separator: &str) -> GroupedSecrets {
    let keyed: Vec<(String, &SecretRecord)> = records
        .iter()
        .map(|r| (r.section_key(separator), r))
        .collect();
    let section_keys: BTreeSet<&str> = keyed.iter().map(|(key, _)| key.as_str()).collect();

    let mut grouped = GroupedSecrets::new();
    for owner in owners {
        let mut by_section = BTreeMap::new();
        for section in &section_keys {
            let fields: Vec<Value> = keyed
                .iter()
                .filter(|(key, r)| key == section && r.secret_customer == *owner)
                .map(|(_, r)| Value::Array(r.fields.clone()))
                .collect();
            by_section.insert(section.to_string(), fields);
        }
        grouped.insert(owner.to_string(), by_section);
    }
    grouped
}

fn manifest(grouped: &GroupedSecrets) -> SecretsManifest {
    grouped
        .iter()
        .map(|(owner, by_section)| {
            let sections = by_section
                .iter()
                .filter(|(_, fields)| !fields.is_empty())
                .map(|(section, fields)| SecretSection {
                    section_name: section.clone(),
                    field_names: distinct(flatten(fields)),
                })
                .collect();
            (owner.clone(), sections)
        })
        .collect()
}
