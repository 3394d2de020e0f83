//! Secrets required by platform components, for every customer.

use saas_values::{distinct, get_list};
use serde_json::{Map, Value};

use super::record::{secret_owner, SecretRecord, SecretSubject};

/// One record per (customer, component, secret), deduplicated.
///
/// `component_secrets` has the shape `component -> secret -> {fields}`.
/// Component secrets are not gated by feature enablement. Entries that are
/// not maps are ignored.
pub fn build_component_secrets(
    customers: &Map<String, Value>,
    component_secrets: &Map<String, Value>,
) -> Vec<SecretRecord> {
    let mut records = Vec::new();

    for customer in customers.values().filter_map(Value::as_object) {
        let (name, owner) = secret_owner(customer);

        for (component_name, component_value) in component_secrets {
            let Some(component) = component_value.as_object() else {
                continue;
            };

            for (secret_name, secret_value) in component {
                let Some(secret) = secret_value.as_object() else {
                    continue;
                };

                records.push(SecretRecord {
                    customer: name.clone(),
                    subject: SecretSubject::Component(component_name.clone()),
                    secret: secret_name.clone(),
                    fields: get_list(secret, "fields"),
                    secret_customer: owner.clone(),
                });
            }
        }
    }

    distinct(records)
}
