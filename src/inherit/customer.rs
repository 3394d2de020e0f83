//! Customer inheritance: credential owner and product configuration.

use saas_values::{get_map, get_str, merge};
use serde_json::{Map, Value};
use tracing::trace;

use crate::config::DelegationPolicy;
use crate::error::ResolveError;

/// Resolve every customer of the catalog.
///
/// Each output record is the input customer plus `secret_module_name` (the
/// customer whose credentials are fetched) and a freshly built
/// `product_config`. The first invalid customer aborts the whole batch.
pub fn resolve_customers(
    customers: &Map<String, Value>,
    delegation: DelegationPolicy,
) -> Result<Map<String, Value>, ResolveError> {
    let mut resolved = Map::new();

    for (key, value) in customers {
        let customer = value
            .as_object()
            .ok_or_else(|| ResolveError::not_a_map("customer", key, value))?;

        let name = get_str(customer, "name");
        if name.is_empty() {
            return Err(ResolveError::MissingField {
                customer: key.clone(),
                field: "name",
            });
        }

        let secrets_from = get_str(customer, "secretsFrom");
        let own_config = get_map(customer, "product_config");

        let (secret_module_name, product_config) = if secrets_from.is_empty() {
            (name, merge(&Map::new(), own_config))
        } else {
            let parent_value = customers.get(secrets_from).ok_or_else(|| {
                ResolveError::DanglingReference {
                    customer: key.clone(),
                    target: secrets_from.to_string(),
                }
            })?;
            let parent = parent_value.as_object().ok_or_else(|| {
                ResolveError::not_a_map("parent customer", secrets_from, parent_value)
            })?;

            trace!(customer = %key, secrets_from, %delegation, "delegated customer");
            let config = match delegation {
                DelegationPolicy::CredentialsOnly => merge(&Map::new(), own_config),
                DelegationPolicy::CredentialsAndConfig => {
                    merge(get_map(parent, "product_config"), own_config)
                }
            };
            (secrets_from, config)
        };

        let mut record = customer.clone();
        record.insert(
            "secret_module_name".to_string(),
            Value::String(secret_module_name.to_string()),
        );
        record.insert("product_config".to_string(), Value::Object(product_config));
        resolved.insert(key.clone(), Value::Object(record));
    }

    Ok(resolved)
}
