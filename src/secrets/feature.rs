//! Secrets required by enabled features, gated on sub-feature dependencies.

use saas_values::{distinct, get_bool, get_list, get_map};
use serde_json::{Map, Value};
use tracing::trace;

use super::record::{secret_owner, SecretRecord, SecretSubject};
use crate::error::ResolveError;

/// Build the deduplicated list of feature secrets.
///
/// `subfeature_products` is the sub-feature-resolved structure
/// (`customer -> product -> resolved product`), `customers` the resolved
/// customers. A secret is emitted for an enabled feature only when every
/// name in its `depends_on` is an enabled sub-feature.
pub fn build_feature_secrets(
    subfeature_products: &Map<String, Value>,
    features: &Map<String, Value>,
    customers: &Map<String, Value>,
) -> Result<Vec<SecretRecord>, ResolveError> {
    let mut records = Vec::new();

    for (customer_key, products_value) in subfeature_products {
        let products = products_value.as_object().ok_or_else(|| {
            ResolveError::not_a_map("customer products", customer_key, products_value)
        })?;

        let customer_value =
            customers
                .get(customer_key)
                .ok_or_else(|| ResolveError::UnresolvedReference {
                    customer: customer_key.clone(),
                    structure: "inherit_customer",
                })?;
        let customer = customer_value
            .as_object()
            .ok_or_else(|| ResolveError::not_a_map("customer", customer_key, customer_value))?;
        let (name, owner) = secret_owner(customer);

        for product in products.values().filter_map(Value::as_object) {
            let feature_config = get_map(product, "feature_config");

            for (feature_name, enabled) in get_map(product, "features") {
                if enabled.as_bool() != Some(true) {
                    continue;
                }
                let Some(definition) = features.get(feature_name).and_then(Value::as_object) else {
                    continue;
                };

                for (secret_name, secret_value) in get_map(definition, "involved_secrets") {
                    let Some(secret) = secret_value.as_object() else {
                        continue;
                    };

                    let depends_on = get_list(secret, "depends_on");
                    let satisfied = depends_on.iter().all(|dep| {
                        dependency_enabled(dep, feature_config.get(feature_name), definition)
                    });
                    if !satisfied {
                        trace!(
                            customer = %customer_key,
                            feature = %feature_name,
                            secret = %secret_name,
                            "secret dependencies not satisfied"
                        );
                        continue;
                    }

                    records.push(SecretRecord {
                        customer: name.clone(),
                        subject: SecretSubject::Feature(feature_name.clone()),
                        secret: secret_name.clone(),
                        fields: get_list(secret, "fields"),
                        secret_customer: owner.clone(),
                    });
                }
            }
        }
    }

    Ok(distinct(records))
}

/// Whether sub-feature `dep` is enabled for a feature.
///
/// Requires the feature to have a `feature_config` entry. The customer's
/// sub-feature value wins when present (a non-bool counts as disabled);
/// otherwise the catalog default applies.
fn dependency_enabled(dep: &Value, config_entry: Option<&Value>, definition: &Map<String, Value>) -> bool {
    let Some(dep) = dep.as_str() else {
        return false;
    };
    let Some(entry) = config_entry.and_then(Value::as_object) else {
        return false;
    };

    match get_map(entry, "subfeatures").get(dep) {
        Some(value) => value.as_bool().unwrap_or(false),
        None => get_bool(get_map(definition, "subfeatures"), dep),
    }
}
