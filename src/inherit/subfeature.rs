//! Sub-feature inheritance.
//!
//! Sub-feature configuration is only materialized for features that are
//! enabled and ship at least one sub-feature enabled by default.

use saas_values::{any_true, get_map, merge};
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::ResolveError;

/// Materialize `feature_config[feature].subfeatures` on every resolved
/// product.
///
/// Every output product carries a `feature_config` map (possibly empty).
/// Keys already present in a feature's config block are preserved.
pub fn resolve_subfeatures(
    customer_products: &Map<String, Value>,
    features: &Map<String, Value>,
) -> Result<Map<String, Value>, ResolveError> {
    let mut resolved = Map::new();

    for (customer_key, products_value) in customer_products {
        let products = products_value.as_object().ok_or_else(|| {
            ResolveError::not_a_map("customer products", customer_key, products_value)
        })?;

        let mut resolved_products = Map::new();
        for (product_key, product_value) in products {
            let product = product_value.as_object().ok_or_else(|| {
                ResolveError::not_a_map(
                    "product",
                    &format!("{}.{}", customer_key, product_key),
                    product_value,
                )
            })?;

            let existing = get_map(product, "feature_config");
            let mut entries = Map::new();

            for (feature_name, enabled) in get_map(product, "features") {
                if enabled.as_bool() != Some(true) {
                    continue;
                }
                let Some(definition) = features.get(feature_name).and_then(Value::as_object) else {
                    trace!(feature = %feature_name, "feature missing from catalog");
                    continue;
                };

                let defaults = get_map(definition, "subfeatures");
                if defaults.is_empty() || !any_true(defaults) {
                    continue;
                }

                let entry = get_map(existing, feature_name);
                let subfeatures = merge(defaults, get_map(entry, "subfeatures"));

                let mut patch = Map::new();
                patch.insert("subfeatures".to_string(), Value::Object(subfeatures));
                entries.insert(feature_name.clone(), Value::Object(merge(entry, &patch)));
            }

            let mut patch = Map::new();
            patch.insert(
                "feature_config".to_string(),
                Value::Object(merge(existing, &entries)),
            );
            resolved_products.insert(product_key.clone(), Value::Object(merge(product, &patch)));
        }

        resolved.insert(customer_key.clone(), Value::Object(resolved_products));
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_override_wins_default_preserved() {
        let products = catalog(json!({
            "c1": {"p1": {
                "features": {"f1": true},
                "feature_config": {"f1": {"subfeatures": {"s1": false}}}
            }}
        }));
        let features = catalog(json!({"f1": {"subfeatures": {"s1": true, "s2": false}}}));

        let resolved = resolve_subfeatures(&products, &features).unwrap();
        assert_eq!(
            resolved["c1"]["p1"]["feature_config"]["f1"]["subfeatures"],
            json!({"s1": false, "s2": false})
        );
    }

    #[test]
    fn test_defaults_materialized_without_override() {
        let products = catalog(json!({"c1": {"p1": {"features": {"f1": true}}}}));
        let features = catalog(json!({"f1": {"subfeatures": {"s1": true}}}));

        let resolved = resolve_subfeatures(&products, &features).unwrap();
        assert_eq!(
            resolved["c1"]["p1"]["feature_config"],
            json!({"f1": {"subfeatures": {"s1": true}}})
        );
    }

    #[test]
    fn test_skips_disabled_and_all_false_features() {
        let products = catalog(json!({"c1": {"p1": {"features": {"f1": false, "f2": true, "f3": "yes"}}}}));
        let features = catalog(json!({
            "f1": {"subfeatures": {"s1": true}},
            "f2": {"subfeatures": {"s1": false}},
            "f3": {"subfeatures": {"s1": true}}
        }));

        let resolved = resolve_subfeatures(&products, &features).unwrap();
        assert_eq!(resolved["c1"]["p1"]["feature_config"], json!({}));
    }

    #[test]
    fn test_unknown_feature_skipped() {
        let products = catalog(json!({"c1": {"p1": {"features": {"ghost": true}}}}));
        let resolved = resolve_subfeatures(&products, &Map::new()).unwrap();
        assert_eq!(resolved["c1"]["p1"]["feature_config"], json!({}));
    }

    #[test]
    fn test_existing_feature_config_keys_preserved() {
        let products = catalog(json!({"c1": {"p1": {
            "features": {"f1": true, "f2": false},
            "feature_config": {
                "f1": {"subfeatures": {"s2": true}, "endpoint": "x"},
                "f2": {"note": "kept"}
            }
        }}}));
        let features = catalog(json!({"f1": {"subfeatures": {"s1": true, "s2": false}}}));

        let resolved = resolve_subfeatures(&products, &features).unwrap();
        let config = &resolved["c1"]["p1"]["feature_config"];
        assert_eq!(config["f1"]["endpoint"], "x");
        assert_eq!(config["f1"]["subfeatures"], json!({"s1": true, "s2": true}));
        assert_eq!(config["f2"], json!({"note": "kept"}));
    }

    #[test]
    fn test_input_not_mutated() {
        let products = catalog(json!({"c1": {"p1": {"features": {"f1": true}}}}));
        let before = products.clone();
        let features = catalog(json!({"f1": {"subfeatures": {"s1": true}}}));

        resolve_subfeatures(&products, &features).unwrap();
        assert_eq!(products, before);
    }

    #[test]
    fn test_product_not_a_map_is_fatal() {
        let products = catalog(json!({"c1": {"p1": "broken"}}));
        let err = resolve_subfeatures(&products, &Map::new()).unwrap_err();
        assert_eq!(err.to_string(), "product 'c1.p1' is not a map (got string)");
    }

    #[test]
    fn test_customer_products_not_a_map_is_fatal() {
        let products = catalog(json!({"c1": ["p1"]}));
        let err = resolve_subfeatures(&products, &Map::new()).unwrap_err();
        assert_eq!(err.code(), "TYPE_MISMATCH");
    }
}
