//! Product/feature inheritance: product defaults under customer overrides,
//! completed against the feature catalog.

use saas_values::{get_list, get_map, merge};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::trace;

use crate::error::ResolveError;

/// Resolve the subscribed products of every customer.
///
/// Output shape: `customer key -> product key -> resolved product`. Every
/// resolved product carries `name` and a `features` map whose key set is
/// exactly the feature catalog's.
pub fn resolve_products(
    customers: &Map<String, Value>,
    products: &Map<String, Value>,
    features: &Map<String, Value>,
) -> Result<Map<String, Value>, ResolveError> {
    let mut resolved = Map::new();

    for (customer_key, customer_value) in customers {
        let customer = customer_value
            .as_object()
            .ok_or_else(|| ResolveError::not_a_map("customer", customer_key, customer_value))?;

        let subscribed: BTreeSet<String> = get_list(customer, "products")
            .into_iter()
            .filter_map(|p| match p {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect();
        let product_config = get_map(customer, "product_config");

        let mut customer_products = Map::new();
        for (product_key, product_value) in products {
            if !subscribed.contains(product_key) {
                continue;
            }

            let product = product_value
                .as_object()
                .ok_or_else(|| ResolveError::not_a_map("product", product_key, product_value))?;
            let overrides = product_override(product_config, customer_key, product_key)?;

            let merged_features = merge(get_map(product, "features"), get_map(&overrides, "features"));
            let complete_features: Map<String, Value> = features
                .keys()
                .map(|feature| {
                    let value = merged_features
                        .get(feature)
                        .cloned()
                        .unwrap_or(Value::Bool(false));
                    (feature.clone(), value)
                })
                .collect();

            let mut resolved_product = merge(product, &overrides);
            resolved_product.insert("name".to_string(), Value::String(product_key.clone()));
            resolved_product.insert("features".to_string(), Value::Object(complete_features));

            trace!(customer = %customer_key, product = %product_key, "resolved product");
            customer_products.insert(product_key.clone(), Value::Object(resolved_product));
        }

        resolved.insert(customer_key.clone(), Value::Object(customer_products));
    }

    Ok(resolved)
}

/// The customer's override block for one product.
///
/// Absent or `null` means no override. Anything else that is not a map is
/// a fatal shape error.
fn product_override(
    product_config: &Map<String, Value>,
    customer_key: &str,
    product_key: &str,
) -> Result<Map<String, Value>, ResolveError> {
    match product_config.get(product_key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(other) => Err(ResolveError::not_a_map(
            "product override",
            &format!("{}.{}", customer_key, product_key),
            other,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_customer_override_wins() {
        let customers = catalog(json!({
            "c1": {
                "name": "One",
                "products": ["p1"],
                "product_config": {"p1": {"features": {"f1": true}}}
            }
        }));
        let products = catalog(json!({"p1": {"features": {"f1": false}}}));
        let features = catalog(json!({"f1": {}, "f2": {}, "f3": {}}));

        let resolved = resolve_products(&customers, &products, &features).unwrap();
        let product = &resolved["c1"]["p1"];

        assert_eq!(product["name"], "p1");
        assert_eq!(product["features"], json!({"f1": true, "f2": false, "f3": false}));
    }

    #[test]
    fn test_features_complete_against_catalog() {
        let customers = catalog(json!({"c1": {"name": "One", "products": ["p1"]}}));
        // f9 is not in the feature catalog and must not survive completion
        let products = catalog(json!({"p1": {"features": {"f1": true, "f9": true}}}));
        let features = catalog(json!({"f1": {}, "f2": {}}));

        let resolved = resolve_products(&customers, &products, &features).unwrap();
        let keys: Vec<&String> = resolved["c1"]["p1"]["features"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(keys, vec!["f1", "f2"]);
    }

    #[test]
    fn test_unsubscribed_products_omitted() {
        let customers = catalog(json!({"c1": {"name": "One", "products": ["p1", "missing", 7]}}));
        let products = catalog(json!({"p1": {"features": {}}, "p2": {"features": {}}}));

        let resolved = resolve_products(&customers, &products, &Map::new()).unwrap();
        assert_eq!(resolved["c1"].as_object().unwrap().len(), 1);
        assert!(resolved["c1"].get("p2").is_none());
    }

    #[test]
    fn test_no_subscriptions_yields_empty_map() {
        let customers = catalog(json!({"c1": {"name": "One"}}));
        let products = catalog(json!({"p1": {"features": {"f1": true}}}));

        let resolved = resolve_products(&customers, &products, &Map::new()).unwrap();
        assert_eq!(resolved["c1"], json!({}));
    }

    #[test]
    fn test_override_extra_keys_survive() {
        let customers = catalog(json!({
            "c1": {
                "name": "One",
                "products": ["p1"],
                "product_config": {
                    "p1": {"feature_config": {"f1": {"subfeatures": {"s1": false}}}, "region": "eu"}
                }
            }
        }));
        let products = catalog(json!({"p1": {"features": {"f1": true}, "tier": "gold"}}));
        let features = catalog(json!({"f1": {}}));

        let resolved = resolve_products(&customers, &products, &features).unwrap();
        let product = &resolved["c1"]["p1"];
        assert_eq!(product["tier"], "gold");
        assert_eq!(product["region"], "eu");
        assert_eq!(product["feature_config"]["f1"]["subfeatures"]["s1"], false);
    }

    #[test]
    fn test_product_not_a_map_is_fatal() {
        let customers = catalog(json!({"c1": {"name": "One", "products": ["p1"]}}));
        let products = catalog(json!({"p1": true}));

        let err = resolve_products(&customers, &products, &Map::new()).unwrap_err();
        assert_eq!(err.to_string(), "product 'p1' is not a map (got bool)");
    }

    #[test]
    fn test_unsubscribed_malformed_product_ignored() {
        let customers = catalog(json!({"c1": {"name": "One", "products": []}}));
        let products = catalog(json!({"p1": true}));

        assert!(resolve_products(&customers, &products, &Map::new()).is_ok());
    }

    #[test]
    fn test_override_not_a_map_is_fatal() {
        let customers = catalog(json!({
            "c1": {"name": "One", "products": ["p1"], "product_config": {"p1": ["f1"]}}
        }));
        let products = catalog(json!({"p1": {"features": {}}}));

        let err = resolve_products(&customers, &products, &Map::new()).unwrap_err();
        assert_eq!(err.to_string(), "product override 'c1.p1' is not a map (got list)");
    }
}
