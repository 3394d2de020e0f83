//! Pipeline orchestration
//!
//! The two externally invokable operations:
//! - `compute_customer_config`: customers → products → sub-features
//! - `compute_customer_secrets`: feature and component secret lists, then
//!   per-owner aggregation
//!
//! Both are pure: inputs are borrowed read-only, every stage builds a new
//! structure, and the first fatal error aborts the whole computation.

use saas_values::get_map;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::config::ResolverOptions;
use crate::error::{InStage, PipelineError, ResolveError, Stage};
use crate::inherit::{resolve_customers, resolve_products, resolve_subfeatures};
use crate::secrets::{
    aggregate_secrets, build_component_secrets, build_feature_secrets, GroupedSecrets,
    SecretRecord, SecretsManifest,
};

/// Output of [`compute_customer_config`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerConfig {
    /// Resolved customers, keyed like the input catalog
    pub inherit_customer: Map<String, Value>,

    /// customer -> product -> resolved product
    pub inherit_product: Map<String, Value>,

    /// `inherit_product` with sub-feature configuration materialized
    pub inherit_products_subfeatures: Map<String, Value>,
}

impl CustomerConfig {
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            "inherit_customer".to_string(),
            Value::Object(self.inherit_customer.clone()),
        );
        map.insert(
            "inherit_product".to_string(),
            Value::Object(self.inherit_product.clone()),
        );
        map.insert(
            "inherit_products_subfeatures".to_string(),
            Value::Object(self.inherit_products_subfeatures.clone()),
        );
        Value::Object(map)
    }
}

/// Output of [`compute_customer_secrets`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerSecrets {
    pub products_secrets: Vec<SecretRecord>,
    pub components_secrets: Vec<SecretRecord>,

    /// Customers whose credentials are actually fetched
    pub customers_list: Vec<String>,

    pub components_secrets_map_grouped: GroupedSecrets,
    pub components_secrets_map: SecretsManifest,
    pub products_secrets_map_grouped: GroupedSecrets,
    pub products_secrets_map: SecretsManifest,
}

impl CustomerSecrets {
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Resolution engine with explicit options.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    options: ResolverOptions,
}

impl Resolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve customers, products and sub-features.
    ///
    /// `null` arguments count as empty catalogs.
    pub fn compute_customer_config(
        &self,
        customers: &Value,
        products: &Value,
        features: &Value,
    ) -> Result<CustomerConfig, PipelineError> {
        let customers = argument("customers", customers).in_stage(Stage::Input)?;
        let products = argument("products", products).in_stage(Stage::Input)?;
        let features = argument("features", features).in_stage(Stage::Input)?;

        let inherit_customer = resolve_customers(customers, self.options.delegation)
            .in_stage(Stage::CustomerInheritance)?;
        debug!(customers = inherit_customer.len(), "customer inheritance resolved");

        let inherit_product = resolve_products(&inherit_customer, products, features)
            .in_stage(Stage::ProductInheritance)?;
        debug!(products = products.len(), features = features.len(), "product inheritance resolved");

        let inherit_products_subfeatures = resolve_subfeatures(&inherit_product, features)
            .in_stage(Stage::SubfeaturesInheritance)?;
        debug!("subfeature inheritance resolved");

        info!(
            customers = inherit_customer.len(),
            delegation = %self.options.delegation,
            "customer configuration computed"
        );

        Ok(CustomerConfig {
            inherit_customer,
            inherit_product,
            inherit_products_subfeatures,
        })
    }

    /// Build secret lists and per-owner manifests from a resolved
    /// configuration.
    ///
    /// `customers_config` is shaped like [`CustomerConfig::to_value`]; its
    /// `inherit_customer` and `inherit_products_subfeatures` keys are read
    /// leniently (missing means empty).
    pub fn compute_customer_secrets(
        &self,
        customers_config: &Value,
        features: &Value,
        component_secrets: &Value,
    ) -> Result<CustomerSecrets, PipelineError> {
        let config = argument("customers_config", customers_config).in_stage(Stage::Input)?;
        let features = argument("features", features).in_stage(Stage::Input)?;
        let component_secrets =
            argument("component_secrets", component_secrets).in_stage(Stage::Input)?;

        let inherit_customer = get_map(config, "inherit_customer");
        let inherit_products_subfeatures = get_map(config, "inherit_products_subfeatures");

        let products_secrets =
            build_feature_secrets(inherit_products_subfeatures, features, inherit_customer)
                .in_stage(Stage::FeatureSecrets)?;
        debug!(records = products_secrets.len(), "feature secrets built");

        let components_secrets = build_component_secrets(inherit_customer, component_secrets);
        debug!(records = components_secrets.len(), "component secrets built");

        let aggregate = aggregate_secrets(
            &products_secrets,
            &components_secrets,
            &self.options.section_separator,
        );
        info!(owners = aggregate.customers.len(), "customer secrets computed");

        Ok(CustomerSecrets {
            products_secrets,
            components_secrets,
            customers_list: aggregate.customers,
            components_secrets_map_grouped: aggregate.components_grouped,
            components_secrets_map: aggregate.components,
            products_secrets_map_grouped: aggregate.products_grouped,
            products_secrets_map: aggregate.products,
        })
    }
}

/// Resolve customer configuration with default options.
pub fn compute_customer_config(
    customers: &Value,
    products: &Value,
    features: &Value,
) -> Result<CustomerConfig, PipelineError> {
    Resolver::default().compute_customer_config(customers, products, features)
}

/// Build customer secret manifests with default options.
pub fn compute_customer_secrets(
    customers_config: &Value,
    features: &Value,
    component_secrets: &Value,
) -> Result<CustomerSecrets, PipelineError> {
    Resolver::default().compute_customer_secrets(customers_config, features, component_secrets)
}

/// Shared empty catalog for `null` arguments.
static EMPTY: OnceLock<Map<String, Value>> = OnceLock::new();

fn argument<'a>(name: &str, value: &'a Value) -> Result<&'a Map<String, Value>, ResolveError> {
    match value {
        Value::Null => Ok(EMPTY.get_or_init(Map::new)),
        Value::Object(map) => Ok(map),
        other => Err(ResolveError::not_a_map("argument", name, other)),
    }
}
