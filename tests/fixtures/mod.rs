//! Test fixtures for catalog-driven integration tests
//!
//! The catalog under `tests/fixtures/catalog/` models three customers:
//! - `acme`: owns its credentials, enables `reports`, turns `saml` off
//! - `acme_eu`: delegates credentials to `acme`, enables `sso`
//! - `globex`: product defaults only

#![allow(dead_code)]

use saas_config::catalog::load_document;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Path to the catalog fixture directory
pub fn catalog_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/catalog")
}

/// Path to one catalog document
pub fn catalog_path(file: &str) -> PathBuf {
    catalog_dir().join(file)
}

/// Load one catalog document
pub fn load(file: &str) -> Value {
    let path = catalog_path(file);
    load_document(&path).unwrap_or_else(|e| panic!("failed to load {}: {}", path.display(), e))
}

pub fn customers() -> Value {
    load("customers.json")
}

pub fn products() -> Value {
    load("products.json")
}

pub fn features() -> Value {
    load("features.json")
}

pub fn component_secrets() -> Value {
    load("component_secrets.json")
}
