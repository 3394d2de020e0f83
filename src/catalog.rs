//! Catalog documents
//!
//! Customers, products, features and component secrets arrive as JSON or
//! TOML documents. Both are read into `serde_json::Value` so the engine only
//! ever sees one value model.

use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Supported document formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(CatalogError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Load a catalog document from disk.
pub fn load_document(path: &Path) -> Result<Value, CatalogError> {
    let format = DocumentFormat::from_path(path)?;
    let contents = fs::read_to_string(path)
        .map_err(|e| CatalogError::Io(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), ?format, "loading catalog document");
    parse_document(&contents, format)
        .map_err(|e| CatalogError::Parse(format!("{}: {}", path.display(), e)))
}

/// Parse document text in the given format.
pub fn parse_document(contents: &str, format: DocumentFormat) -> Result<Value, String> {
    match format {
        DocumentFormat::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
        DocumentFormat::Toml => toml::from_str::<toml::Value>(contents)
            .map(toml_to_json)
            .map_err(|e| e.to_string()),
    }
}

/// Convert a TOML value to a JSON value.
pub(crate) fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("unsupported document format (expected .json or .toml): {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_parse_toml_catalog() {
        let doc = r#"
            [customer1]
            name = "Customer One"
            products = ["theproduct"]

            [customer1.product_config.theproduct.features]
            feat1 = true
        "#;

        let value = parse_document(doc, DocumentFormat::Toml).unwrap();
        assert_eq!(
            value,
            json!({
                "customer1": {
                    "name": "Customer One",
                    "products": ["theproduct"],
                    "product_config": {"theproduct": {"features": {"feat1": true}}}
                }
            })
        );
    }

    #[test]
    fn test_toml_numbers() {
        let value = parse_document("a = 3\nb = 1.5\nc = nan", DocumentFormat::Toml).unwrap();
        assert_eq!(value["a"], 3);
        assert_eq!(value["b"], 1.5);
        assert!(value["c"].is_null());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("features.json")).unwrap(),
            DocumentFormat::Json
        );
        assert!(matches!(
            DocumentFormat::from_path(Path::new("features.yaml")),
            Err(CatalogError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_json_document() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"feat1": {{"subfeatures": {{"sub1": true}}}}}}"#).unwrap();

        let value = load_document(file.path()).unwrap();
        assert_eq!(value["feat1"]["subfeatures"]["sub1"], true);
    }

    #[test]
    fn test_load_invalid_json_reports_path() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{not json").unwrap();

        let err = load_document(file.path()).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_document(Path::new("/nonexistent/customers.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
