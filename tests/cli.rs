//! Command-line tests for the `saas-config` binary

mod fixtures;

use serde_json::Value;
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn saas_config(args: &[&str], dir: &TempDir) -> Output {
    Command::new(env!("CARGO_BIN_EXE_saas-config"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("SAAS_CONFIG_LOG")
        .output()
        .expect("failed to run saas-config")
}

fn catalog(file: &str) -> String {
    fixtures::catalog_path(file).to_string_lossy().to_string()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn test_resolve_command() {
    let dir = TempDir::new().unwrap();
    let output = saas_config(
        &[
            "resolve",
            "--customers",
            &catalog("customers.json"),
            "--products",
            &catalog("products.json"),
            "--features",
            &catalog("features.json"),
            "--component-secrets",
            &catalog("component_secrets.json"),
        ],
        &dir,
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let value = stdout_json(&output);
    assert_eq!(value["config"]["inherit_customer"]["acme_eu"]["secret_module_name"], "acme");
    assert_eq!(value["secrets"]["customers_list"], serde_json::json!(["Globex Corp", "acme"]));
}

#[test]
fn test_config_then_secrets() {
    let dir = TempDir::new().unwrap();
    let config = saas_config(
        &[
            "config",
            "--customers",
            &catalog("customers.toml"),
            "--products",
            &catalog("products.json"),
            "--features",
            &catalog("features.json"),
            "--compact",
        ],
        &dir,
    );
    assert!(config.status.success());
    assert_eq!(config.stdout.iter().filter(|b| **b == b'\n').count(), 1);

    let config_path = dir.path().join("resolved.json");
    fs::write(&config_path, &config.stdout).unwrap();

    let secrets = saas_config(
        &[
            "secrets",
            "--customers-config",
            &config_path.to_string_lossy(),
            "--features",
            &catalog("features.json"),
            "--separator",
            ":",
        ],
        &dir,
    );
    assert!(secrets.status.success(), "{}", String::from_utf8_lossy(&secrets.stderr));

    let value = stdout_json(&secrets);
    assert_eq!(value["components_secrets"], serde_json::json!([]));
    assert_eq!(value["products_secrets_map"]["Globex Corp"][0]["section_name"], "sso:idp");
}

#[test]
fn test_verify_reads_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("saas-config.toml"),
        "[resolver]\ndelegation = \"credentials_and_config\"\n",
    )
    .unwrap();

    let output = saas_config(&["verify"], &dir);

    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["config"]["resolver"]["delegation"], "credentials_and_config");
    assert_eq!(value["sources"][1]["origin"], "file");
}

#[test]
fn test_pipeline_error_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let customers = dir.path().join("customers.json");
    fs::write(&customers, r#"{"c1": {"name": "One", "secretsFrom": "ghost"}}"#).unwrap();

    let output = saas_config(
        &[
            "config",
            "--customers",
            &customers.to_string_lossy(),
            "--products",
            &catalog("products.json"),
            "--features",
            &catalog("features.json"),
        ],
        &dir,
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("customer_inheritance: customer 'c1' references non-existent secretsFrom customer 'ghost'"));
}

#[test]
fn test_invalid_delegation_flag_rejected() {
    let dir = TempDir::new().unwrap();
    let output = saas_config(&["--delegation", "everything", "verify"], &dir);

    assert!(!output.status.success());
}
