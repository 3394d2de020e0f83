//! SaaS Config CLI
//!
//! Entry point for the `saas-config` command-line tool.

use clap::{Parser, Subcommand};
use saas_config::catalog::load_document;
use saas_config::config::{DelegationPolicy, EffectiveConfig};
use saas_config::{CustomerConfig, CustomerSecrets, Resolver};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG_FILE: &str = "saas-config.toml";

/// Environment variable holding the log filter
const LOG_ENV: &str = "SAAS_CONFIG_LOG";

#[derive(Parser)]
#[command(name = "saas-config")]
#[command(about = "Tenant configuration and secrets resolution", version)]
struct Cli {
    /// Path to config file (default: ./saas-config.toml when present)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Delegation policy (credentials_only, credentials_and_config)
    #[arg(long, global = true)]
    delegation: Option<DelegationPolicy>,

    /// Manifest section separator
    #[arg(long, global = true)]
    separator: Option<String>,

    /// Print compact JSON instead of pretty-printed
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve customers, products and sub-features
    Config {
        /// Customer catalog (.json or .toml)
        #[arg(long)]
        customers: PathBuf,

        /// Product catalog (.json or .toml)
        #[arg(long)]
        products: PathBuf,

        /// Feature catalog (.json or .toml)
        #[arg(long)]
        features: PathBuf,
    },

    /// Build secret lists and manifests from a resolved configuration
    Secrets {
        /// Output of the `config` command
        #[arg(long)]
        customers_config: PathBuf,

        /// Feature catalog (.json or .toml)
        #[arg(long)]
        features: PathBuf,

        /// Component secret table (.json or .toml)
        #[arg(long)]
        component_secrets: Option<PathBuf>,
    },

    /// Run configuration and secrets resolution back to back
    Resolve {
        /// Customer catalog (.json or .toml)
        #[arg(long)]
        customers: PathBuf,

        /// Product catalog (.json or .toml)
        #[arg(long)]
        products: PathBuf,

        /// Feature catalog (.json or .toml)
        #[arg(long)]
        features: PathBuf,

        /// Component secret table (.json or .toml)
        #[arg(long)]
        component_secrets: Option<PathBuf>,
    },

    /// Validate the configuration and print the effective options
    Verify,
}

/// Output of the `resolve` command
#[derive(Serialize)]
struct Resolved<'a> {
    config: &'a CustomerConfig,
    secrets: &'a CustomerSecrets,
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let config = load_effective_config(&cli);
    let resolver = Resolver::new(config.resolver_options());
    let pretty = config.settings().output.pretty && !cli.compact;

    match cli.command {
        Commands::Config {
            customers,
            products,
            features,
        } => {
            let customers = load_or_exit(&customers);
            let products = load_or_exit(&products);
            let features = load_or_exit(&features);

            match resolver.compute_customer_config(&customers, &products, &features) {
                Ok(resolved) => print_json(&resolved, pretty),
                Err(e) => fail(&e),
            }
        }
        Commands::Secrets {
            customers_config,
            features,
            component_secrets,
        } => {
            let customers_config = load_or_exit(&customers_config);
            let features = load_or_exit(&features);
            let component_secrets = load_optional(component_secrets.as_deref());

            match resolver.compute_customer_secrets(&customers_config, &features, &component_secrets)
            {
                Ok(secrets) => print_json(&secrets, pretty),
                Err(e) => fail(&e),
            }
        }
        Commands::Resolve {
            customers,
            products,
            features,
            component_secrets,
        } => {
            let customers = load_or_exit(&customers);
            let products = load_or_exit(&products);
            let features = load_or_exit(&features);
            let component_secrets = load_optional(component_secrets.as_deref());

            let resolved = match resolver.compute_customer_config(&customers, &products, &features)
            {
                Ok(resolved) => resolved,
                Err(e) => fail(&e),
            };
            let secrets = match resolver.compute_customer_secrets(
                &resolved.to_value(),
                &features,
                &component_secrets,
            ) {
                Ok(secrets) => secrets,
                Err(e) => fail(&e),
            };

            print_json(
                &Resolved {
                    config: &resolved,
                    secrets: &secrets,
                },
                pretty,
            );
        }
        Commands::Verify => match config.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => fail(&e),
        },
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_effective_config(cli: &Cli) -> EffectiveConfig {
    let config_path = cli.config.clone().or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.exists().then_some(default)
    });

    match EffectiveConfig::build(config_path.as_deref(), cli_overrides(cli)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}

/// Collect the CLI flags that override config layers.
fn cli_overrides(cli: &Cli) -> Option<Value> {
    let mut resolver = Map::new();
    if let Some(policy) = cli.delegation {
        resolver.insert("delegation".to_string(), json!(policy.as_str()));
    }
    if let Some(ref separator) = cli.separator {
        resolver.insert("section_separator".to_string(), json!(separator));
    }

    if resolver.is_empty() {
        None
    } else {
        Some(json!({ "resolver": resolver }))
    }
}

fn load_or_exit(path: &Path) -> Value {
    match load_document(path) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// The component secret table is optional; absent means none.
fn load_optional(path: Option<&Path>) -> Value {
    match path {
        Some(path) => load_or_exit(path),
        None => {
            debug!("no component secret table given");
            Value::Object(Map::new())
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };

    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => fail(&e),
    }
}

fn fail(err: &dyn std::fmt::Display) -> ! {
    eprintln!("Error: {}", err);
    process::exit(1);
}
