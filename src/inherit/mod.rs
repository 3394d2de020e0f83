//! Inheritance resolution
//!
//! Three ordered passes, each producing a new structure:
//! 1. Customers: credential owner and merged product configuration
//! 2. Products: product defaults under customer overrides, features completed
//!    against the catalog
//! 3. Sub-features: default sub-feature flags under customer overrides

mod customer;
mod product;
mod subfeature;

pub use customer::resolve_customers;
pub use product::resolve_products;
pub use subfeature::resolve_subfeatures;
