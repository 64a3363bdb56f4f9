//! Deployment configuration sourced from environment-style key/value pairs.
//!
//! The resolver never reads the process environment on its own. Callers hand
//! it the pairs; the CLI is the only place that passes `std::env::vars()`.

pub mod resolver;

pub use resolver::{ConfigResolver, Configuration, PortField, RUNTIME_FIELDS};
