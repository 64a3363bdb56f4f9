//! Quizstack Core Library
//!
//! Composes the cloud topology of the quiz API service: an imported network,
//! a compute cluster, a replicated load-balanced container service with a
//! single database egress rule, and optionally a TLS-terminated DNS name.
//! The output is a declarative [`Topology`] for a realization engine.

pub mod compose;
pub mod config;
pub mod defaults;
pub mod env;
pub mod error;
pub mod lookup;
pub mod observability;
pub mod types;

// Re-export commonly used items
pub use compose::{realization_order, TopologyComposer};
pub use config::ComposerSettings;
pub use env::{ConfigResolver, Configuration};
pub use error::{FailureKind, QuizstackError, Result};
pub use lookup::{ContextLookup, LookupContext, ResourceLookup};
pub use observability::init as init_observability;
pub use types::{OutputFormat, PlanNode, Topology};
