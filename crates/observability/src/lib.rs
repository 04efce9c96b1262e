//! Observability concerns: logging/tracing setup for stocksim binaries.

pub mod tracing;

pub use crate::tracing::{init, init_with_default};
