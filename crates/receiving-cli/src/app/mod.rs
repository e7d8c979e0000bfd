//! Application-level utilities for the Receiving CLI.
//!
//! This module provides:
//! - Path resolution for config and store
//! - The per-invocation application context
//! - Persistence of staged drafts between invocations

mod context;
mod resolver;

// Re-export public API
pub use context::{load_staging, save_staging, AppContext};
pub use resolver::resolve_config_path;
