//! Policy configuration loading
//!
//! This module provides utilities for loading the reschedule policy
//! from environment variables and files.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, probe_policy_paths, FilePolicyStore};
