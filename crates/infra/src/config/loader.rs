//! Policy loader
//!
//! Loads the reschedule policy from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for policy files
//! 4. Supports JSON and TOML formats
//!
//! Every loaded policy is validated before being returned; a malformed
//! policy is a configuration error, never a per-request violation.
//!
//! ## Environment Variables
//! - `SHIFTGUARD_MIN_NOTICE_HOURS`: Minimum notice in hours (required)
//! - `SHIFTGUARD_POLICY_TIME_ZONE`: IANA policy timezone
//! - `SHIFTGUARD_BUSINESS_HOURS`: JSON map of weekday (0-6) to window,
//!   e.g. `{"1": {"start": "09:00", "end": "17:00"}}`
//! - `SHIFTGUARD_CALENDARS_TO_CHECK`: Comma-separated calendar ids
//! - `SHIFTGUARD_TREAT_TENTATIVE_AS_BUSY`: true/false
//! - `SHIFTGUARD_IGNORE_DECLINED`: true/false
//! - `SHIFTGUARD_CONFLICT_METHOD`: `aggregate` or `enumerate`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./policy.json` or `./policy.toml` (current working directory)
//! 2. `./shiftguard.json` or `./shiftguard.toml` (current working directory)
//! 3. `../policy.json` or `../policy.toml` (parent directory)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use shiftguard_core::PolicyStore;
use shiftguard_domain::{BusinessHours, ConflictMethod, Policy, Result, ShiftGuardError};

/// Load the policy with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a policy file.
///
/// # Errors
/// Returns `ShiftGuardError::Config` if:
/// - The policy cannot be loaded from either source
/// - File format is invalid
/// - The loaded policy fails validation
pub fn load() -> Result<Policy> {
    match load_from_env() {
        Ok(policy) => {
            tracing::info!("Policy loaded from environment variables");
            Ok(policy)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load the policy from environment variables
///
/// `SHIFTGUARD_MIN_NOTICE_HOURS` must be present; every other variable
/// falls back to the corresponding `Policy::default` value.
///
/// # Errors
/// Returns `ShiftGuardError::Config` if required variables are missing,
/// have invalid values, or the resulting policy fails validation.
pub fn load_from_env() -> Result<Policy> {
    let min_notice_hours = env_var("SHIFTGUARD_MIN_NOTICE_HOURS").and_then(|s| {
        s.parse::<f64>()
            .map_err(|e| ShiftGuardError::Config(format!("Invalid minimum notice: {}", e)))
    })?;

    let defaults = Policy::default();

    let policy_time_zone = std::env::var("SHIFTGUARD_POLICY_TIME_ZONE").ok();

    let business_hours_by_weekday = match std::env::var("SHIFTGUARD_BUSINESS_HOURS") {
        Ok(raw) => parse_business_hours(&raw)?,
        Err(_) => defaults.business_hours_by_weekday,
    };

    let calendars_to_check = std::env::var("SHIFTGUARD_CALENDARS_TO_CHECK")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let conflict_method = match std::env::var("SHIFTGUARD_CONFLICT_METHOD") {
        Ok(raw) => parse_conflict_method(&raw)?,
        Err(_) => defaults.conflict_method,
    };

    let policy = Policy {
        min_notice_hours,
        policy_time_zone,
        business_hours_by_weekday,
        calendars_to_check,
        treat_tentative_as_busy: env_bool("SHIFTGUARD_TREAT_TENTATIVE_AS_BUSY", true),
        ignore_declined: env_bool("SHIFTGUARD_IGNORE_DECLINED", true),
        conflict_method,
    };

    policy.validate()?;
    Ok(policy)
}

/// Load the policy from a file
///
/// If `path` is `None`, probes multiple locations for policy files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ShiftGuardError::Config` if:
/// - File not found (when path is specified)
/// - No policy file found (when path is `None`)
/// - File format is invalid
/// - The loaded policy fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Policy> {
    let policy_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ShiftGuardError::Config(format!(
                    "Policy file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_policy_paths().ok_or_else(|| {
            ShiftGuardError::Config(
                "No policy file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %policy_path.display(), "Loading policy from file");

    let contents = std::fs::read_to_string(&policy_path)
        .map_err(|e| ShiftGuardError::Config(format!("Failed to read policy file: {}", e)))?;

    let policy = parse_policy(&contents, &policy_path)?;
    policy.validate()?;
    Ok(policy)
}

/// Parse a policy from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_policy(contents: &str, path: &Path) -> Result<Policy> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ShiftGuardError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ShiftGuardError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ShiftGuardError::Config(format!("Unsupported policy format: {}", extension))),
    }
}

/// Probe multiple paths for policy files
///
/// # Returns
/// The first policy file found, or `None` if no file exists.
pub fn probe_policy_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("policy.json"),
            cwd.join("policy.toml"),
            cwd.join("shiftguard.json"),
            cwd.join("shiftguard.toml"),
            cwd.join("../policy.json"),
            cwd.join("../policy.toml"),
        ]);
    }

    candidates.into_iter().find(|p| p.exists())
}

fn parse_business_hours(raw: &str) -> Result<BTreeMap<u8, BusinessHours>> {
    serde_json::from_str(raw)
        .map_err(|e| ShiftGuardError::Config(format!("Invalid business hours: {}", e)))
}

fn parse_conflict_method(raw: &str) -> Result<ConflictMethod> {
    match raw {
        "aggregate" => Ok(ConflictMethod::Aggregate),
        "enumerate" => Ok(ConflictMethod::Enumerate),
        other => {
            Err(ShiftGuardError::Config(format!("Unknown conflict method: {}", other)))
        }
    }
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| ShiftGuardError::Config(format!("Missing environment variable: {}", name)))
}

fn env_bool(name: &str, default: bool) -> bool {
    std::env::var(name).map(|v| v == "true" || v == "1").unwrap_or(default)
}

/// `PolicyStore` backed by the loader.
///
/// With an explicit path, loads that file; otherwise runs the full
/// environment-then-probe strategy.
pub struct FilePolicyStore {
    path: Option<PathBuf>,
}

impl FilePolicyStore {
    pub fn new() -> Self {
        Self { path: None }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: Some(path.into()) }
    }
}

impl Default for FilePolicyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PolicyStore for FilePolicyStore {
    async fn load_policy(&self) -> Result<Policy> {
        match &self.path {
            Some(path) => load_from_file(Some(path.clone())),
            None => load(),
        }
    }
}
