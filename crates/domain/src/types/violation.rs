//! Violation records produced by the validation engine

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Machine-checkable rule identifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    BusinessHoursOutside,
    NoticeTooSoon,
    TimeConflict,
}

/// One broken rule for a proposed reschedule.
///
/// `details` is an open map of diagnostic fields; the boundary layer decides
/// how codes translate into user-facing language and HTTP semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub code: ViolationCode,
    pub message: String,
    #[serde(default)]
    pub details: Map<String, Value>,
}

impl Violation {
    pub fn new(code: ViolationCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), details: Map::new() }
    }

    /// Attach a diagnostic field.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}
