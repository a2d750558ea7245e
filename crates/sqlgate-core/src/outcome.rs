//! Per-check results and the aggregated validation verdict

use serde::Serialize;
use std::fmt;

/// The four validation layers, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckKind {
    Syntax,
    Semantics,
    #[serde(rename = "Data Range")]
    DataRange,
    Security,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Syntax => write!(f, "Syntax"),
            CheckKind::Semantics => write!(f, "Semantics"),
            CheckKind::DataRange => write!(f, "Data Range"),
            CheckKind::Security => write!(f, "Security"),
        }
    }
}

/// Verdict of a single layer that actually ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub check: CheckKind,
    pub valid: bool,
    pub message: String,
}

impl CheckResult {
    pub fn pass(check: CheckKind, message: impl Into<String>) -> Self {
        Self {
            check,
            valid: true,
            message: message.into(),
        }
    }

    pub fn fail(check: CheckKind, message: impl Into<String>) -> Self {
        Self {
            check,
            valid: false,
            message: message.into(),
        }
    }
}

/// Aggregated verdict for one `validate()` call.
///
/// `results` holds exactly the checks that ran, in pipeline order. On
/// rejection the failing check is the last entry, so the trail length
/// alone identifies the first layer that rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub results: Vec<CheckResult>,
}

impl ValidationOutcome {
    /// The check that rejected the query, if any.
    pub fn first_failure(&self) -> Option<&CheckResult> {
        self.results.iter().find(|r| !r.valid)
    }
}
