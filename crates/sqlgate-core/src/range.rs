//! Domain-range check: business-rule bounds on literal values
//!
//! Scans for `<column> = <int>` and `<column> IN (<int-list>)` patterns
//! against a fixed set of range-constrained columns. A column with no
//! matching pattern is unconstrained (absence means no opinion). Only the
//! first pattern match per column is inspected; later occurrences of the
//! same column are not revalidated.

use regex::Regex;
use std::collections::BTreeSet;

use crate::error::CheckError;

/// An allowed integer domain for one column.
#[derive(Debug, Clone)]
pub struct RangeRule {
    column: String,
    allowed: BTreeSet<i64>,
    bounds_label: String,
    pattern: Regex,
}

impl RangeRule {
    /// Build a rule constraining `column` to `allowed`, with a
    /// human-readable `bounds_label` (e.g. "1-4") for rejection messages.
    pub fn new(
        column: &str,
        allowed: impl IntoIterator<Item = i64>,
        bounds_label: &str,
    ) -> Result<Self, regex::Error> {
        let escaped = regex::escape(column);
        let pattern = Regex::new(&format!(
            r"(?i)\b{escaped}\s*=\s*(\d+)|\b{escaped}\s+in\s*\(([^)]+)\)"
        ))?;
        Ok(Self {
            column: column.to_string(),
            allowed: allowed.into_iter().collect(),
            bounds_label: bounds_label.to_string(),
            pattern,
        })
    }

    /// The stock rule set for the academic schema.
    pub fn defaults() -> Vec<RangeRule> {
        vec![
            RangeRule::new("year", 1..=4, "1-4").expect("static year rule pattern"),
            RangeRule::new("semester", 1..=8, "1-8").expect("static semester rule pattern"),
        ]
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Inspect the first `=`/`IN` occurrence of this rule's column.
    ///
    /// Returns `Ok(None)` when unconstrained or in range, `Ok(Some(reason))`
    /// on an out-of-domain literal.
    pub fn check(&self, query: &str) -> Result<Option<String>, CheckError> {
        let Some(caps) = self.pattern.captures(query) else {
            return Ok(None);
        };
        let raw = caps
            .get(2)
            .or_else(|| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or_default();

        for literal in raw.split(',') {
            let literal = literal.trim();
            let value: i64 = literal.parse().map_err(|_| {
                CheckError::BadLiteral(format!("non-integer {} literal '{literal}'", self.column))
            })?;
            if !self.allowed.contains(&value) {
                return Ok(Some(format!(
                    "Invalid {} value (must be {})",
                    self.column, self.bounds_label
                )));
            }
        }
        Ok(None)
    }
}

/// Apply every rule; the first violating rule rejects the query.
pub fn check_data_range(query: &str, rules: &[RangeRule]) -> Result<Option<String>, CheckError> {
    for rule in rules {
        if let Some(reason) = rule.check(query)? {
            return Ok(Some(reason));
        }
    }
    Ok(None)
}
