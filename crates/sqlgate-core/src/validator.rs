//! Validation orchestrator: fixed-order pipeline with short-circuiting
//!
//! Runs Syntax -> Semantics -> Data Range -> Security, stopping at the
//! first failing layer. The trail holds exactly the checks that ran, so
//! callers can read the first rejecting layer off the trail length. A
//! rejected query is a normal outcome, not a fault; checker-internal
//! errors are converted into failing results here and never propagate.

use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{CheckError, SchemaLoadError};
use crate::outcome::{CheckKind, CheckResult, ValidationOutcome};
use crate::range::{check_data_range, RangeRule};
use crate::security::check_security;
use crate::semantics::check_semantics;
use crate::syntax::SyntaxChecker;

/// A configured validation pipeline over an immutable schema snapshot.
///
/// Holds no mutable state; `validate` is a pure function of the query and
/// the snapshot, safe to call concurrently from many tasks.
#[derive(Debug, Clone)]
pub struct Validator {
    catalog: Catalog,
    syntax: Option<SyntaxChecker>,
    range_rules: Vec<RangeRule>,
}

impl Validator {
    /// Connect to a DuckDB database, eagerly reflecting its schema.
    ///
    /// Fails fast with [`SchemaLoadError`] if the store is unreachable or
    /// holds no tables.
    pub fn connect<P: AsRef<Path>>(db_path: P) -> Result<Self, SchemaLoadError> {
        let catalog = Catalog::from_database(&db_path)?;
        Ok(Self {
            catalog,
            syntax: Some(SyntaxChecker::new(db_path.as_ref())),
            range_rules: RangeRule::defaults(),
        })
    }

    /// Build a validator from a static catalog, with no live connection.
    ///
    /// The syntax layer has no engine to delegate to, so it reports an
    /// explicit "unavailable" passing entry instead of silently passing.
    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            syntax: None,
            range_rules: RangeRule::defaults(),
        }
    }

    /// Bound the syntax round trip (no-op without a live connection).
    pub fn with_syntax_timeout(mut self, timeout: Duration) -> Self {
        self.syntax = self.syntax.map(|checker| checker.with_timeout(timeout));
        self
    }

    /// Replace the default year/semester rules.
    pub fn with_range_rules(mut self, rules: Vec<RangeRule>) -> Self {
        self.range_rules = rules;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run the pipeline on an untrusted candidate query.
    ///
    /// Always returns a well-formed outcome; no error or panic crosses
    /// this boundary from the individual checkers.
    pub fn validate(&self, query: &str) -> ValidationOutcome {
        let mut results = Vec::with_capacity(4);

        for kind in [
            CheckKind::Syntax,
            CheckKind::Semantics,
            CheckKind::DataRange,
            CheckKind::Security,
        ] {
            let result = self.run_check(kind, query);
            let rejected = !result.valid;
            results.push(result);
            if rejected {
                debug!(check = %kind, query, "query rejected");
                return ValidationOutcome {
                    valid: false,
                    results,
                };
            }
        }

        ValidationOutcome {
            valid: true,
            results,
        }
    }

    fn run_check(&self, kind: CheckKind, query: &str) -> CheckResult {
        match kind {
            CheckKind::Syntax => self.run_syntax(query),
            CheckKind::Semantics => {
                Self::to_result(kind, "Semantics valid", check_semantics(query, &self.catalog))
            }
            CheckKind::DataRange => Self::to_result(
                kind,
                "Data range valid",
                check_data_range(query, &self.range_rules),
            ),
            CheckKind::Security => Self::to_result(kind, "Security valid", Ok(check_security(query))),
        }
    }

    fn run_syntax(&self, query: &str) -> CheckResult {
        let Some(checker) = &self.syntax else {
            return CheckResult::pass(
                CheckKind::Syntax,
                "syntax check unavailable (no live connection)",
            );
        };
        match checker.check(query) {
            Ok(None) => CheckResult::pass(CheckKind::Syntax, "Syntax valid"),
            Ok(Some(message)) => {
                CheckResult::fail(CheckKind::Syntax, format!("Syntax error: {message}"))
            }
            Err(CheckError::Timeout) => {
                CheckResult::fail(CheckKind::Syntax, "syntax check timed out")
            }
            Err(e) => CheckResult::fail(
                CheckKind::Syntax,
                format!("syntax check could not be evaluated: {e}"),
            ),
        }
    }

    /// Map a checker's `Ok(None)`/`Ok(Some(reason))`/`Err` into a result,
    /// converting execution faults into failing entries.
    fn to_result(
        kind: CheckKind,
        pass_message: &str,
        verdict: Result<Option<String>, CheckError>,
    ) -> CheckResult {
        match verdict {
            Ok(None) => CheckResult::pass(kind, pass_message),
            Ok(Some(reason)) => CheckResult::fail(kind, reason),
            Err(e) => CheckResult::fail(kind, format!("check could not be evaluated: {e}")),
        }
    }
}
