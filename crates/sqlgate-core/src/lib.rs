//! SQLGate - validation gatekeeper for generated SQL
//!
//! Layered safety checks for natural-language-derived SQL queries before
//! they reach the database: engine-delegated syntax parsing, catalog-aware
//! table resolution, business-rule value bounds, and a forbidden-keyword
//! backstop. Each layer can reject independently with a reason; the
//! orchestrator short-circuits at the first failure and returns the trail
//! of checks that ran.

pub mod catalog;
pub mod error;
pub mod outcome;
pub mod range;
pub mod security;
pub mod semantics;
pub mod syntax;
pub mod validator;

pub use catalog::{Catalog, CatalogDefinition};
pub use error::{CheckError, SchemaLoadError};
pub use outcome::{CheckKind, CheckResult, ValidationOutcome};
pub use range::RangeRule;
pub use validator::Validator;
