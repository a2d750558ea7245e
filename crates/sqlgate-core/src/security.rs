//! Security check: forbidden-keyword backstop
//!
//! A crude case-insensitive substring scan, kept intentionally simple as a
//! last-resort defense layer. It over-rejects (legitimate text containing
//! a keyword, e.g. a column named `updated_at`) and under-rejects
//! (obfuscated payloads); the real safety net is parameterized execution
//! at the database boundary. Never use this as the sole gate.

/// Destructive statements and multi-statement injection markers.
pub const FORBIDDEN_KEYWORDS: [&str; 8] =
    ["drop", "delete", "insert", "update", "union", "exec", "--", ";"];

/// Scan for forbidden substrings; returns the rejection reason on a hit.
pub fn check_security(query: &str) -> Option<String> {
    let lowered = query.to_lowercase();
    FORBIDDEN_KEYWORDS
        .iter()
        .find(|keyword| lowered.contains(*keyword))
        .map(|keyword| format!("Forbidden SQL keyword detected: {keyword}"))
}
