//! Semantic check: at least one referenced table must exist in the catalog
//!
//! Uses sqlparser's SQL-aware lexer rather than plain string search, so a
//! column named like a table does not produce a false positive. The check
//! is deliberately lenient: a query passes if *any* extracted FROM/JOIN
//! target resolves against the catalog, which tolerates imperfect
//! extraction at the cost of under-rejecting joins with one bogus target.

use sqlparser::dialect::GenericDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer};
use std::collections::BTreeSet;

use crate::catalog::Catalog;
use crate::error::CheckError;

/// Checks the query's table references against the catalog.
///
/// Returns `Ok(None)` when valid, `Ok(Some(reason))` when rejected.
pub fn check_semantics(query: &str, catalog: &Catalog) -> Result<Option<String>, CheckError> {
    let referenced = match extract_tables(query) {
        Ok(tables) => tables,
        // A query the lexer cannot read is a rejection, not a fault.
        Err(CheckError::Lex(e)) => return Ok(Some(format!("Unable to parse query: {e}"))),
        Err(e) => return Err(e),
    };
    let known = referenced.iter().any(|table| catalog.has_table(table));
    if known {
        Ok(None)
    } else {
        Ok(Some("No valid tables referenced".to_string()))
    }
}

/// Collect the distinct identifiers appearing as FROM/JOIN targets.
///
/// Schema qualifiers are stripped (`school.Student` -> `Student`); quoted
/// identifiers keep their exact casing. Subquery targets contribute their
/// own inner FROM clauses since the token stream is scanned linearly.
pub fn extract_tables(query: &str) -> Result<BTreeSet<String>, CheckError> {
    let dialect = GenericDialect {};
    let tokens: Vec<Token> = Tokenizer::new(&dialect, query)
        .tokenize()
        .map_err(|e| CheckError::Lex(e.to_string()))?
        .into_iter()
        .filter(|token| !matches!(token, Token::Whitespace(_)))
        .collect();

    let mut tables = BTreeSet::new();
    let mut i = 0;
    while i < tokens.len() {
        let at_target_keyword = matches!(
            &tokens[i],
            Token::Word(w) if matches!(w.keyword, Keyword::FROM | Keyword::JOIN)
        );
        i += 1;
        if !at_target_keyword {
            continue;
        }

        // FROM introduces a comma-separated relation list; JOIN one relation.
        loop {
            match table_name_at(&tokens, i) {
                Some((name, next)) => {
                    tables.insert(name);
                    i = next;
                }
                None => break,
            }

            // Optional `AS alias` or bare alias before the next comma.
            if let Some(Token::Word(w)) = tokens.get(i) {
                if w.keyword == Keyword::AS {
                    i += 1;
                }
            }
            if let Some(Token::Word(w)) = tokens.get(i) {
                if w.keyword == Keyword::NoKeyword {
                    i += 1;
                }
            }
            if matches!(tokens.get(i), Some(Token::Comma)) {
                i += 1;
            } else {
                break;
            }
        }
    }

    Ok(tables)
}

/// Parse a possibly dotted identifier chain starting at `i`; return the
/// final segment (the table name) and the index past the chain.
fn table_name_at(tokens: &[Token], mut i: usize) -> Option<(String, usize)> {
    let mut last = None;
    loop {
        match tokens.get(i) {
            Some(Token::Word(w)) if w.keyword == Keyword::NoKeyword || w.quote_style.is_some() => {
                last = Some(w.value.clone());
                i += 1;
            }
            _ => break,
        }
        if matches!(tokens.get(i), Some(Token::Period)) {
            i += 1;
        } else {
            break;
        }
    }
    last.map(|name| (name, i))
}
