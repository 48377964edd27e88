//! Token value type
//!
//! A token is the unit every stage of the pipeline hands to the next one. Kinds are
//! plain strings: user kinds come from the rule table and the four structural kinds
//! (indent, deindent, newline, end of input) are configurable names, so no closed
//! enum can describe them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A classified piece of source text with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Classification tag, e.g. `NUMBER` or `INDENT`
    pub kind: String,
    /// The matched text (for structural tokens, the whitespace run that produced them)
    pub text: String,
    /// 1-based line number
    pub row: usize,
    /// 1-based column where the match starts
    pub col: usize,
}

impl Token {
    pub fn new(kind: impl Into<String>, text: impl Into<String>, row: usize, col: usize) -> Self {
        Token {
            kind: kind.into(),
            text: text.into(),
            row,
            col,
        }
    }

    /// True when this token is of the given kind.
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}('{}') @ {}:{}", self.kind, self.text, self.row, self.col)
    }
}
