//! Error types for scanning, structural validation and rule configuration
//!
//! Lexing errors are fatal for the token source that raised them. Every message
//! renders the offending line with a caret under the failure column:
//!
//! ```text
//! Unrecognized input at (1, 2):
//! 1#2
//!  ^
//! ```

use std::fmt;
use thiserror::Error;

/// Location of a failure, with enough context to point at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caret {
    /// The physical line being scanned when the failure happened
    pub line: String,
    pub row: usize,
    pub col: usize,
    /// Same width as the consumed prefix of `line`, whitespace kept, everything else blanked
    pub indent: String,
}

impl Caret {
    pub fn new(line: impl Into<String>, row: usize, col: usize, indent: impl Into<String>) -> Self {
        Caret {
            line: line.into(),
            row,
            col,
            indent: indent.into(),
        }
    }

    /// Build a caret for `col` on `line`, deriving the indent string from the line itself.
    pub fn at_column(line: &str, row: usize, col: usize) -> Self {
        let indent = blank_prefix(line, col.saturating_sub(1));
        Caret::new(line, row, col, indent)
    }
}

impl fmt::Display for Caret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            " at ({}, {}):\n{}\n{}^",
            self.row, self.col, self.line, self.indent
        )
    }
}

/// Copy the first `width` characters of `line`, keeping whitespace and blanking the rest.
///
/// Tabs survive, so the caret lines up under the same column in a terminal.
pub fn blank_prefix(line: &str, width: usize) -> String {
    let mut out: String = line
        .chars()
        .take(width)
        .map(|c| if c.is_whitespace() { c } else { ' ' })
        .collect();
    let taken = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - taken));
    out
}

/// Errors raised while pulling tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unrecognized input{0}")]
    UnrecognizedInput(Caret),

    #[error("Invalid indent{0}")]
    InvalidIndent(Caret),

    #[error("Invalid deindent{0}")]
    InvalidDeindent(Caret),

    #[error("Was expecting {expected} but got {found}{caret}")]
    UnexpectedToken {
        expected: String,
        /// The offending token, as `KIND('text')`
        found: String,
        caret: Caret,
    },

    #[error("Failed to read input: {0}")]
    Io(String),
}

impl LexError {
    /// Where the failure happened, if the error has a source location.
    pub fn caret(&self) -> Option<&Caret> {
        match self {
            LexError::UnrecognizedInput(caret)
            | LexError::InvalidIndent(caret)
            | LexError::InvalidDeindent(caret)
            | LexError::UnexpectedToken { caret, .. } => Some(caret),
            LexError::Io(_) => None,
        }
    }
}

impl From<std::io::Error> for LexError {
    fn from(err: std::io::Error) -> Self {
        LexError::Io(err.to_string())
    }
}

/// Errors detected while building a rule table, before any scanning starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid pattern for kind '{kind}': {message}")]
    InvalidPattern { kind: String, message: String },

    #[error("Kind '{kind}' has no matchers")]
    EmptyRule { kind: String },

    #[error("Kind '{kind}' has an empty matcher")]
    EmptyMatcher { kind: String },

    #[error("Kind '{kind}' collides with a reserved token kind")]
    ReservedKind { kind: String },

    #[error("Indent unit must not be empty")]
    EmptyIndentUnit,
}
