//! Indentation structure validation
//!
//! The scanner reports indentation as raw character widths: an indent or deindent token
//! carries the whole leading whitespace run of its line. This stage converts widths into
//! logical levels (multiples of a configured indent unit) and guarantees that every
//! indent or deindent token it emits moves exactly one level.
//!
//! - An indent whose run is not a clean repetition of the unit, or which opens more than
//!   one level at once, fails with an invalid-indent error.
//! - A deindent whose run is not a clean repetition of the unit fails with an
//!   invalid-deindent error.
//! - A deindent closing `k > 1` levels is expanded into `k` virtual deindent tokens, all
//!   at the position of the original one.
//!
//! # Example
//!
//! With a two-space unit, going from level 3 back to level 0:
//!
//! ```text
//! Input:  [INDENT("  "), INDENT("    "), INDENT("      "), DEINDENT("")]
//! Output: [INDENT("  "), INDENT("    "), INDENT("      "),
//!          DEINDENT("    "), DEINDENT("  "), DEINDENT("")]
//! ```

use std::collections::VecDeque;

use crate::lexing::error::{Caret, ConfigError, LexError};
use crate::lexing::rules::ReservedKinds;
use crate::lexing::source::{Sticky, TokenSource};
use crate::lexing::token::Token;

pub struct StructureValidator<S> {
    inner: S,
    kinds: ReservedKinds,
    indent_unit: String,
    /// Last accepted logical level
    last_indent: usize,
    current: Option<Token>,
    /// Virtual deindents still to be handed out, drained before the inner source
    pending: VecDeque<Token>,
    sticky: Sticky,
}

impl<S: TokenSource> StructureValidator<S> {
    pub fn new(inner: S, indent_unit: impl Into<String>) -> Result<Self, ConfigError> {
        let indent_unit = indent_unit.into();
        if indent_unit.is_empty() {
            return Err(ConfigError::EmptyIndentUnit);
        }
        let kinds = inner.reserved_kinds().clone();
        Ok(StructureValidator {
            inner,
            kinds,
            indent_unit,
            last_indent: 0,
            current: None,
            pending: VecDeque::new(),
            sticky: Sticky::default(),
        })
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Logical indentation level after the last emitted token.
    pub fn level(&self) -> usize {
        self.last_indent
    }

    /// Number of units in `run`, or `None` if it is not a clean repetition of the unit.
    fn indent_size(&self, run: &str) -> Option<usize> {
        let unit = self.indent_unit.as_bytes();
        if run.len() % unit.len() != 0 {
            return None;
        }
        if run.as_bytes().chunks(unit.len()).all(|chunk| chunk == unit) {
            Some(run.len() / unit.len())
        } else {
            None
        }
    }

    fn caret(&self, token: &Token) -> Caret {
        Caret::new(
            self.inner.raw_line(),
            token.row,
            token.col,
            self.inner.current_col_indent_string(),
        )
    }

    fn virtual_deindent(&self, level: usize, origin: &Token) -> Token {
        Token::new(
            self.kinds.deindent.as_str(),
            self.indent_unit.repeat(level),
            origin.row,
            origin.col,
        )
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let token = self.inner.pop()?;

        if token.kind == self.kinds.indent {
            return match self.indent_size(&token.text) {
                Some(level) if level <= self.last_indent + 1 => {
                    self.last_indent = level;
                    Ok(token)
                }
                _ => Err(LexError::InvalidIndent(self.caret(&token))),
            };
        }

        if token.kind == self.kinds.deindent {
            let Some(level) = self.indent_size(&token.text) else {
                return Err(LexError::InvalidDeindent(self.caret(&token)));
            };
            let from = self.last_indent;
            self.last_indent = level;
            if from > level + 1 {
                log::debug!(
                    "row {}: expanding deindent from level {} to {}",
                    token.row,
                    from,
                    level
                );
                let first = self.virtual_deindent(from - 1, &token);
                for step in (level..from - 1).rev() {
                    let deindent = self.virtual_deindent(step, &token);
                    self.pending.push_back(deindent);
                }
                return Ok(first);
            }
            return Ok(token);
        }

        Ok(token)
    }
}

impl<S: TokenSource> TokenSource for StructureValidator<S> {
    fn peek(&mut self) -> Result<&Token, LexError> {
        let token = match self.current.take() {
            Some(token) => token,
            None => self.pop()?,
        };
        Ok(self.current.insert(token))
    }

    fn pop(&mut self) -> Result<Token, LexError> {
        if let Some(token) = self.current.take() {
            return Ok(token);
        }
        if let Some(token) = self.pending.pop_front() {
            return Ok(token);
        }
        self.sticky.check()?;
        let result = self.next_token();
        self.sticky.record(result)
    }

    fn raw_line(&self) -> &str {
        self.inner.raw_line()
    }

    fn current_col_indent_string(&self) -> &str {
        self.inner.current_col_indent_string()
    }

    fn reserved_kinds(&self) -> &ReservedKinds {
        &self.kinds
    }
}
