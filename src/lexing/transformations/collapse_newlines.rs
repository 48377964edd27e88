//! Newline collapsing
//!
//! Wraps a token source and reduces every run of consecutive newline tokens to at most
//! one. When the filter meets a run, it peeks at the token after it and either forwards
//! the last newline of the run or drops the run entirely:
//!
//! - with `trim`, a run at the very start of the stream is dropped
//! - with `trim`, a run right before the end-of-input token is dropped
//! - a run right before an indent or deindent is dropped; the indentation change
//!   already marks the line break
//! - otherwise one newline is forwarded
//!
//! # Example
//!
//! With `trim` enabled:
//!
//! ```text
//! Input:  [NEWLINE, NEWLINE, A, NEWLINE, NEWLINE, B, NEWLINE, INDENT, C, NEWLINE, EOF]
//! Output: [A, NEWLINE, B, INDENT, C, EOF]
//! ```

use crate::lexing::error::LexError;
use crate::lexing::rules::ReservedKinds;
use crate::lexing::source::{Sticky, TokenSource};
use crate::lexing::token::Token;

pub struct CollapseFilter<S> {
    inner: S,
    kinds: ReservedKinds,
    trim: bool,
    /// Set until the first token has been emitted
    first: bool,
    current: Option<Token>,
    sticky: Sticky,
}

impl<S: TokenSource> CollapseFilter<S> {
    pub fn new(inner: S, trim: bool) -> Self {
        let kinds = inner.reserved_kinds().clone();
        CollapseFilter {
            inner,
            kinds,
            trim,
            first: true,
            current: None,
            sticky: Sticky::default(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let mut run: Option<Token> = None;
        let mut run_len = 0usize;
        while self.inner.peek()?.kind == self.kinds.newline {
            run = Some(self.inner.pop()?);
            run_len += 1;
        }

        let token = match run {
            Some(newline) => {
                let next = self.inner.peek()?;
                let at_eof = next.kind == self.kinds.eof;
                let at_indentation =
                    next.kind == self.kinds.indent || next.kind == self.kinds.deindent;
                if (self.trim && (self.first || at_eof)) || at_indentation {
                    log::trace!("dropped a run of {} newlines before {}", run_len, next);
                    self.inner.pop()?
                } else {
                    if run_len > 1 {
                        log::trace!("collapsed a run of {} newlines", run_len);
                    }
                    newline
                }
            }
            None => self.inner.pop()?,
        };
        self.first = false;
        Ok(token)
    }
}

impl<S: TokenSource> TokenSource for CollapseFilter<S> {
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
