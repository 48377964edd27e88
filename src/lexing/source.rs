//! Token source contract
//!
//! Every pipeline stage (the scanner and each filter wrapped around it) is a pull-based
//! token source. Consumers call [`TokenSource::peek`] to look at the next token and
//! [`TokenSource::pop`] to take it. Filters own the source they wrap, so stages compose
//! by nested construction:
//!
//! ```text
//! StructureValidator::new(CollapseFilter::new(Scanner::from_text(text, table), true), "    ")
//! ```
//!
//! Errors are fatal: once a stage has failed it returns the same error on every call.

use super::error::LexError;
use super::rules::ReservedKinds;
use super::token::Token;

pub trait TokenSource {
    /// The next token, without consuming it. Calling `peek` repeatedly returns the same token.
    fn peek(&mut self) -> Result<&Token, LexError>;

    /// Consume and return the next token.
    fn pop(&mut self) -> Result<Token, LexError>;

    /// The physical line currently being scanned.
    fn raw_line(&self) -> &str;

    /// A string as wide as the consumed part of the current line, for caret rendering.
    fn current_col_indent_string(&self) -> &str;

    /// Names of the structural kinds this source emits.
    fn reserved_kinds(&self) -> &ReservedKinds;

    /// Iterate over the remaining tokens, up to and including the end-of-input token.
    fn tokens(self) -> Tokens<Self>
    where
        Self: Sized,
    {
        Tokens {
            source: self,
            done: false,
        }
    }
}

impl<S: TokenSource + ?Sized> TokenSource for Box<S> {
    fn peek(&mut self) -> Result<&Token, LexError> {
        (**self).peek()
    }

    fn pop(&mut self) -> Result<Token, LexError> {
        (**self).pop()
    }

    fn raw_line(&self) -> &str {
        (**self).raw_line()
    }

    fn current_col_indent_string(&self) -> &str {
        (**self).current_col_indent_string()
    }

    fn reserved_kinds(&self) -> &ReservedKinds {
        (**self).reserved_kinds()
    }
}

/// Iterator over a token source. Stops after the end-of-input token or the first error.
pub struct Tokens<S> {
    source: S,
    done: bool,
}

impl<S> Tokens<S> {
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: TokenSource> Iterator for Tokens<S> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.source.pop();
        match &result {
            Ok(token) if token.kind != self.source.reserved_kinds().eof => {}
            _ => self.done = true,
        }
        Some(result)
    }
}

/// Drain a source into a vector, ending with the end-of-input token.
pub fn collect_tokens<S: TokenSource>(source: S) -> Result<Vec<Token>, LexError> {
    source.tokens().collect()
}

/// Remembers the first failure of a stage so it can be reported again.
#[derive(Debug, Default)]
pub(crate) struct Sticky {
    failure: Option<LexError>,
}

impl Sticky {
    pub(crate) fn check(&self) -> Result<(), LexError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    pub(crate) fn record<T>(&mut self, result: Result<T, LexError>) -> Result<T, LexError> {
        if let Err(err) = &result {
            if self.failure.is_none() {
                self.failure = Some(err.clone());
            }
        }
        result
    }
}
