//! Test factories
//!
//! Helpers for building tokens and canned token streams, so filters can be tested
//! without going through the scanner.

use std::collections::VecDeque;

use crate::lexing::{LexError, ReservedKinds, Token, TokenSource};

/// A token at row 1, column 1.
pub fn mk_token(kind: &str, text: &str) -> Token {
    Token::new(kind, text, 1, 1)
}

pub fn mk_token_at(kind: &str, text: &str, row: usize, col: usize) -> Token {
    Token::new(kind, text, row, col)
}

/// Kinds of a token list, for compact assertions.
pub fn kinds(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.kind.as_str()).collect()
}

/// One token per line in display form.
pub fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A token source replaying a fixed list.
///
/// A trailing end-of-input token is repeated forever, like the scanner does. Queued
/// errors are returned once, in order.
pub struct VecSource {
    items: VecDeque<Result<Token, LexError>>,
    reserved: ReservedKinds,
    pulls: usize,
}

impl VecSource {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_results(tokens.into_iter().map(Ok).collect())
    }

    pub fn with_results(items: Vec<Result<Token, LexError>>) -> Self {
        VecSource {
            items: items.into(),
            reserved: ReservedKinds::default(),
            pulls: 0,
        }
    }

    /// Tokens with the given kinds and empty texts, followed by `EOF`.
    pub fn from_kinds(kinds: &[&str]) -> Self {
        let mut tokens: Vec<Token> = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| mk_token_at(kind, "", i + 1, 1))
            .collect();
        tokens.push(mk_token_at("EOF", "$", kinds.len() + 1, 1));
        Self::new(tokens)
    }

    /// How many times `pop` has been called on this source.
    pub fn pulls(&self) -> usize {
        self.pulls
    }

    fn at_final_eof(&self) -> bool {
        self.items.len() == 1
            && matches!(self.items.front(), Some(Ok(t)) if t.kind == self.reserved.eof)
    }
}

impl TokenSource for VecSource {
    fn peek(&mut self) -> Result<&Token, LexError> {
        match self.items.front() {
            Some(Ok(token)) => Ok(token),
            Some(Err(err)) => Err(err.clone()),
            None => Err(LexError::Io("token source exhausted".to_string())),
        }
    }

    fn pop(&mut self) -> Result<Token, LexError> {
        self.pulls += 1;
        if self.at_final_eof() {
            return self.peek().cloned();
        }
        self.items
            .pop_front()
            .unwrap_or_else(|| Err(LexError::Io("token source exhausted".to_string())))
    }

    fn raw_line(&self) -> &str {
        ""
    }

    fn current_col_indent_string(&self) -> &str {
        ""
    }

    fn reserved_kinds(&self) -> &ReservedKinds {
        &self.reserved
    }
}
