//! Lexing
//!
//! This module holds the token-stream pipeline.
//!
//! Structure:
//!     A [`RuleTable`] compiles named token kinds from literal and regex matchers. The
//!     [`Scanner`] reads text line by line against a table and emits primitive tokens,
//!     including the structural kinds (indent, deindent, newline, end of input) derived
//!     from line layout. Filters in [`transformations`] wrap the scanner to collapse blank
//!     lines and to enforce one-level-at-a-time indentation.
//!
//! Every stage implements [`TokenSource`]: consumers pull tokens with `peek`/`pop`, and
//! nothing is read from the input until a token is asked for.

pub mod error;
pub mod rules;
pub mod scanner;
pub mod source;
pub mod token;
pub mod transformations;

pub use error::{Caret, ConfigError, LexError};
pub use rules::{Matcher, ReservedKinds, RuleTable, RuleTableBuilder};
pub use scanner::Scanner;
pub use source::{collect_tokens, TokenSource, Tokens};
pub use token::Token;
pub use transformations::{CollapseFilter, StructureValidator};
