//! # hvitt
//!
//! A configurable, indentation-sensitive tokenizer.
//!
//! Token kinds are described at runtime, either in code through a [`RuleTableBuilder`]
//! or in a small rule-description language read by the [`loader`]:
//!
//! ```text
//! NUMBER: /[0-9]+/ ;
//! PLUS: '+' ;
//! IDENT: /[a-zA-Z_][a-zA-Z0-9_]*/ ;
//! ```
//!
//! Source text is scanned line by line. Besides the described kinds, the scanner
//! synthesizes `INDENT`, `DEINDENT`, `NEWLINE` and `EOF` tokens from line layout, the way
//! block-structured languages need them. See [`lexing`] for the stages and [`pipeline`]
//! for putting them together from [`config`] settings.

pub mod config;
pub mod lexing;
pub mod loader;
pub mod pipeline;
pub mod testing;

pub use lexing::{
    collect_tokens, Caret, CollapseFilter, ConfigError, LexError, Matcher, ReservedKinds,
    RuleTable, RuleTableBuilder, Scanner, StructureValidator, Token, TokenSource,
};
pub use loader::RuleLoader;
pub use pipeline::{Pipeline, PipelineError};
