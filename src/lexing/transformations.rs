//! Token stream filters
//!
//! Filters wrap another token source and are token sources themselves, so they stack:
//!
//! - [`CollapseFilter`]: reduces runs of newline tokens, trimming them at the stream edges
//!   and next to indentation changes ./transformations/collapse_newlines.rs
//! - [`StructureValidator`]: checks indentation against an indent unit and splits
//!   multi-level deindents into single steps ./transformations/structure.rs
//!
//! The usual order is scanner, then collapse, then structure.

pub mod collapse_newlines;
pub mod structure;

pub use collapse_newlines::CollapseFilter;
pub use structure::StructureValidator;
