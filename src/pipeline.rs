//! Pipeline assembly
//!
//! Puts the stages together according to [`LexerSettings`]:
//!
//! ```text
//! Scanner -> [CollapseFilter] -> [StructureValidator] -> consumer
//! ```
//!
//! Bracketed stages are optional. The structural kind names come from the rule table; a
//! table built with [`Pipeline::from_rules`] takes them from the settings.

use std::io::{BufRead, Cursor};
use std::sync::Arc;

use thiserror::Error;

use crate::config::LexerSettings;
use crate::lexing::{
    collect_tokens, CollapseFilter, ConfigError, LexError, RuleTable, RuleTableBuilder, Scanner,
    StructureValidator, Token, TokenSource,
};

/// Failure of a whole pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lex(#[from] LexError),
}

/// A rule table plus the settings that decide which filters wrap the scanner.
#[derive(Debug, Clone)]
pub struct Pipeline {
    table: Arc<RuleTable>,
    settings: LexerSettings,
}

impl Pipeline {
    pub fn new(table: Arc<RuleTable>, settings: LexerSettings) -> Result<Self, ConfigError> {
        if settings.structure.enabled && settings.structure.indent_unit.is_empty() {
            return Err(ConfigError::EmptyIndentUnit);
        }
        Ok(Pipeline { table, settings })
    }

    /// Build the rule table, taking reserved kind names and the ignore kind from `settings`.
    pub fn from_rules(
        mut rules: RuleTableBuilder,
        settings: LexerSettings,
    ) -> Result<Self, ConfigError> {
        rules.set_reserved(settings.reserved.kinds());
        if settings.reserved.ignore.is_some() {
            rules.set_ignore(settings.reserved.ignore.clone());
        }
        let table = rules.build()?;
        Self::new(Arc::new(table), settings)
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn settings(&self) -> &LexerSettings {
        &self.settings
    }

    /// Stack the configured stages over a reader.
    pub fn lex<'a, R: BufRead + 'a>(
        &self,
        reader: R,
    ) -> Result<Box<dyn TokenSource + 'a>, ConfigError> {
        let mut source: Box<dyn TokenSource + 'a> =
            Box::new(Scanner::new(reader, Arc::clone(&self.table)));

        let collapse = &self.settings.collapse;
        if collapse.enabled {
            source = Box::new(CollapseFilter::new(source, collapse.trim));
        }

        let structure = &self.settings.structure;
        if structure.enabled {
            source = Box::new(StructureValidator::new(
                source,
                structure.indent_unit.as_str(),
            )?);
        }

        log::debug!(
            "pipeline: collapse={} (trim={}), structure={}",
            collapse.enabled,
            collapse.trim,
            structure.enabled
        );
        Ok(source)
    }

    pub fn lex_str<'a>(&self, text: &'a str) -> Result<Box<dyn TokenSource + 'a>, ConfigError> {
        self.lex(Cursor::new(text.as_bytes()))
    }

    /// Run the whole text through the pipeline, up to and including the end-of-input token.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, PipelineError> {
        let source = self.lex_str(text)?;
        Ok(collect_tokens(source)?)
    }
}
