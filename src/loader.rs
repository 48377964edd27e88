//! Rule-description loader
//!
//! Reads rule tables written in a small text format:
//!
//! ```text
//! NUMBER: /[0-9]+/ ;
//! PLUS: '+' ;
//! KEYWORD: 'if' | 'else'
//!        | 'while' ;
//! ```
//!
//! A file is a sequence of definitions `NAME ':' alt ('|' alt)* ';'`, where `,` may be
//! used in place of `|`. Each alternative is a single-quoted literal or a slash-delimited
//! regex. The delimiters are stripped; everything between them, escapes included, is kept
//! verbatim. Whitespace and line breaks between tokens carry no meaning.
//!
//! The loader scans the description with the crate's own [`Scanner`] over a fixed
//! bootstrap rule table, then parses it by recursive descent.

use std::io::{BufRead, Cursor};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::lexing::{
    Caret, LexError, Matcher, ReservedKinds, RuleTable, RuleTableBuilder, Scanner, TokenSource,
};

const NAME: &str = "NAME";
const START_OF_DEFINITION: &str = "SODEF";
const END_OF_DEFINITION: &str = "EODEF";
const OR: &str = "OR";
const LITERAL: &str = "LITERAL";
const REGEX: &str = "REGEX";

static BOOTSTRAP: Lazy<Arc<RuleTable>> = Lazy::new(|| {
    let table = RuleTable::builder()
        .add_regex_rule(NAME, ["[a-zA-Z][a-zA-Z0-9_]*"])
        .add_literal_rule(START_OF_DEFINITION, [":"])
        .add_literal_rule(END_OF_DEFINITION, [";"])
        .add_literal_rule(OR, ["|", ","])
        .add_regex_rule(LITERAL, [r"'(\\.|[^'])*?'"])
        .add_regex_rule(REGEX, [r"/(\\.|[^/])*?/"])
        .build()
        .unwrap();
    Arc::new(table)
});

/// Entry points for reading rule descriptions.
pub struct RuleLoader;

impl RuleLoader {
    /// Read a description into a fresh builder.
    pub fn load<R: BufRead>(reader: R) -> Result<RuleTableBuilder, LexError> {
        let mut builder = RuleTableBuilder::new();
        Self::load_into(reader, &mut builder)?;
        Ok(builder)
    }

    pub fn load_str(text: &str) -> Result<RuleTableBuilder, LexError> {
        Self::load(Cursor::new(text.as_bytes()))
    }

    /// Read a description, appending its rules to an existing builder.
    pub fn load_into<R: BufRead>(reader: R, builder: &mut RuleTableBuilder) -> Result<(), LexError> {
        let scanner = Scanner::new(reader, Arc::clone(&BOOTSTRAP));
        DescriptionParser { source: scanner }.parse(builder)
    }
}

struct DescriptionParser<S> {
    source: S,
}

impl<S: TokenSource> DescriptionParser<S> {
    fn parse(&mut self, builder: &mut RuleTableBuilder) -> Result<(), LexError> {
        loop {
            self.skip_layout()?;
            let Some(name) = self.found(NAME)? else {
                let eof = self.source.reserved_kinds().eof.clone();
                self.expect(&eof)?;
                return Ok(());
            };
            self.skip_layout()?;
            self.expect(START_OF_DEFINITION)?;
            self.alternative(&name, builder)?;
            self.skip_layout()?;
            while self.found(OR)?.is_some() {
                self.alternative(&name, builder)?;
                self.skip_layout()?;
            }
            self.expect(END_OF_DEFINITION)?;
        }
    }

    fn alternative(&mut self, name: &str, builder: &mut RuleTableBuilder) -> Result<(), LexError> {
        self.skip_layout()?;
        let matcher = if let Some(literal) = self.found(LITERAL)? {
            Matcher::Literal(body(&literal))
        } else if let Some(regex) = self.found(REGEX)? {
            Matcher::Regex(body(&regex))
        } else {
            return Err(self.unexpected("a literal or a regex")?);
        };
        log::debug!("rule {}: {:?}", name, matcher);
        builder.compile(name, [matcher]);
        Ok(())
    }

    /// Indentation and line breaks are insignificant in descriptions.
    fn skip_layout(&mut self) -> Result<(), LexError> {
        let reserved = self.source.reserved_kinds().clone();
        loop {
            let kind = &self.source.peek()?.kind;
            if *kind == reserved.indent || *kind == reserved.deindent || *kind == reserved.newline {
                self.source.pop()?;
            } else {
                return Ok(());
            }
        }
    }

    /// Take the next token if it has the given kind, returning its text.
    fn found(&mut self, kind: &str) -> Result<Option<String>, LexError> {
        if self.source.peek()?.kind == kind {
            Ok(Some(self.source.pop()?.text))
        } else {
            Ok(None)
        }
    }

    fn expect(&mut self, kind: &str) -> Result<(), LexError> {
        if self.found(kind)?.is_some() {
            return Ok(());
        }
        let expected = describe(kind, self.source.reserved_kinds());
        Err(self.unexpected(&expected)?)
    }

    fn unexpected(&mut self, expected: &str) -> Result<LexError, LexError> {
        let token = self.source.peek()?.clone();
        Ok(LexError::UnexpectedToken {
            expected: expected.to_string(),
            found: format!("{}('{}')", token.kind, token.text),
            caret: Caret::at_column(self.source.raw_line(), token.row, token.col),
        })
    }
}

fn describe(kind: &str, reserved: &ReservedKinds) -> String {
    match kind {
        START_OF_DEFINITION => "':'".to_string(),
        END_OF_DEFINITION => "';'".to_string(),
        OR => "'|'".to_string(),
        NAME => "a rule name".to_string(),
        _ if kind == reserved.eof => "end of input".to_string(),
        _ => kind.to_string(),
    }
}

/// Strip the quote or slash delimiters.
fn body(delimited: &str) -> String {
    delimited[1..delimited.len() - 1].to_string()
}
