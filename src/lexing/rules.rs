//! Rule table: token kinds and the patterns that recognize them
//!
//! A rule table is an ordered list of kinds, each owning a set of matchers (literal
//! strings or regular-expression fragments). Building the table compiles every set into
//! one anchored pattern per kind.
//!
//! # Matching order
//!
//! Inside one kind, the matchers are tried longest-pattern-first, so overlapping
//! matchers resolve to the most specific one without hand ordering. Across kinds the
//! scanner asks every kind and keeps:
//!
//! 1. the longest matched text,
//! 2. on equal length, a literal match over a regex match (keywords beat identifiers),
//! 3. then the kind declared first.
//!
//! Zero-length matches never count.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+").unwrap());

/// One way of recognizing text for a kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Matcher {
    /// Matched verbatim
    Literal(String),
    /// Used as a regular-expression fragment
    Regex(String),
}

impl Matcher {
    /// The text the matcher was declared with; its length decides the ordering within a kind.
    pub fn source(&self) -> &str {
        match self {
            Matcher::Literal(s) | Matcher::Regex(s) => s,
        }
    }

    fn to_pattern(&self) -> String {
        match self {
            Matcher::Literal(literal) => regex::escape(literal),
            Matcher::Regex(regex) => regex.clone(),
        }
    }
}

/// Names of the structural token kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedKinds {
    pub indent: String,
    pub deindent: String,
    pub newline: String,
    pub eof: String,
}

impl Default for ReservedKinds {
    fn default() -> Self {
        ReservedKinds {
            indent: "INDENT".to_string(),
            deindent: "DEINDENT".to_string(),
            newline: "NEWLINE".to_string(),
            eof: "EOF".to_string(),
        }
    }
}

impl ReservedKinds {
    pub fn contains(&self, kind: &str) -> bool {
        kind == self.indent || kind == self.deindent || kind == self.newline || kind == self.eof
    }
}

/// Collects rules before compiling them into a [`RuleTable`].
#[derive(Debug, Clone, Default)]
pub struct RuleTableBuilder {
    rules: Vec<(String, Vec<Matcher>)>,
    reserved: ReservedKinds,
    ignore: Option<String>,
}

impl RuleTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register matchers under `kind`.
    ///
    /// Kinds keep the position of their first registration; registering a kind again
    /// appends to its matcher set.
    pub fn compile<I>(&mut self, kind: &str, matchers: I) -> &mut Self
    where
        I: IntoIterator<Item = Matcher>,
    {
        let matchers = matchers.into_iter();
        match self.rules.iter_mut().find(|(k, _)| k == kind) {
            Some((_, existing)) => existing.extend(matchers),
            None => self.rules.push((kind.to_string(), matchers.collect())),
        }
        self
    }

    /// Add a kind recognized by any of the given literal strings.
    pub fn add_literal_rule<I>(mut self, kind: &str, literals: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.compile(kind, literals.into_iter().map(|l| Matcher::Literal(l.into())));
        self
    }

    /// Add a kind recognized by any of the given regular expressions.
    pub fn add_regex_rule<I>(mut self, kind: &str, regexes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.compile(kind, regexes.into_iter().map(|r| Matcher::Regex(r.into())));
        self
    }

    pub fn with_reserved(mut self, reserved: ReservedKinds) -> Self {
        self.reserved = reserved;
        self
    }

    /// Designate the kind whose matches are consumed but never yielded.
    pub fn with_ignore(mut self, kind: impl Into<String>) -> Self {
        self.ignore = Some(kind.into());
        self
    }

    pub fn set_reserved(&mut self, reserved: ReservedKinds) -> &mut Self {
        self.reserved = reserved;
        self
    }

    pub fn set_ignore(&mut self, kind: Option<String>) -> &mut Self {
        self.ignore = kind;
        self
    }

    /// Kinds in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(k, _)| k.as_str())
    }

    pub fn matchers(&self, kind: &str) -> Option<&[Matcher]> {
        self.rules
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, m)| m.as_slice())
    }

    /// Compile every rule. Fails on reserved-name collisions, empty rules and bad regexes.
    pub fn build(&self) -> Result<RuleTable, ConfigError> {
        if let Some(ignore) = &self.ignore {
            if self.reserved.contains(ignore) {
                return Err(ConfigError::ReservedKind {
                    kind: ignore.clone(),
                });
            }
        }

        let mut rules = Vec::with_capacity(self.rules.len());
        for (kind, matchers) in &self.rules {
            rules.push(CompiledRule::new(kind, matchers, &self.reserved)?);
        }

        Ok(RuleTable {
            rules,
            reserved: self.reserved.clone(),
            ignore: self.ignore.clone(),
        })
    }
}

/// A kind together with its combined, anchored pattern.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    kind: String,
    pattern: Regex,
    literals: Vec<String>,
}

impl CompiledRule {
    fn new(kind: &str, matchers: &[Matcher], reserved: &ReservedKinds) -> Result<Self, ConfigError> {
        if reserved.contains(kind) {
            return Err(ConfigError::ReservedKind {
                kind: kind.to_string(),
            });
        }
        if matchers.is_empty() {
            return Err(ConfigError::EmptyRule {
                kind: kind.to_string(),
            });
        }
        if matchers.iter().any(|m| m.source().is_empty()) {
            return Err(ConfigError::EmptyMatcher {
                kind: kind.to_string(),
            });
        }

        // Stable sort: equal lengths keep declaration order
        let mut ordered: Vec<&Matcher> = matchers.iter().collect();
        ordered.sort_by_key(|m| std::cmp::Reverse(m.source().chars().count()));

        let alternatives: Vec<String> = ordered
            .iter()
            .map(|m| format!("(?:{})", m.to_pattern()))
            .collect();
        let source = format!("^(?:{})", alternatives.join("|"));
        let pattern = Regex::new(&source).map_err(|e| ConfigError::InvalidPattern {
            kind: kind.to_string(),
            message: e.to_string(),
        })?;
        log::debug!("compiled kind {} as {}", kind, source);

        let literals = matchers
            .iter()
            .filter_map(|m| match m {
                Matcher::Literal(l) => Some(l.clone()),
                Matcher::Regex(_) => None,
            })
            .collect();

        Ok(CompiledRule {
            kind: kind.to_string(),
            pattern,
            literals,
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The combined pattern, as handed to the regex engine.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Byte length of the non-empty prefix of `input` this rule recognizes.
    fn match_len(&self, input: &str) -> Option<usize> {
        self.pattern
            .find(input)
            .map(|m| m.end())
            .filter(|&len| len > 0)
    }

    fn is_literal(&self, text: &str) -> bool {
        self.literals.iter().any(|l| l == text)
    }
}

/// The winning kind for a prefix of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'t, 's> {
    pub kind: &'t str,
    pub text: &'s str,
}

/// Compiled, immutable rule table. Shared by every scanner that reads it.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<CompiledRule>,
    reserved: ReservedKinds,
    ignore: Option<String>,
}

impl RuleTable {
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::new()
    }

    pub fn reserved(&self) -> &ReservedKinds {
        &self.reserved
    }

    pub fn ignore_kind(&self) -> Option<&str> {
        self.ignore.as_deref()
    }

    pub fn is_ignored(&self, kind: &str) -> bool {
        self.ignore.as_deref() == Some(kind)
    }

    /// Compiled rules in declaration order.
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn rule(&self, kind: &str) -> Option<&CompiledRule> {
        self.rules.iter().find(|r| r.kind == kind)
    }

    /// The whitespace run at the start of `input`; empty when there is none.
    pub fn leading_whitespace<'s>(&self, input: &'s str) -> &'s str {
        WHITESPACE.find(input).map_or("", |m| m.as_str())
    }

    /// Pick the kind that recognizes a prefix of `input`.
    pub fn longest_match<'s>(&self, input: &'s str) -> Option<RuleMatch<'_, 's>> {
        let mut best: Option<(&CompiledRule, usize, bool)> = None;
        for rule in &self.rules {
            let Some(len) = rule.match_len(input) else {
                continue;
            };
            let literal = rule.is_literal(&input[..len]);
            let better = match best {
                None => true,
                Some((_, best_len, best_literal)) => {
                    len > best_len || (len == best_len && literal && !best_literal)
                }
            };
            if better {
                best = Some((rule, len, literal));
            }
        }
        best.map(|(rule, len, _)| RuleMatch {
            kind: &rule.kind,
            text: &input[..len],
        })
    }

    /// True when `kind` recognizes the whole of `text`.
    pub fn recognizes(&self, kind: &str, text: &str) -> bool {
        self.rule(kind)
            .and_then(|rule| rule.match_len(text))
            .map_or(false, |len| len == text.len())
    }
}
