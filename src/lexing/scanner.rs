//! Base scanner
//!
//! Turns raw text into primitive tokens, one line at a time, against a [`RuleTable`].
//!
//! # Line handling
//!
//! Each line goes through the same states:
//!
//! 1. `LineStart`: read the next line. At end of input switch to `Eof`, which yields the
//!    end-of-input token forever.
//! 2. `Indentation`: a blank (empty or all-whitespace) line yields a single newline token
//!    and nothing else. Otherwise the leading whitespace run is compared with the previous
//!    indentation width and exactly one of indent (wider), deindent (narrower) or newline
//!    (same width) is emitted, carrying the run as its text.
//! 3. `Content`: the rest of the line is split into rule matches. Each match also swallows
//!    the whitespace after it. Matches of the ignore kind are consumed silently.
//!
//! Indentation is measured in characters. Tabs and spaces are not normalized, so a tab
//! and a space have the same width.

use std::io::{BufRead, Cursor};
use std::sync::Arc;

use super::error::{blank_prefix, Caret, LexError};
use super::rules::{ReservedKinds, RuleTable};
use super::source::{Sticky, TokenSource};
use super::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    LineStart,
    Indentation,
    Content,
    Eof,
}

/// Line-oriented scanner over any buffered reader.
pub struct Scanner<R> {
    table: Arc<RuleTable>,
    /// Dropped (closed) once the end of input is reached
    reader: Option<R>,
    state: State,
    raw_line: String,
    /// Byte offset of the unconsumed part of `raw_line`
    offset: usize,
    row: usize,
    col: usize,
    /// Width of the last non-blank line's leading whitespace
    depth: usize,
    col_indent: String,
    current: Option<Token>,
    eof_token: Option<Token>,
    sticky: Sticky,
}

impl Scanner<Cursor<String>> {
    /// Scan an in-memory text.
    pub fn from_text(text: &str, table: Arc<RuleTable>) -> Self {
        Scanner::new(Cursor::new(text.to_string()), table)
    }
}

impl<R: BufRead> Scanner<R> {
    pub fn new(reader: R, table: Arc<RuleTable>) -> Self {
        Scanner {
            table,
            reader: Some(reader),
            state: State::LineStart,
            raw_line: String::new(),
            offset: 0,
            row: 0,
            col: 1,
            depth: 0,
            col_indent: String::new(),
            current: None,
            eof_token: None,
            sticky: Sticky::default(),
        }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Current indentation width, in characters.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn read_line(&mut self) -> Result<bool, LexError> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(false);
        };
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            self.reader = None;
            log::trace!("end of input after {} lines", self.row);
            return Ok(false);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        self.raw_line = line;
        self.offset = 0;
        self.row += 1;
        self.col = 1;
        self.col_indent.clear();
        log::trace!("line {}: {:?}", self.row, self.raw_line);
        Ok(true)
    }

    /// Move past `len` bytes of the current line. Whitespace is copied into the
    /// caret string verbatim, anything else as spaces.
    fn consume(&mut self, len: usize) {
        let text = &self.raw_line[self.offset..self.offset + len];
        let width = text.chars().count();
        self.col_indent.push_str(&blank_prefix(text, width));
        self.col += width;
        self.offset += len;
    }

    fn indentation(&mut self) -> Token {
        let reserved = self.table.reserved();
        let run = self.table.leading_whitespace(&self.raw_line).to_string();
        let width = run.chars().count();
        let kind = match width.cmp(&self.depth) {
            std::cmp::Ordering::Greater => &reserved.indent,
            std::cmp::Ordering::Less => &reserved.deindent,
            std::cmp::Ordering::Equal => &reserved.newline,
        };
        if width != self.depth {
            log::debug!(
                "line {}: indentation width {} -> {}",
                self.row,
                self.depth,
                width
            );
        }
        let token = Token::new(kind.as_str(), run.as_str(), self.row, 1);
        self.depth = width;
        self.consume(run.len());
        token
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            match self.state {
                State::Eof => {
                    if let Some(token) = &self.eof_token {
                        return Ok(token.clone());
                    }
                    let eof = Token::new(
                        self.table.reserved().eof.as_str(),
                        "$",
                        self.row.max(1),
                        self.col,
                    );
                    self.eof_token = Some(eof.clone());
                    return Ok(eof);
                }
                State::LineStart => {
                    self.state = if self.read_line()? {
                        State::Indentation
                    } else {
                        State::Eof
                    };
                }
                State::Indentation => {
                    if self.raw_line.chars().all(char::is_whitespace) {
                        self.state = State::LineStart;
                        return Ok(Token::new(
                            self.table.reserved().newline.as_str(),
                            self.raw_line.as_str(),
                            self.row,
                            self.col,
                        ));
                    }
                    self.state = State::Content;
                    return Ok(self.indentation());
                }
                State::Content => {
                    let rest = &self.raw_line[self.offset..];
                    if rest.is_empty() {
                        self.state = State::LineStart;
                        continue;
                    }
                    let Some(found) = self.table.longest_match(rest) else {
                        return Err(LexError::UnrecognizedInput(Caret::new(
                            self.raw_line.as_str(),
                            self.row,
                            self.col,
                            self.col_indent.as_str(),
                        )));
                    };
                    let kind = found.kind.to_string();
                    let len = found.text.len();
                    let token = Token::new(
                        kind.as_str(),
                        &self.raw_line[self.offset..self.offset + len],
                        self.row,
                        self.col,
                    );
                    self.consume(len);
                    let gap = self
                        .table
                        .leading_whitespace(&self.raw_line[self.offset..])
                        .len();
                    self.consume(gap);

                    if self.table.is_ignored(&kind) {
                        log::trace!("ignored {}", token);
                        continue;
                    }
                    return Ok(token);
                }
            }
        }
    }
}

impl<R: BufRead> TokenSource for Scanner<R> {
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
        &self.raw_line
    }

    fn current_col_indent_string(&self) -> &str {
        &self.col_indent
    }

    fn reserved_kinds(&self) -> &ReservedKinds {
        self.table.reserved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::collect_tokens;
    use crate::testing::{kinds, render};

    fn calc_table() -> Arc<RuleTable> {
        Arc::new(
            RuleTable::builder()
                .add_regex_rule("NUM", ["[0-9]+"])
                .add_literal_rule("PLUS", ["+"])
                .build()
                .unwrap(),
        )
    }

    fn scan(text: &str) -> Vec<Token> {
        collect_tokens(Scanner::from_text(text, calc_table())).unwrap()
    }

    #[test]
    fn test_single_line() {
        let tokens = scan("1+2");
        assert_eq!(
            render(&tokens),
            "NEWLINE('') @ 1:1\nNUM('1') @ 1:1\nPLUS('+') @ 1:2\nNUM('2') @ 1:3\nEOF('$') @ 1:4"
        );
    }

    #[test]
    fn test_indentation_deltas() {
        let tokens = scan("1\n  2\n  3\n4\n");
        assert_eq!(
            kinds(&tokens),
            vec![
                "NEWLINE", "NUM", "INDENT", "NUM", "NEWLINE", "NUM", "DEINDENT", "NUM", "EOF"
            ]
        );
        assert_eq!(tokens[2].text, "  ");
        assert_eq!(tokens[6].text, "");
    }

    #[test]
    fn test_content_columns_after_indent() {
        let tokens = scan("    12 + 3");
        assert_eq!(
            render(&tokens),
            "INDENT('    ') @ 1:1\nNUM('12') @ 1:5\nPLUS('+') @ 1:8\nNUM('3') @ 1:10\nEOF('$') @ 1:11"
        );
    }

    #[test]
    fn test_blank_lines_emit_single_newline_without_indent_change() {
        let tokens = scan("1\n\n   \n  2");
        assert_eq!(
            kinds(&tokens),
            vec!["NEWLINE", "NUM", "NEWLINE", "NEWLINE", "INDENT", "NUM", "EOF"]
        );
        assert_eq!(tokens[3].text, "   ");
        assert_eq!(tokens[3].row, 3);
    }

    #[test]
    fn test_unrecognized_input() {
        let mut scanner = Scanner::from_text("1#2", calc_table());
        assert_eq!(scanner.pop().unwrap().kind, "NEWLINE");
        assert_eq!(scanner.pop().unwrap().kind, "NUM");
        let err = scanner.pop().unwrap_err();
        assert_eq!(err.to_string(), "Unrecognized input at (1, 2):\n1#2\n ^");
    }

    #[test]
    fn test_error_is_sticky() {
        let mut scanner = Scanner::from_text("#", calc_table());
        scanner.pop().unwrap();
        let first = scanner.pop().unwrap_err();
        assert_eq!(scanner.pop().unwrap_err(), first);
        assert_eq!(scanner.peek().unwrap_err(), first);
    }

    #[test]
    fn test_peek_is_idempotent() {
        let mut scanner = Scanner::from_text("1+2", calc_table());
        scanner.pop().unwrap();
        assert_eq!(scanner.peek().unwrap().text, "1");
        assert_eq!(scanner.peek().unwrap().text, "1");
        assert_eq!(scanner.pop().unwrap().text, "1");
        assert_eq!(scanner.pop().unwrap().text, "+");
    }

    #[test]
    fn test_eof_repeats() {
        let mut scanner = Scanner::from_text("", calc_table());
        let eof = scanner.pop().unwrap();
        assert_eq!(eof, Token::new("EOF", "$", 1, 1));
        assert_eq!(scanner.pop().unwrap(), eof);
    }

    #[test]
    fn test_crlf_line_endings() {
        let tokens = scan("1\r\n  2\r\n");
        assert_eq!(kinds(&tokens), vec!["NEWLINE", "NUM", "INDENT", "NUM", "EOF"]);
        assert_eq!(tokens[3].text, "2");
    }

    #[test]
    fn test_ignored_kind_is_consumed_but_not_yielded() {
        let table = RuleTable::builder()
            .add_regex_rule("NUM", ["[0-9]+"])
            .add_regex_rule("COMMENT", ["#.*"])
            .with_ignore("COMMENT")
            .build()
            .unwrap();
        let tokens = collect_tokens(Scanner::from_text("1 # one\n2", Arc::new(table))).unwrap();
        assert_eq!(
            render(&tokens),
            "NEWLINE('') @ 1:1\nNUM('1') @ 1:1\nNEWLINE('') @ 2:1\nNUM('2') @ 2:1\nEOF('$') @ 2:2"
        );
    }

    #[test]
    fn test_col_indent_string_tracks_consumed_prefix() {
        let mut scanner = Scanner::from_text("\t1 + 22 #", calc_table());
        for _ in 0..3 {
            scanner.pop().unwrap();
        }
        assert_eq!(scanner.current_col_indent_string(), "\t    ");
        assert_eq!(scanner.pop().unwrap().text, "22");
        let err = scanner.pop().unwrap_err();
        assert_eq!(err.caret().unwrap().indent, "\t       ");
        assert_eq!(err.caret().unwrap().col, 9);
        assert_eq!(scanner.raw_line(), "\t1 + 22 #");
    }
}
