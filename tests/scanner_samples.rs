//! Integration tests over the sample documents in `samples/`
//!
//! Token dumps are checked as inline snapshots, so a change in positions or kinds shows
//! up as a readable diff.

use std::fs;
use std::sync::Arc;

use hvitt::config::Loader;
use hvitt::testing::{kinds, render};
use hvitt::{collect_tokens, LexError, Pipeline, RuleLoader, RuleTable, Scanner};

fn read_sample(name: &str) -> String {
    fs::read_to_string(format!("samples/{}", name)).expect("Failed to read sample")
}

fn blocks_pipeline() -> Pipeline {
    let rules = RuleLoader::load_str(&read_sample("blocks.rules")).unwrap();
    let settings = Loader::new()
        .with_file("samples/blocks.toml")
        .build()
        .unwrap();
    Pipeline::from_rules(rules, settings).unwrap()
}

#[test]
fn test_blocks_sample_tokenization() {
    let tokens = blocks_pipeline()
        .tokenize(&read_sample("blocks.src"))
        .unwrap();

    insta::assert_snapshot!(render(&tokens), @r"
    KEYWORD('def') @ 2:1
    NAME('abs') @ 2:5
    OP('(') @ 2:8
    NAME('x') @ 2:9
    OP(')') @ 2:10
    OP(':') @ 2:11
    INDENT('    ') @ 3:1
    KEYWORD('if') @ 3:5
    NAME('x') @ 3:8
    OP('==') @ 3:10
    NUMBER('0') @ 3:13
    OP(':') @ 3:14
    INDENT('        ') @ 4:1
    KEYWORD('return') @ 4:9
    NUMBER('0') @ 4:16
    DEINDENT('    ') @ 6:1
    KEYWORD('return') @ 6:5
    NAME('x') @ 6:12
    DEINDENT('') @ 7:1
    NAME('print') @ 7:1
    OP('(') @ 7:6
    NAME('abs') @ 7:7
    OP('(') @ 7:10
    NUMBER('3') @ 7:11
    OP(')') @ 7:12
    OP(')') @ 7:13
    EOF('$') @ 7:14
    ");
}

#[test]
fn test_blocks_sample_raw_scan() {
    let rules = RuleLoader::load_str(&read_sample("blocks.rules"))
        .unwrap()
        .with_ignore("COMMENT")
        .build()
        .unwrap();
    let tokens = collect_tokens(Scanner::from_text(
        &read_sample("blocks.src"),
        Arc::new(rules),
    ))
    .unwrap();
    let line_markers: Vec<(&str, usize)> = tokens
        .iter()
        .filter(|t| matches!(t.kind.as_str(), "INDENT" | "DEINDENT" | "NEWLINE"))
        .map(|t| (t.kind.as_str(), t.row))
        .collect();
    assert_eq!(
        line_markers,
        vec![
            ("NEWLINE", 1),
            ("NEWLINE", 2),
            ("INDENT", 3),
            ("INDENT", 4),
            ("NEWLINE", 5),
            ("DEINDENT", 6),
            ("DEINDENT", 7),
        ]
    );
}

#[test]
fn test_calc_sample_round_trip() {
    let rules = RuleLoader::load_str(&read_sample("calc.rules")).unwrap();
    let settings = Loader::new()
        .set_override("structure.indent_unit", "  ")
        .unwrap()
        .build()
        .unwrap();
    let pipeline = Pipeline::from_rules(rules, settings).unwrap();
    let tokens = pipeline.tokenize(&read_sample("calc.src")).unwrap();
    assert_eq!(
        kinds(&tokens),
        vec![
            "NUM", "PLUS", "NUM", "INDENT", "NUM", "PLUS", "NUM", "DEINDENT", "NUM", "PLUS", "NUM",
            "EOF"
        ]
    );
    let texts: Vec<&str> = tokens
        .iter()
        .filter(|t| t.kind == "NUM")
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(texts, vec!["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn test_unrecognized_input_error_rendering() {
    let table = RuleTable::builder()
        .add_regex_rule("NUM", ["[0-9]+"])
        .add_literal_rule("PLUS", ["+"])
        .build()
        .unwrap();
    let err = collect_tokens(Scanner::from_text("1+2\n 3 ? 4\n", Arc::new(table))).unwrap_err();
    assert!(matches!(err, LexError::UnrecognizedInput(_)));

    insta::assert_snapshot!(err.to_string(), @r"
    Unrecognized input at (2, 4):
     3 ? 4
       ^
    ");
}
