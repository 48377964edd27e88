//! End-to-end scenarios through the configured pipeline
//!
//! All cases use a small arithmetic rule set and a two-space indent unit.

use rstest::{fixture, rstest};

use hvitt::config::Loader;
use hvitt::testing::kinds;
use hvitt::{Pipeline, PipelineError, RuleLoader};

const CALC_RULES: &str = "NUM: /[0-9]+/ ;\nPLUS: '+' ;\n";

#[fixture]
fn pipeline() -> Pipeline {
    let rules = RuleLoader::load_str(CALC_RULES).unwrap();
    let settings = Loader::new()
        .set_override("structure.indent_unit", "  ")
        .unwrap()
        .build()
        .unwrap();
    Pipeline::from_rules(rules, settings).unwrap()
}

#[rstest]
#[case::single_line("1+2\n", &["NUM", "PLUS", "NUM", "EOF"])]
#[case::no_trailing_newline("1+2", &["NUM", "PLUS", "NUM", "EOF"])]
#[case::blank_lines_collapse("1\n\n\n2\n", &["NUM", "NEWLINE", "NUM", "EOF"])]
#[case::leading_and_trailing_blanks("\n\n1\n2\n\n", &["NUM", "NEWLINE", "NUM", "EOF"])]
#[case::nested_blocks(
    "1\n  2\n    3\n4\n",
    &["NUM", "INDENT", "NUM", "INDENT", "NUM", "DEINDENT", "DEINDENT", "NUM", "EOF"]
)]
#[case::blank_line_inside_block(
    "1\n  2\n\n  3\n4\n",
    &["NUM", "INDENT", "NUM", "NEWLINE", "NUM", "DEINDENT", "NUM", "EOF"]
)]
#[case::empty_input("", &["EOF"])]
#[case::only_blank_lines("\n  \n\n", &["EOF"])]
fn test_token_kinds(pipeline: Pipeline, #[case] text: &str, #[case] expected: &[&str]) {
    let tokens = pipeline.tokenize(text).unwrap();
    assert_eq!(kinds(&tokens), expected);
}

#[rstest]
#[case::unknown_character("1#2\n", "Unrecognized input at (1, 2):\n1#2\n ^")]
#[case::unknown_character_after_spaces("1 + #\n", "Unrecognized input at (1, 5):\n1 + #\n    ^")]
#[case::indent_jump("1\n    2\n", "Invalid indent at (2, 1):\n    2\n    ^")]
#[case::partial_unit("1\n   2\n", "Invalid indent at (2, 1):\n   2\n   ^")]
#[case::misaligned_deindent("1\n  2\n 3\n", "Invalid deindent at (3, 1):\n 3\n ^")]
fn test_error_rendering(pipeline: Pipeline, #[case] text: &str, #[case] expected: &str) {
    let err = pipeline.tokenize(text).unwrap_err();
    assert!(matches!(err, PipelineError::Lex(_)));
    assert_eq!(err.to_string(), expected);
}

#[rstest]
fn test_empty_input_eof_position(pipeline: Pipeline) {
    let tokens = pipeline.tokenize("").unwrap();
    assert_eq!((tokens[0].row, tokens[0].col), (1, 1));
}

#[rstest]
fn test_positions_survive_filters(pipeline: Pipeline) {
    let tokens = pipeline.tokenize("\n1 + 22\n  3\n").unwrap();
    let positions: Vec<(&str, usize, usize)> = tokens
        .iter()
        .map(|t| (t.kind.as_str(), t.row, t.col))
        .collect();
    assert_eq!(
        positions,
        vec![
            ("NUM", 2, 1),
            ("PLUS", 2, 3),
            ("NUM", 2, 5),
            ("INDENT", 3, 1),
            ("NUM", 3, 3),
            ("EOF", 3, 4),
        ]
    );
}
