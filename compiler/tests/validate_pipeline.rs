//! Integration tests for the sanity checks run on a parsed pipeline.

mod helpers;

use nfweave::error::{ErrorKind, Phase};
use nfweave::parse::parse_pipeline;

fn code_of(input: &str) -> String {
    parse_pipeline(input, &helpers::catalog())
        .expect_err("pipeline should be rejected")
        .code
}

#[test]
fn malformed_delimiters() {
    for input in ["A )", "A | B", "(A (B))", "(P | Q", "C ("] {
        assert_eq!(code_of(input), "S003", "input {input:?}");
    }
}

#[test]
fn empty_lanes() {
    for input in ["()", "(|A)", "(A|)", "(A||B)", "B ( )"] {
        assert_eq!(code_of(input), "S004", "input {input:?}");
    }
}

#[test]
fn non_repeatable_immediate_repetition() {
    let err = parse_pipeline("B B", &helpers::catalog()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Sanity);
    assert_eq!(err.phase, Phase::Validate);
    assert_eq!(err.code, "S005");
    assert_eq!(err.token.as_deref(), Some("B"));
}

#[test]
fn repetition_across_fork_boundary() {
    assert_eq!(code_of("B (B | R)"), "S005");
    assert_eq!(code_of("(A | B) B"), "S005");
    assert_eq!(code_of("(B B | R)"), "S005");
}

#[test]
fn repeatable_process_may_follow_itself() {
    let graph = parse_pipeline("R R (R | B)", &helpers::catalog()).expect("should parse");
    assert_eq!(graph.to_string(), "R R (R | B)");
}

#[test]
fn non_adjacent_reuse_allowed() {
    let graph = parse_pipeline("B R B", &helpers::catalog()).expect("should parse");
    assert_eq!(graph.processes().count(), 3);
}

#[test]
fn first_violation_wins() {
    // The unknown name comes first, so the repetition is never reached.
    assert_eq!(code_of("Z B B"), "S002");
}
