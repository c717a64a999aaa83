//! Integration tests for the Parse phase: grammar, occurrence numbering and
//! the canonical string form.

mod helpers;

use nfweave::error::ErrorKind;
use nfweave::ir::ProcessRef;
use nfweave::parse::parse_pipeline;

#[test]
fn sequential_pipeline() {
    let graph = parse_pipeline("A B", &helpers::catalog()).expect("should parse");
    assert_eq!(helpers::shape(&graph), vec![vec![vec!["A"]], vec![vec!["B"]]]);
    assert_eq!(graph.to_string(), "A B");
}

#[test]
fn fork_then_merge() {
    let graph = parse_pipeline("(P | Q) C", &helpers::catalog()).expect("should parse");
    assert_eq!(graph.stages.len(), 2);
    assert!(graph.stages[0].is_fork());
    assert!(!graph.stages[1].is_fork());
    assert_eq!(
        helpers::shape(&graph),
        vec![vec![vec!["P"], vec!["Q"]], vec![vec!["C"]]]
    );
}

#[test]
fn spacing_around_delimiters_is_irrelevant() {
    let catalog = helpers::catalog();
    let tight = parse_pipeline("B(P|Q R)C", &catalog).expect("should parse");
    let loose = parse_pipeline("  B ( P | Q R ) C ", &catalog).expect("should parse");
    assert_eq!(tight, loose);
    assert_eq!(tight.to_string(), "B (P | Q R) C");
}

#[test]
fn single_lane_group_is_one_stage() {
    let graph = parse_pipeline("(B R)", &helpers::catalog()).expect("should parse");
    assert_eq!(graph.stages.len(), 1);
    assert_eq!(graph.stages[0].lanes[0].processes.len(), 2);
    assert_eq!(graph.to_string(), "(B R)");
}

#[test]
fn occurrences_count_per_name() {
    let graph = parse_pipeline("R B R (R | A)", &helpers::catalog()).expect("should parse");
    let ids: Vec<String> = graph.processes().map(ProcessRef::id).collect();
    assert_eq!(ids, vec!["R_1", "B_1", "R_2", "R_3", "A_1"]);
}

#[test]
fn empty_pipeline_rejected() {
    for input in ["", "   ", "\n\t"] {
        let err = parse_pipeline(input, &helpers::catalog()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Sanity);
        assert_eq!(err.code, "S001");
        assert!(err.message.contains("empty pipeline"));
    }
}

#[test]
fn unbalanced_group_rejected() {
    let err = parse_pipeline("(A B", &helpers::catalog()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Sanity);
    assert_eq!(err.code, "S003");
    assert!(err.message.contains("never closed"));
}

#[test]
fn unknown_process_named_exactly() {
    let err = parse_pipeline("A Z", &helpers::catalog()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Sanity);
    assert_eq!(err.code, "S002");
    assert_eq!(err.token.as_deref(), Some("Z"));
    assert!(err.message.contains("'Z'"));
}

#[test]
fn unknown_process_inside_group() {
    let err = parse_pipeline("B (P | Zed)", &helpers::catalog()).unwrap_err();
    assert_eq!(err.code, "S002");
    assert_eq!(err.token.as_deref(), Some("Zed"));
}
