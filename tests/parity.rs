#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;

use draftcore::math::Tolerance;
use draftcore::parity::{check_corpus, compare, GoldenCase, Outcome};

const CORPUS: &str = include_str!("golden/kernel_corpus.json");

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn load() -> Vec<GoldenCase> {
    serde_json::from_str(CORPUS).expect("golden corpus should parse")
}

#[test]
fn corpus_matches_kernel() {
    init_tracing();
    let cases = load();
    assert!(!cases.is_empty());
    let mismatches = check_corpus(&cases, &Tolerance::default());
    for mismatch in &mismatches {
        eprintln!("{mismatch}");
    }
    assert!(mismatches.is_empty(), "{} golden case(s) diverged", mismatches.len());
}

#[test]
fn case_names_are_unique() {
    let cases = load();
    let mut seen = HashSet::new();
    for case in &cases {
        assert!(seen.insert(case.name.as_str()), "duplicate case {:?}", case.name);
    }
}

#[test]
fn replay_is_bit_identical() {
    let tol = Tolerance::default();
    for case in load() {
        let first = case.operation.run(&tol);
        let second = case.operation.run(&tol);
        assert_eq!(first, second, "case {:?} is not deterministic", case.name);
    }
}

#[test]
fn outcomes_survive_json() {
    let tol = Tolerance::default();
    for case in load() {
        let outcome = case.operation.run(&tol);
        let text = serde_json::to_string(&outcome).unwrap();
        let back: Outcome = serde_json::from_str(&text).unwrap();
        assert_eq!(compare(&outcome, &back, &tol), Ok(()), "case {:?}", case.name);
    }
}

#[test]
fn corpus_covers_every_operation_and_failure_kind() {
    let cases = load();
    let text = serde_json::to_value(&cases).unwrap();
    let ops: HashSet<String> = text
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["operation"]["op"].as_str().unwrap().to_owned())
        .collect();
    for op in ["intersect", "trim", "extend", "fillet", "offset"] {
        assert!(ops.contains(op), "no {op} case");
    }
    let failures: HashSet<String> = cases
        .iter()
        .filter_map(|c| match &c.expected {
            Outcome::Failure { error } => Some(serde_json::to_string(error).unwrap()),
            _ => None,
        })
        .collect();
    assert!(failures.contains("\"degenerate_input\""));
    assert!(failures.contains("\"no_solution\""));
}
