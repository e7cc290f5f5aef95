// Transformer invariants over generated expressions.

use proptest::prelude::*;
use ksexpr::codegen::Transformer;
use ksexpr::parser::parse;

use crate::generators::expression;

fn balanced(text: &str) -> bool {
    let mut depth = 0i64;
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0 && !in_string
}

/// Property: lowering the same tree twice yields identical text.
#[test]
fn prop_transform_is_idempotent() {
    proptest!(|(source in expression())| {
        let expr = parse(&source).into_result().unwrap();
        let mut transformer = Transformer::new();
        let first = transformer.transform(&expr);
        let second = transformer.transform(&expr);
        prop_assert_eq!(first, second);
    });
}

/// Property: every generated expression lowers, and the output is bracket-balanced.
#[test]
fn prop_lowered_output_is_balanced() {
    proptest!(|(source in expression())| {
        let target = ksexpr::compile_to_target(&source);
        prop_assert!(target.is_ok(), "{}: {:?}", source, target);
        let target = target.unwrap();
        prop_assert!(balanced(&target), "{} => {}", source, target);
    });
}

/// Property: bitwise and modulo operators never survive as native syntax.
/// Generated string literals are lowercase words, so a plain scan is enough.
#[test]
fn prop_no_native_bitwise_operators() {
    proptest!(|(source in expression())| {
        let target = ksexpr::compile_to_target(&source).unwrap();
        for op in ["~", "^", "<<", ">>", "%", " & ", " | "] {
            prop_assert!(!target.contains(op), "{} in {}", op, target);
        }
    });
}
