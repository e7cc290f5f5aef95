// Strategies producing syntactically valid expression source.

use proptest::prelude::*;

const NAMES: &[&str] = &["a", "len", "flags", "num_entries", "_io", "_parent", "_root", "_", "body"];
const MEMBERS: &[&str] = &["len", "pos", "size", "first", "header", "eof", "to_i"];
const BINARY: &[&str] = &[
    "+", "-", "*", "/", "%", "==", "!=", "<", ">", "<=", ">=", "&&", "||", "&", "|", "^", "<<", ">>",
];
const UNARY: &[&str] = &["-", "!", "~"];
const CAST_TYPES: &[&str] = &["u4", "s2le", "f8", "str", "bool"];

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(NAMES).prop_map(str::to_string),
        any::<u32>().prop_map(|n| n.to_string()),
        any::<u16>().prop_map(|n| format!("0x{n:X}")),
        (0u32..1000, 0u32..100).prop_map(|(a, b)| format!("{a}.{b}")),
        "[a-z ]{0,8}".prop_map(|s| format!("\"{s}\"")),
        Just("true".to_string()),
        Just("null".to_string()),
    ]
}

/// Expressions built only from forms every lowering path accepts
/// (no `alignof`, no casts to unknown types).
pub fn expression() -> impl Strategy<Value = String> {
    leaf().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(BINARY), inner.clone())
                .prop_map(|(l, op, r)| format!("({l} {op} {r})")),
            (prop::sample::select(UNARY), inner.clone())
                .prop_map(|(op, e)| format!("{op}({e})")),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(c, a, b)| format!("({c} ? {a} : {b})")),
            (inner.clone(), inner.clone()).prop_map(|(o, i)| format!("({o})[{i}]")),
            (inner.clone(), prop::sample::select(MEMBERS)).prop_map(|(o, m)| format!("({o}).{m}")),
            prop::collection::vec(inner.clone(), 0..3)
                .prop_map(|args| format!("substring({})", args.join(", "))),
            (inner.clone(), prop::sample::select(CAST_TYPES))
                .prop_map(|(e, ty)| format!("({e}).as<{ty}>()")),
            prop::collection::vec(inner.clone(), 0..3).prop_map(|els| format!("[{}]", els.join(", "))),
            inner.prop_map(|e| format!("sizeof({e})")),
        ]
    })
}
