//! Lowering of realistic schema expressions to host engine source.

use insta::assert_snapshot;
use ksexpr::codegen::{transform, Transformer};
use ksexpr::compile_to_target;
use ksexpr::diagnostics::{ExprError, LowerError};

fn lower(src: &str) -> String {
    compile_to_target(src).unwrap_or_else(|e| panic!("{src}: {e}"))
}

fn table(corpus: &[&str]) -> String {
    corpus
        .iter()
        .map(|src| format!("{src}  =>  {}", lower(src)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn mapping_fidelity() {
    assert_eq!(lower("~counter"), "bitNot(counter)");
    assert_eq!(lower("flags & 0x0F"), "bitAnd(flags, 15)");
    assert_eq!(lower("is_active ? 1 : 0"), "ternary(is_active, 1, 0)");
    assert_eq!(lower("my_array[0]"), "at(my_array, 0)");
    assert_eq!(lower("value.as<f4>()"), "to_f(value)");
}

#[test]
fn stream_receiver_falls_back_to_value_attributes() {
    assert_eq!(lower("_io.size"), "stream_size(_io)");
    assert_eq!(lower("_io.to_s"), "to_s(_io)");
    assert_eq!(lower("_io.length"), "length(_io)");
}

#[test]
fn schema_expressions() {
    let out = table(&[
        "len_body - _io.pos",
        "num_entries * 4 + 8",
        "(flags >> 4) & 0b11",
        "_parent.header.version >= 2 ? _io.read_u4le() : 0",
        "name.to_s(\"ASCII\").length",
        "-a % 8",
        "sizeof(header) * count",
        "[0x50, 0x4B]",
        "_bytes_remaining > 0 && !_io.eof",
        "entries[i].size",
        "_root._sizeof",
        "data.process_xor(key).reverse",
        "_io.read_bits_int_be(3)",
        "-(a + b)",
        "1.5e3 / 2",
        "_.len",
    ]);
    assert_snapshot!(out, @r#"
    len_body - _io.pos  =>  (len_body - pos(_io))
    num_entries * 4 + 8  =>  ((num_entries * 4) + 8)
    (flags >> 4) & 0b11  =>  bitAnd(bitShiftRight(flags, 4), 3)
    _parent.header.version >= 2 ? _io.read_u4le() : 0  =>  ternary((_parent.header.version >= 2), readU4LE(_io), 0)
    name.to_s("ASCII").length  =>  length(bytesToStr(name, "ASCII"))
    -a % 8  =>  mod(-a, 8)
    sizeof(header) * count  =>  (sizeof_type("header") * count)
    [0x50, 0x4B]  =>  [80, 75]
    _bytes_remaining > 0 && !_io.eof  =>  ((_bytes_remaining > 0) && !isEOF(_io))
    entries[i].size  =>  size(at(entries, i))
    _root._sizeof  =>  sizeof_value(_root)
    data.process_xor(key).reverse  =>  reverse(processXOR(data, key))
    _io.read_bits_int_be(3)  =>  readBitsIntBE(_io, 3)
    -(a + b)  =>  -(a + b)
    1.5e3 / 2  =>  div(1500.0, 2)
    _.len  =>  _.len
    "#);
}

#[test]
fn integer_boundaries() {
    assert_eq!(lower("9223372036854775807"), "9223372036854775807");
    assert_eq!(lower("9223372036854775808"), "9223372036854775808u");
    assert_eq!(lower("-9223372036854775808"), "-9223372036854775808");
}

#[test]
fn lowering_errors() {
    let report = [
        "value.as<widget>()",
        "alignof(u4)",
        "a + alignof(b) * 2",
        "-18446744073709551615",
    ]
    .iter()
    .map(|src| compile_to_target(src).unwrap_err().to_string())
    .collect::<Vec<_>>()
    .join("\n");
    assert_snapshot!(report, @r"
    Lowering error: unsupported cast target type 'widget'
    Lowering error: alignof has no target representation
    Lowering error: alignof has no target representation
    Lowering error: negative literal -18446744073709551615 has no target representation
    ");
}

#[test]
fn lowering_error_carries_node_span() {
    let Err(ExprError::Lower(LowerError::Unsupported { span, .. })) = compile_to_target("a + alignof(b)") else {
        panic!("expected unsupported error");
    };
    assert_eq!((span.start, span.end), (4, 14));
    assert_eq!(span.pos.column, 5);
}

#[test]
fn cast_error_points_at_type_name() {
    let Err(ExprError::Lower(err)) = compile_to_target("v.as<widget>()") else {
        panic!("expected lowering error");
    };
    assert_eq!(err.span().pos.column, 6);
}

#[test]
fn transform_is_idempotent() {
    let expr = ksexpr::parse("_io.size - _io.pos > sizeof(trailer) ? x & 1 : y[2]").unwrap();
    let mut transformer = Transformer::new();
    let first = transformer.transform(&expr).unwrap();
    let second = transformer.transform(&expr).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, transform(&expr).unwrap());
}
