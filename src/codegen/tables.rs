//! Fixed lowering tables. Every name here must exist in the host engine's
//! function library with a matching arity.

use crate::parser::ast::{BinOp, UnaryOp};

/// How an operator appears in target source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpLowering {
    /// Native operator text, emitted infix (binary) or prefix (unary).
    Native(&'static str),
    /// Named function taking the operands positionally.
    Function(&'static str),
}

pub fn binary_op(op: BinOp) -> OpLowering {
    use OpLowering::*;
    match op {
        BinOp::Add => Native("+"),
        BinOp::Sub => Native("-"),
        BinOp::Mul => Native("*"),
        BinOp::Eq => Native("=="),
        BinOp::Neq => Native("!="),
        BinOp::Lt => Native("<"),
        BinOp::Gt => Native(">"),
        BinOp::LtEq => Native("<="),
        BinOp::GtEq => Native(">="),
        BinOp::And => Native("&&"),
        BinOp::Or => Native("||"),
        // Floor semantics: the native operators truncate toward zero.
        BinOp::Div => Function("div"),
        BinOp::Mod => Function("mod"),
        BinOp::BitAnd => Function("bitAnd"),
        BinOp::BitOr => Function("bitOr"),
        BinOp::BitXor => Function("bitXor"),
        BinOp::Shl => Function("bitShiftLeft"),
        BinOp::Shr => Function("bitShiftRight"),
    }
}

pub fn unary_op(op: UnaryOp) -> OpLowering {
    match op {
        UnaryOp::Not => OpLowering::Native("!"),
        UnaryOp::Neg => OpLowering::Native("-"),
        UnaryOp::BitNot => OpLowering::Function("bitNot"),
    }
}

pub const TERNARY_FUNCTION: &str = "ternary";
pub const INDEX_FUNCTION: &str = "at";
pub const SIZEOF_TYPE_FUNCTION: &str = "sizeof_type";

/// Attributes of the stream handle, lowered to `f(_io)`.
const STREAM_ATTRIBUTES: &[(&str, &str)] = &[
    ("pos", "pos"),
    ("size", "stream_size"),
    ("eof", "isEOF"),
    ("is_eof", "isEOF"),
];

/// Attributes of ordinary values, lowered to `f(receiver)`.
const VALUE_ATTRIBUTES: &[(&str, &str)] = &[
    ("length", "length"),
    ("size", "size"),
    ("to_s", "to_s"),
    ("to_i", "to_i"),
    ("first", "first"),
    ("last", "last"),
    ("min", "min"),
    ("max", "max"),
    ("reverse", "reverse"),
    ("_sizeof", "sizeof_value"),
];

/// Methods called on the stream handle, lowered to `f(_io, args...)`.
const STREAM_METHODS: &[(&str, &str)] = &[
    ("read_u1", "readU1"),
    ("read_s1", "readS1"),
    ("read_u2le", "readU2LE"),
    ("read_u2be", "readU2BE"),
    ("read_u4le", "readU4LE"),
    ("read_u4be", "readU4BE"),
    ("read_u8le", "readU8LE"),
    ("read_u8be", "readU8BE"),
    ("read_s2le", "readS2LE"),
    ("read_s2be", "readS2BE"),
    ("read_s4le", "readS4LE"),
    ("read_s4be", "readS4BE"),
    ("read_s8le", "readS8LE"),
    ("read_s8be", "readS8BE"),
    ("read_f4le", "readF4LE"),
    ("read_f4be", "readF4BE"),
    ("read_f8le", "readF8LE"),
    ("read_f8be", "readF8BE"),
    ("read_bytes", "readBytes"),
    ("read_bytes_full", "readBytesFull"),
    ("read_bytes_term", "readBytesTerm"),
    ("read_bits_int_be", "readBitsIntBE"),
    ("read_bits_int_le", "readBitsIntLE"),
    ("align_to_byte", "alignToByte"),
    ("seek", "seek"),
    ("is_eof", "isEOF"),
    ("write_u1", "writeU1"),
    ("write_s1", "writeS1"),
    ("write_u2le", "writeU2LE"),
    ("write_u2be", "writeU2BE"),
    ("write_u4le", "writeU4LE"),
    ("write_u4be", "writeU4BE"),
    ("write_u8le", "writeU8LE"),
    ("write_u8be", "writeU8BE"),
    ("write_s2le", "writeS2LE"),
    ("write_s2be", "writeS2BE"),
    ("write_s4le", "writeS4LE"),
    ("write_s4be", "writeS4BE"),
    ("write_s8le", "writeS8LE"),
    ("write_s8be", "writeS8BE"),
    ("write_f4le", "writeF4LE"),
    ("write_f4be", "writeF4BE"),
    ("write_f8le", "writeF8LE"),
    ("write_f8be", "writeF8BE"),
    ("write_bytes", "writeBytes"),
];

/// Library functions reachable as `name(args)` or `receiver.name(args)`.
const FUNCTIONS: &[(&str, &str)] = &[
    ("substring", "substring"),
    ("to_s", "bytesToStr"),
    ("to_i", "parseInt"),
    ("process_xor", "processXOR"),
    ("process_rotate_left", "processRotateLeft"),
    ("process_zlib", "processZlib"),
    ("bytes_terminate", "bytesTerminate"),
    ("bytes_strip_right", "bytesStripRight"),
    ("write_bytes_limit", "writeBytesLimit"),
];

fn lookup(table: &'static [(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    table.iter().find(|(from, _)| *from == name).map(|(_, to)| *to)
}

pub fn stream_attribute(name: &str) -> Option<&'static str> {
    lookup(STREAM_ATTRIBUTES, name)
}

pub fn value_attribute(name: &str) -> Option<&'static str> {
    lookup(VALUE_ATTRIBUTES, name)
}

pub fn stream_method(name: &str) -> Option<&'static str> {
    lookup(STREAM_METHODS, name)
}

pub fn function(name: &str) -> Option<&'static str> {
    lookup(FUNCTIONS, name)
}

/// Conversion function for `value.as<ty>()`.
pub fn cast_function(ty: &str) -> Option<&'static str> {
    let base = ty
        .strip_suffix("le")
        .or_else(|| ty.strip_suffix("be"))
        .filter(|base| is_numeric_type(base))
        .unwrap_or(ty);
    match base {
        "s1" | "s2" | "s4" | "s8" | "u1" | "u2" | "u4" | "u8" => Some("to_i"),
        "f4" | "f8" => Some("to_f"),
        "str" | "strz" | "string" => Some("to_s"),
        "bool" => Some("to_b"),
        "bytes" => Some("to_bytes"),
        _ => None,
    }
}

fn is_numeric_type(ty: &str) -> bool {
    matches!(ty, "s1" | "s2" | "s4" | "s8" | "u1" | "u2" | "u4" | "u8" | "f4" | "f8")
}
