//! Tree → text: render a decoded or hand-built item as JSON-family text
//! under one of the three [`Dialect`]s. Ported in shape from the original's
//! `JSON::encode` (`lib/json/Encoder.cpp`): one dispatch per logical type,
//! with the tag wrapper and dialect-specific escape hatches applied before
//! recursing into children.

use crate::alloc::{BlobAllocator, ItemAllocator};
use crate::error::ErrorKind;
use crate::json::dialect::{Dialect, Indent};
use crate::model::{ItemHandle, LogicalType};
use std::fmt::Write as _;

/// Encode `item` and everything beneath it as JSON-family text.
///
/// # Errors
///
/// `Strict` rejects byte strings, tags, non-string map keys, and
/// non-finite floats with [`ErrorKind::UnsupportedDatatype`].
pub fn encode_json<I: ItemAllocator, B: BlobAllocator>(
    item: ItemHandle<'_, I, B>,
    dialect: Dialect,
    indent: Indent,
) -> Result<String, ErrorKind> {
    let mut out = String::new();
    encode_item(item, dialect, indent, 0, &mut out)?;
    Ok(out)
}

fn encode_item<I: ItemAllocator, B: BlobAllocator>(
    item: ItemHandle<'_, I, B>,
    dialect: Dialect,
    indent: Indent,
    depth: usize,
    out: &mut String,
) -> Result<(), ErrorKind> {
    match (dialect, item.tag()) {
        (Dialect::Strict, Some(_)) => Err(ErrorKind::UnsupportedDatatype),
        (Dialect::Extended, Some(tag)) => {
            out.push('<');
            let _ = write!(out, "{tag}");
            out.push(':');
            encode_value(item, dialect, indent, depth, out)?;
            out.push('>');
            Ok(())
        }
        // Compat silently drops the tag and falls through to the value.
        _ => encode_value(item, dialect, indent, depth, out),
    }
}

fn encode_value<I: ItemAllocator, B: BlobAllocator>(
    item: ItemHandle<'_, I, B>,
    dialect: Dialect,
    indent: Indent,
    depth: usize,
    out: &mut String,
) -> Result<(), ErrorKind> {
    match item.logical_type() {
        LogicalType::Integer => {
            let _ = write!(out, "{}", item.as_int().expect("Integer carries Payload::Int"));
            Ok(())
        }
        LogicalType::Float => encode_float(item.as_float().expect("Float carries Payload::Float"), dialect, out),
        LogicalType::Bool => {
            out.push_str(if item.as_bool().expect("Bool carries Payload::Bool") {
                "true"
            } else {
                "false"
            });
            Ok(())
        }
        LogicalType::Null => {
            out.push_str("null");
            Ok(())
        }
        LogicalType::Undefined => {
            out.push_str(if dialect == Dialect::Extended { "undefined" } else { "null" });
            Ok(())
        }
        LogicalType::Text => {
            write_json_string(item.as_text().expect("Text carries Payload::Text"), out);
            Ok(())
        }
        LogicalType::Bytes => encode_bytes(item.as_bytes().expect("Bytes carries Payload::Bytes"), dialect, indent, out),
        LogicalType::Array => encode_array(item, dialect, indent, depth, out),
        LogicalType::Map => encode_map(item, dialect, indent, depth, out),
    }
}

fn encode_float(v: f64, dialect: Dialect, out: &mut String) -> Result<(), ErrorKind> {
    if v.is_finite() {
        // Rust's f64 Display already picks the shortest round-trippable
        // decimal form, never scientific notation - exactly "standard
        // decimal notation". It omits the point for integer-valued floats
        // (`2500.0` -> "2500"), which would re-parse as Integer, so force
        // one back on to keep the logical type distinguishable.
        let start = out.len();
        let _ = write!(out, "{v}");
        if !out[start..].contains(['.', 'e', 'E']) {
            out.push_str(".0");
        }
        return Ok(());
    }
    match dialect {
        Dialect::Strict | Dialect::Compat => Err(ErrorKind::UnsupportedDatatype),
        Dialect::Extended => {
            out.push_str(if v.is_nan() {
                "NaN"
            } else if v.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            });
            Ok(())
        }
    }
}

fn encode_bytes(bytes: &[u8], dialect: Dialect, indent: Indent, out: &mut String) -> Result<(), ErrorKind> {
    match dialect {
        Dialect::Strict => Err(ErrorKind::UnsupportedDatatype),
        Dialect::Extended => {
            out.push_str("0x");
            for b in bytes {
                let _ = write!(out, "{b:02x}");
            }
            Ok(())
        }
        // Nonstandard JSON by design: bare 0xNN tokens, not quoted strings.
        // This only needs to stay parseable, never strictly conformant.
        Dialect::Compat => {
            out.push('[');
            for (i, b) in bytes.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                    if !matches!(indent, Indent::Compact) {
                        out.push(' ');
                    }
                }
                let _ = write!(out, "0x{b:02x}");
            }
            out.push(']');
            Ok(())
        }
    }
}

fn encode_array<I: ItemAllocator, B: BlobAllocator>(
    item: ItemHandle<'_, I, B>,
    dialect: Dialect,
    indent: Indent,
    depth: usize,
    out: &mut String,
) -> Result<(), ErrorKind> {
    if item.is_empty() {
        out.push_str("[]");
        return Ok(());
    }
    out.push('[');
    for (i, child) in item.children().enumerate() {
        if i > 0 {
            out.push(',');
        }
        newline_indent(indent, depth + 1, out);
        encode_item(child, dialect, indent, depth + 1, out)?;
    }
    newline_indent(indent, depth, out);
    out.push(']');
    Ok(())
}

fn encode_map<I: ItemAllocator, B: BlobAllocator>(
    item: ItemHandle<'_, I, B>,
    dialect: Dialect,
    indent: Indent,
    depth: usize,
    out: &mut String,
) -> Result<(), ErrorKind> {
    if item.is_empty() {
        out.push_str("{}");
        return Ok(());
    }
    out.push('{');
    for (i, (key, value)) in item.entries().enumerate() {
        if i > 0 {
            out.push(',');
        }
        newline_indent(indent, depth + 1, out);
        encode_key(key, dialect, out)?;
        out.push(':');
        if !matches!(indent, Indent::Compact) {
            out.push(' ');
        }
        encode_item(value, dialect, indent, depth + 1, out)?;
    }
    newline_indent(indent, depth, out);
    out.push('}');
    Ok(())
}

fn encode_key<I: ItemAllocator, B: BlobAllocator>(
    key: ItemHandle<'_, I, B>,
    dialect: Dialect,
    out: &mut String,
) -> Result<(), ErrorKind> {
    match key.logical_type() {
        LogicalType::Text => {
            write_json_string(key.as_text().expect("Text carries Payload::Text"), out);
            Ok(())
        }
        LogicalType::Integer if dialect != Dialect::Strict => {
            let _ = write!(out, "{}", key.as_int().expect("Integer carries Payload::Int"));
            Ok(())
        }
        _ => Err(ErrorKind::UnsupportedDatatype),
    }
}

fn newline_indent(indent: Indent, depth: usize, out: &mut String) {
    if let Indent::Spaces(n) = indent {
        out.push('\n');
        for _ in 0..(n as usize * depth) {
            out.push(' ');
        }
    }
}

fn write_json_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DynamicModel, LogicalType, Payload};

    #[test]
    fn strict_rejects_byte_string() {
        let mut model = DynamicModel::new_dynamic();
        {
            let mut root = model.build_root_array().unwrap();
            root.push_bytes(&[1, 2]).unwrap();
        }
        let err = encode_json(model.root().unwrap(), Dialect::Strict, Indent::Compact).unwrap_err();
        assert_eq!(err, ErrorKind::UnsupportedDatatype);
    }

    #[test]
    fn compat_renders_bytes_as_bare_hex_array() {
        let mut model = DynamicModel::new_dynamic();
        {
            let mut root = model.build_root_array().unwrap();
            root.push_bytes(&[0x12, 0x34]).unwrap();
        }
        let json = encode_json(model.root().unwrap(), Dialect::Compat, Indent::Compact).unwrap();
        assert_eq!(json, "[[0x12,0x34]]");
    }

    #[test]
    fn integer_valued_float_keeps_a_fractional_marker() {
        let mut model = DynamicModel::new_dynamic();
        {
            let mut root = model.build_root_array().unwrap();
            root.add_child(LogicalType::Float, Payload::Float(2500.0)).unwrap();
        }
        let json = encode_json(model.root().unwrap(), Dialect::Extended, Indent::Compact).unwrap();
        assert_eq!(json, "[2500.0]");
    }

    #[test]
    fn extended_renders_bytes_as_single_hex_token() {
        let mut model = DynamicModel::new_dynamic();
        {
            let mut root = model.build_root_array().unwrap();
            root.push_bytes(&[0x12, 0x34]).unwrap();
        }
        let root = model.root().unwrap();
        let child = root.children().next().unwrap();
        let json = encode_json(child, Dialect::Extended, Indent::Compact).unwrap();
        assert_eq!(json, "0x1234");
    }

    #[test]
    fn extended_wraps_tag() {
        let mut model = DynamicModel::new_dynamic();
        let idx = model.build_root_scalar(LogicalType::Integer, Payload::Int(23)).unwrap();
        model.item_mut(idx).set_tag(0).unwrap();
        let json = encode_json(model.root().unwrap(), Dialect::Extended, Indent::Compact).unwrap();
        assert_eq!(json, "<0:23>");
    }

    #[test]
    fn compat_drops_tag() {
        let mut model = DynamicModel::new_dynamic();
        let idx = model.build_root_scalar(LogicalType::Integer, Payload::Int(23)).unwrap();
        model.item_mut(idx).set_tag(0).unwrap();
        let json = encode_json(model.root().unwrap(), Dialect::Compat, Indent::Compact).unwrap();
        assert_eq!(json, "23");
    }

    #[test]
    fn strict_rejects_non_string_key() {
        let mut model = DynamicModel::new_dynamic();
        {
            let mut root = model.build_root_map().unwrap();
            root.push_int_entry(1, 2).unwrap();
        }
        let err = encode_json(model.root().unwrap(), Dialect::Strict, Indent::Compact).unwrap_err();
        assert_eq!(err, ErrorKind::UnsupportedDatatype);
    }

    #[test]
    fn extended_permits_integer_key() {
        let mut model = DynamicModel::new_dynamic();
        {
            let mut root = model.build_root_map().unwrap();
            root.push_int_entry(1, 2).unwrap();
        }
        let json = encode_json(model.root().unwrap(), Dialect::Extended, Indent::Compact).unwrap();
        assert_eq!(json, "{1:2}");
    }

    #[test]
    fn indented_output_uses_two_space_nesting() {
        let mut model = DynamicModel::new_dynamic();
        {
            let mut root = model.build_root_array().unwrap();
            root.push_int(1).unwrap();
            root.push_int(2).unwrap();
        }
        let json = encode_json(model.root().unwrap(), Dialect::Extended, Indent::Spaces(2)).unwrap();
        assert_eq!(json, "[\n  1,\n  2\n]");
    }

    #[test]
    fn empty_containers_have_no_inner_whitespace() {
        let mut model = DynamicModel::new_dynamic();
        model.build_root_array().unwrap();
        let json = encode_json(model.root().unwrap(), Dialect::Extended, Indent::Spaces(2)).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn string_escapes_control_characters() {
        let mut model = DynamicModel::new_dynamic();
        model.build_root_array().unwrap().push_text("a\nb\"\\c").unwrap();
        let json = encode_json(model.root().unwrap(), Dialect::Extended, Indent::Compact).unwrap();
        assert_eq!(json, "[\"a\\nb\\\"\\\\c\"]");
    }

    #[test]
    fn undefined_renders_null_outside_extended() {
        let mut model = DynamicModel::new_dynamic();
        model.build_root_array().unwrap().push_undefined().unwrap();
        let compat = encode_json(model.root().unwrap(), Dialect::Compat, Indent::Compact).unwrap();
        assert_eq!(compat, "[null]");
        let extended = encode_json(model.root().unwrap(), Dialect::Extended, Indent::Compact).unwrap();
        assert_eq!(extended, "[undefined]");
    }
}
