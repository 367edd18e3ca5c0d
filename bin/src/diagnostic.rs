//! RFC 8949 §8 diagnostic notation: `inspect`'s output format. Distinct from
//! [`cbor_tree::json`] because diagnostic notation is not JSON — byte
//! strings render as `h'...'` and tags as `TAG(value)`, neither of which has
//! a `Strict`-JSON-safe spelling.

use cbor_tree::alloc::{BlobAllocator, ItemAllocator};
use cbor_tree::model::{ItemHandle, LogicalType};
use std::fmt::Write as _;

pub fn diagnostic<I: ItemAllocator, B: BlobAllocator>(item: ItemHandle<'_, I, B>) -> String {
    let mut out = String::new();
    write_item(item, &mut out);
    out
}

fn write_item<I: ItemAllocator, B: BlobAllocator>(item: ItemHandle<'_, I, B>, out: &mut String) {
    if let Some(tag) = item.tag() {
        let _ = write!(out, "{tag}(");
        write_value(item, out);
        out.push(')');
    } else {
        write_value(item, out);
    }
}

fn write_value<I: ItemAllocator, B: BlobAllocator>(item: ItemHandle<'_, I, B>, out: &mut String) {
    match item.logical_type() {
        LogicalType::Integer => {
            let _ = write!(out, "{}", item.as_int().expect("Integer carries Payload::Int"));
        }
        LogicalType::Float => {
            let v = item.as_float().expect("Float carries Payload::Float");
            if v.is_nan() {
                out.push_str("NaN");
            } else if v.is_infinite() {
                out.push_str(if v.is_sign_positive() { "Infinity" } else { "-Infinity" });
            } else {
                let _ = write!(out, "{v}");
            }
        }
        LogicalType::Bool => out.push_str(if item.as_bool().expect("Bool carries Payload::Bool") {
            "true"
        } else {
            "false"
        }),
        LogicalType::Null => out.push_str("null"),
        LogicalType::Undefined => out.push_str("undefined"),
        LogicalType::Text => {
            out.push('"');
            for c in item.as_text().expect("Text carries Payload::Text").chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    c => out.push(c),
                }
            }
            out.push('"');
        }
        LogicalType::Bytes => {
            out.push_str("h'");
            for b in item.as_bytes().expect("Bytes carries Payload::Bytes") {
                let _ = write!(out, "{b:02x}");
            }
            out.push('\'');
        }
        LogicalType::Array => {
            out.push('[');
            for (i, child) in item.children().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_item(child, out);
            }
            out.push(']');
        }
        LogicalType::Map => {
            out.push('{');
            for (i, (key, value)) in item.entries().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_item(key, out);
                out.push_str(": ");
                write_item(value, out);
            }
            out.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbor_tree::model::{DynamicModel, Payload};

    #[test]
    fn renders_tagged_integer() {
        let mut model = DynamicModel::new_dynamic();
        let idx = model.build_root_scalar(LogicalType::Integer, Payload::Int(23)).unwrap();
        model.item_mut(idx).set_tag(0).unwrap();
        assert_eq!(diagnostic(model.root().unwrap()), "0(23)");
    }

    #[test]
    fn renders_byte_string_as_hex_literal() {
        let mut model = DynamicModel::new_dynamic();
        model.build_root_array().unwrap().push_bytes(&[0x12, 0x34]).unwrap();
        assert_eq!(diagnostic(model.root().unwrap()), "[h'1234']");
    }

    #[test]
    fn renders_map_with_spacing() {
        let mut model = DynamicModel::new_dynamic();
        model.build_root_map().unwrap().push_int_entry(1, 2).unwrap();
        assert_eq!(diagnostic(model.root().unwrap()), "{1: 2}");
    }
}
