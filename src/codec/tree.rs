//! Materialising codec: decodes a whole CBOR message into an allocator-backed
//! [`DataModel`] tree, or walks a tree back out to bytes. Built entirely on
//! top of [`crate::codec::header`] — a single-item decode or encode never
//! touches an initial byte directly.

use crate::alloc::{BlobAllocator, ItemAllocator, ItemIndex};
use crate::buffer::{Endian, InputBuffer, OutputBuffer, SliceInput};
use crate::codec::header::{decode_header, encode_header};
use crate::error::{CborError, ErrorKind};
use crate::model::{DataModel, Item, ItemHandle, LogicalType, Payload, Tag};
use crate::wire::{ArgForm, FloatWidth, InitByte, MajorType, SimpleCode};
use half::f16;

/// Decode `input` into a single tree, rooted at the returned index and also
/// recorded as `model`'s root. `model` is cleared of any prior content
/// first is the caller's responsibility, not this function's — decoding
/// into a non-empty model appends a second, disconnected root elsewhere in
/// the arena and simply overwrites which one `model.root()` reports.
pub fn decode_tree<'input, I: ItemAllocator, B: BlobAllocator>(
    model: &mut DataModel<'input, I, B>,
    input: &'input [u8],
) -> Result<ItemIndex, CborError> {
    model.set_source(input);
    let mut cursor = SliceInput::new(input);
    let root =
        decode_item(model, &mut cursor).map_err(|kind| CborError::new(cursor.position(), kind))?;
    model.set_root(root);
    Ok(root)
}

fn decode_item<'input, I: ItemAllocator, B: BlobAllocator>(
    model: &mut DataModel<'input, I, B>,
    cursor: &mut SliceInput<'input>,
) -> Result<ItemIndex, ErrorKind> {
    let header = decode_header(cursor)?;
    match header.major {
        MajorType::UnsignedInt => {
            let value = header.argument as i64;
            model.alloc_item(Item::new(LogicalType::Integer, Tag::NONE, Payload::Int(value)))
        }
        MajorType::NegativeInt => {
            // RFC 8949 §3.1: the encoded value is -1 minus the argument.
            let value = -(header.argument as i128) - 1;
            model.alloc_item(Item::new(
                LogicalType::Integer,
                Tag::NONE,
                Payload::Int(value as i64),
            ))
        }
        MajorType::ByteString => {
            let len = header.argument as usize;
            let start = cursor.position();
            let bytes = cursor.read_slice(len)?;
            let blob = model
                .blobs_mut()
                .alloc_for_decode(bytes, start..start + len)
                .ok_or(ErrorKind::BlobAllocFailed)?;
            model.alloc_item(Item::new(LogicalType::Bytes, Tag::NONE, Payload::Bytes(blob)))
        }
        MajorType::TextString => {
            let len = header.argument as usize;
            let start = cursor.position();
            let bytes = cursor.read_slice(len)?;
            std::str::from_utf8(bytes).map_err(|_| ErrorKind::MalformedMessage)?;
            let blob = model
                .blobs_mut()
                .alloc_for_decode(bytes, start..start + len)
                .ok_or(ErrorKind::BlobAllocFailed)?;
            model.alloc_item(Item::new(LogicalType::Text, Tag::NONE, Payload::Text(blob)))
        }
        MajorType::Array => {
            let len = header.argument as usize;
            let container = model.alloc_item(Item::new(
                LogicalType::Array,
                Tag::NONE,
                Payload::empty_container(),
            ))?;
            for _ in 0..len {
                let child = decode_item(model, cursor)?;
                model.link_as_child(container, None, child);
            }
            Ok(container)
        }
        MajorType::Map => {
            let len = header.argument as usize;
            let container = model.alloc_item(Item::new(
                LogicalType::Map,
                Tag::NONE,
                Payload::empty_container(),
            ))?;
            for _ in 0..len {
                let key = decode_item(model, cursor)?;
                if !matches!(
                    model.item(key).logical_type(),
                    LogicalType::Integer | LogicalType::Text
                ) {
                    return Err(ErrorKind::UnsupportedKeyType);
                }
                model.set_key_parent(key, container);
                let value = decode_item(model, cursor)?;
                model.link_as_child(container, Some(key), value);
            }
            Ok(container)
        }
        MajorType::Tagged => {
            let tag = header.argument;
            // The tagged item reuses the inner item's index rather than
            // allocating a wrapper: a second, nested tag header landing on
            // the same inner item (`6(7(value))`) then fails `set_tag`'s
            // already-tagged check with `DoubleTagged`, since this engine
            // has no way to represent more than one tag per item.
            let inner = decode_item(model, cursor)?;
            model.item_mut(inner).set_tag(tag)?;
            Ok(inner)
        }
        MajorType::FloatOrSimple => decode_float_or_simple(model, header.arg_form, header.argument),
    }
}

fn decode_float_or_simple<'input, I: ItemAllocator, B: BlobAllocator>(
    model: &mut DataModel<'input, I, B>,
    arg_form: ArgForm,
    argument: u64,
) -> Result<ItemIndex, ErrorKind> {
    let (logical_type, payload) = match arg_form {
        ArgForm::Inline(v) => match SimpleCode::from_remainder(v) {
            Some(SimpleCode::True) => (LogicalType::Bool, Payload::Bool(true)),
            Some(SimpleCode::False) => (LogicalType::Bool, Payload::Bool(false)),
            Some(SimpleCode::Null) => (LogicalType::Null, Payload::Null),
            Some(SimpleCode::Undefined) => (LogicalType::Undefined, Payload::Undefined),
            None => return Err(ErrorKind::UnsupportedSimple),
        },
        // the one-byte "simple value, extended" form (remainder 24) is not
        // one of the four simple values this engine recognises.
        ArgForm::Next1 => return Err(ErrorKind::UnsupportedSimple),
        ArgForm::Next2 => (
            LogicalType::Float,
            Payload::Float(f16::from_bits(argument as u16).to_f64()),
        ),
        ArgForm::Next4 => (
            LogicalType::Float,
            Payload::Float(f32::from_bits(argument as u32) as f64),
        ),
        ArgForm::Next8 => (LogicalType::Float, Payload::Float(f64::from_bits(argument))),
        ArgForm::Reserved => return Err(ErrorKind::MalformedMessage),
    };
    model.alloc_item(Item::new(logical_type, Tag::NONE, payload))
}

/// Encode `item` and everything beneath it. Pure read access through
/// [`ItemHandle`] — encoding never reaches into a [`DataModel`]'s internals,
/// so it works identically regardless of which allocator pair produced the
/// tree.
pub fn encode_tree<I: ItemAllocator, B: BlobAllocator>(
    output: &mut impl OutputBuffer,
    item: ItemHandle<'_, I, B>,
) -> Result<(), ErrorKind> {
    if let Some(tag) = item.tag() {
        encode_header(output, MajorType::Tagged, tag)?;
    }
    match item.logical_type() {
        LogicalType::Integer => {
            let v = item.as_int().expect("Integer item always carries Payload::Int");
            if v >= 0 {
                encode_header(output, MajorType::UnsignedInt, v as u64)
            } else {
                encode_header(output, MajorType::NegativeInt, (-1 - v) as u64)
            }
        }
        LogicalType::Float => {
            let v = item.as_float().expect("Float item always carries Payload::Float");
            encode_float(output, v)
        }
        LogicalType::Bool => {
            let v = item.as_bool().expect("Bool item always carries Payload::Bool");
            let code = if v { SimpleCode::True } else { SimpleCode::False };
            output.write_u8(InitByte::pack(MajorType::FloatOrSimple, code as u8))
        }
        LogicalType::Null => output.write_u8(InitByte::pack(MajorType::FloatOrSimple, SimpleCode::Null as u8)),
        LogicalType::Undefined => {
            output.write_u8(InitByte::pack(MajorType::FloatOrSimple, SimpleCode::Undefined as u8))
        }
        LogicalType::Bytes => {
            let bytes = item.as_bytes().expect("Bytes item always carries Payload::Bytes");
            encode_header(output, MajorType::ByteString, bytes.len() as u64)?;
            output.write_slice(bytes, Endian::Native)
        }
        LogicalType::Text => {
            let text = item.as_text().expect("Text item always carries Payload::Text");
            encode_header(output, MajorType::TextString, text.len() as u64)?;
            output.write_slice(text.as_bytes(), Endian::Native)
        }
        LogicalType::Array => {
            encode_header(output, MajorType::Array, item.len().unwrap_or(0) as u64)?;
            for child in item.children() {
                encode_tree(output, child)?;
            }
            Ok(())
        }
        LogicalType::Map => {
            encode_header(output, MajorType::Map, item.len().unwrap_or(0) as u64)?;
            for (key, value) in item.entries() {
                encode_tree(output, key)?;
                encode_tree(output, value)?;
            }
            Ok(())
        }
    }
}

/// Pick the narrowest of the three IEEE-754 widths that represents `v`
/// exactly, per RFC 8949 §4.2's preferred serialization for floats.
fn encode_float(output: &mut impl OutputBuffer, v: f64) -> Result<(), ErrorKind> {
    if v.is_nan() {
        output.write_u8(InitByte::pack(MajorType::FloatOrSimple, FloatWidth::Half as u8))?;
        return output.write_u16(0x7e00, Endian::Big);
    }
    let half = f16::from_f64(v);
    if half.to_f64() == v {
        output.write_u8(InitByte::pack(MajorType::FloatOrSimple, FloatWidth::Half as u8))?;
        return output.write_u16(half.to_bits(), Endian::Big);
    }
    let single = v as f32;
    if f64::from(single) == v {
        output.write_u8(InitByte::pack(MajorType::FloatOrSimple, FloatWidth::Single as u8))?;
        return output.write_u32(single.to_bits(), Endian::Big);
    }
    output.write_u8(InitByte::pack(MajorType::FloatOrSimple, FloatWidth::Double as u8))?;
    output.write_u64(v.to_bits(), Endian::Big)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::VecOutput;
    use crate::model::DynamicModel;

    fn encode(model: &DynamicModel<'_>, root: ItemIndex) -> Vec<u8> {
        let mut out = VecOutput::new();
        encode_tree(&mut out, model.item(root)).unwrap();
        out.into_vec()
    }

    #[test]
    fn decodes_nested_array_byte_exact_fixture() {
        // [1, [2, 3], [4, 5]]
        let bytes = [0x83, 0x01, 0x82, 0x02, 0x03, 0x82, 0x04, 0x05];
        let mut model = DynamicModel::new_dynamic();
        let root = decode_tree(&mut model, &bytes).unwrap();
        let root = model.item(root);
        assert_eq!(root.len(), Some(3));
        let mut it = root.children();
        assert_eq!(it.next().unwrap().as_int(), Some(1));
        let second = it.next().unwrap();
        assert_eq!(second.len(), Some(2));
        assert_eq!(encode(&model, root.index()), bytes);
    }

    #[test]
    fn decodes_small_array_of_one() {
        let bytes = [0x81, 0x01];
        let mut model = DynamicModel::new_dynamic();
        let root = decode_tree(&mut model, &bytes).unwrap();
        assert_eq!(model.item(root).children().next().unwrap().as_int(), Some(1));
    }

    #[test]
    fn encodes_multi_byte_unsigned() {
        let mut model = DynamicModel::new_dynamic();
        let idx = model.build_root_scalar(LogicalType::Integer, Payload::Int(2345)).unwrap();
        assert_eq!(encode(&model, idx), vec![0x19, 0x09, 0x29]);
    }

    #[test]
    fn decodes_byte_string() {
        let bytes = [0x45, 0x12, 0x34, 0x56, 0x78, 0x90];
        let mut model = DynamicModel::new_dynamic();
        let root = decode_tree(&mut model, &bytes).unwrap();
        assert_eq!(model.item(root).as_bytes(), Some(&[0x12, 0x34, 0x56, 0x78, 0x90][..]));
        assert_eq!(encode(&model, root), bytes);
    }

    #[test]
    fn decodes_text_string() {
        let bytes = [0x6B, b'H', b'e', b'l', b'l', b'o', b',', b' ', b'w', b'o', b'r', b'l'];
        let mut model = DynamicModel::new_dynamic();
        let root = decode_tree(&mut model, &bytes).unwrap();
        assert_eq!(model.item(root).as_text(), Some("Hello, worl"));
    }

    #[test]
    fn decodes_tagged_integer() {
        let bytes = [0xC0, 0x17];
        let mut model = DynamicModel::new_dynamic();
        let root = decode_tree(&mut model, &bytes).unwrap();
        let item = model.item(root);
        assert_eq!(item.tag(), Some(0));
        assert_eq!(item.as_int(), Some(23));
    }

    #[test]
    fn double_tag_surfaces_as_error() {
        // tag 7 wrapping tag 6 wrapping the integer 1: 0xC7 0xC6 0x01
        let bytes = [0xC7, 0xC6, 0x01];
        let mut model = DynamicModel::new_dynamic();
        let err = decode_tree(&mut model, &bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DoubleTagged);
    }

    #[test]
    fn rejects_non_integer_non_text_map_key() {
        // {true: 1}: 0xA1 0xF5 0x01
        let bytes = [0xA1, 0xF5, 0x01];
        let mut model = DynamicModel::new_dynamic();
        let err = decode_tree(&mut model, &bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedKeyType);
    }

    #[test]
    fn encodes_bool_using_correct_simple_codes() {
        let mut model = DynamicModel::new_dynamic();
        let t = model.build_root_scalar(LogicalType::Bool, Payload::Bool(true)).unwrap();
        assert_eq!(encode(&model, t), vec![0xF5]);
        let mut model = DynamicModel::new_dynamic();
        let f = model.build_root_scalar(LogicalType::Bool, Payload::Bool(false)).unwrap();
        assert_eq!(encode(&model, f), vec![0xF4]);
    }

    #[test]
    fn zero_encodes_as_unsigned_not_negative() {
        let mut model = DynamicModel::new_dynamic();
        let z = model.build_root_scalar(LogicalType::Integer, Payload::Int(0)).unwrap();
        assert_eq!(encode(&model, z), vec![0x00]);
    }

    #[test]
    fn float_picks_narrowest_exact_width() {
        let mut model = DynamicModel::new_dynamic();
        let half = model.build_root_scalar(LogicalType::Float, Payload::Float(1.5)).unwrap();
        assert_eq!(encode(&model, half)[0] & 0x1f, 25);
        let mut model = DynamicModel::new_dynamic();
        let double = model
            .build_root_scalar(LogicalType::Float, Payload::Float(1.1))
            .unwrap();
        assert_eq!(encode(&model, double)[0] & 0x1f, 27);
    }

    #[test]
    fn allocator_exhaustion_surfaces_item_alloc_failed() {
        use crate::model::StaticModel;
        let bytes = [0x82, 0x01, 0x02];
        let mut model = StaticModel::new_static(2, 0);
        let err = decode_tree(&mut model, &bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ItemAllocFailed);
    }
}
