//! Text → tree: parse JSON-family text into an allocator-backed [`DataModel`],
//! the inverse of [`crate::json::encode`]. A plain recursive-descent parser
//! over `&str` — this engine has no streaming JSON reader, so the whole
//! document is parsed in one pass and the input must already be valid UTF-8.
//!
//! This direction has no counterpart in the original: its `JSON` namespace
//! only ever renders a tree to text, never the reverse. The grammar below
//! mirrors [`crate::json::encode`]'s output one dialect at a time rather than
//! following any prior implementation.

use crate::alloc::{ItemAllocator, ItemIndex, OwningBlobAllocator};
use crate::error::{CborError, ErrorKind};
use crate::json::dialect::Dialect;
use crate::model::{DataModel, LogicalType, Payload};

/// Parse `text` as `dialect` into `model`, replacing whatever root it had.
pub fn parse_json<I: ItemAllocator, B: OwningBlobAllocator>(
    model: &mut DataModel<'_, I, B>,
    text: &str,
    dialect: Dialect,
) -> Result<ItemIndex, CborError> {
    let mut parser = Parser {
        bytes: text.as_bytes(),
        pos: 0,
        dialect,
    };
    let root = parser
        .parse_root(model)
        .map_err(|kind| CborError::new(parser.pos, kind))?;
    parser.skip_ws();
    if parser.pos != parser.bytes.len() {
        return Err(CborError::new(parser.pos, ErrorKind::MalformedMessage));
    }
    model.set_root(root);
    Ok(root)
}

struct Parser<'t> {
    bytes: &'t [u8],
    pos: usize,
    dialect: Dialect,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn expect_byte(&mut self, b: u8) -> Result<(), ErrorKind> {
        self.skip_ws();
        if self.bump() == Some(b) {
            Ok(())
        } else {
            Err(ErrorKind::MalformedMessage)
        }
    }

    fn expect_literal(&mut self, lit: &str) -> Result<(), ErrorKind> {
        if self.bytes[self.pos..].starts_with(lit.as_bytes()) {
            self.pos += lit.len();
            Ok(())
        } else {
            Err(ErrorKind::MalformedMessage)
        }
    }

    /// Parse the document's single top-level value directly into `model`'s
    /// root, since [`DataModel`] has no concept of a detached, unrooted item
    /// for the root position the way [`crate::model::ItemHandleMut`] does
    /// for nested children.
    fn parse_root<I: ItemAllocator, B: OwningBlobAllocator>(
        &mut self,
        model: &mut DataModel<'_, I, B>,
    ) -> Result<ItemIndex, ErrorKind> {
        self.skip_ws();
        match self.peek() {
            Some(b'[') => {
                let mut root = model.build_root_array()?;
                self.parse_array_elements(&mut root)?;
                Ok(root.index())
            }
            Some(b'{') => {
                let mut root = model.build_root_map()?;
                self.parse_object_members(&mut root)?;
                Ok(root.index())
            }
            Some(b'<') if self.dialect == Dialect::Extended => {
                self.bump();
                let tag = self.parse_tag_number()?;
                self.expect_byte(b':')?;
                let inner = self.parse_root(model)?;
                model.item_mut(inner).set_tag(tag)?;
                self.expect_byte(b'>')?;
                Ok(inner)
            }
            Some(b'"') => {
                let text = self.parse_string()?;
                let blob = model
                    .blobs_mut()
                    .alloc_copy(text.as_bytes())
                    .ok_or(ErrorKind::BlobAllocFailed)?;
                model.build_root_scalar(LogicalType::Text, Payload::Text(blob))
            }
            Some(b't') => {
                self.expect_literal("true")?;
                model.build_root_scalar(LogicalType::Bool, Payload::Bool(true))
            }
            Some(b'f') => {
                self.expect_literal("false")?;
                model.build_root_scalar(LogicalType::Bool, Payload::Bool(false))
            }
            Some(b'n') => {
                self.expect_literal("null")?;
                model.build_root_scalar(LogicalType::Null, Payload::Null)
            }
            Some(b'u') if self.dialect == Dialect::Extended => {
                self.expect_literal("undefined")?;
                model.build_root_scalar(LogicalType::Undefined, Payload::Undefined)
            }
            Some(b'0') if self.dialect == Dialect::Extended && self.looks_like_hex_prefix() => {
                let bytes = self.parse_hex_token()?;
                let blob = model
                    .blobs_mut()
                    .alloc_copy(&bytes)
                    .ok_or(ErrorKind::BlobAllocFailed)?;
                model.build_root_scalar(LogicalType::Bytes, Payload::Bytes(blob))
            }
            Some(b'-' | b'0'..=b'9' | b'N' | b'I') => {
                let (logical_type, payload) = self.parse_number()?;
                model.build_root_scalar(logical_type, payload)
            }
            _ => Err(ErrorKind::MalformedMessage),
        }
    }

    /// Parse a value nested under an already-allocated container, appending
    /// it as `parent`'s next child (optionally under `key`, for map values).
    fn parse_value<I: ItemAllocator, B: OwningBlobAllocator>(
        &mut self,
        parent: &mut crate::model::ItemHandleMut<'_, '_, I, B>,
        key: Option<ItemIndex>,
    ) -> Result<ItemIndex, ErrorKind> {
        self.skip_ws();
        match self.peek() {
            Some(b'[') if self.dialect == Dialect::Compat && self.looks_like_compat_byte_array() => {
                let bytes = self.parse_compat_byte_tokens()?;
                let blob = parent.alloc_blob(&bytes)?;
                parent.push_value(key, LogicalType::Bytes, Payload::Bytes(blob))
            }
            Some(b'[') => {
                let idx = parent.push_value(key, LogicalType::Array, Payload::empty_container())?;
                let mut child = parent.child_mut(idx);
                self.parse_array_elements(&mut child)?;
                Ok(idx)
            }
            Some(b'{') => {
                let idx = parent.push_value(key, LogicalType::Map, Payload::empty_container())?;
                let mut child = parent.child_mut(idx);
                self.parse_object_members(&mut child)?;
                Ok(idx)
            }
            Some(b'<') if self.dialect == Dialect::Extended => {
                self.bump();
                let tag = self.parse_tag_number()?;
                self.expect_byte(b':')?;
                let idx = self.parse_value(parent, key)?;
                parent.child_mut(idx).set_tag(tag)?;
                self.expect_byte(b'>')?;
                Ok(idx)
            }
            Some(b'"') => {
                let text = self.parse_string()?;
                let blob = parent.alloc_blob(text.as_bytes())?;
                parent.push_value(key, LogicalType::Text, Payload::Text(blob))
            }
            Some(b't') => {
                self.expect_literal("true")?;
                parent.push_value(key, LogicalType::Bool, Payload::Bool(true))
            }
            Some(b'f') => {
                self.expect_literal("false")?;
                parent.push_value(key, LogicalType::Bool, Payload::Bool(false))
            }
            Some(b'n') => {
                self.expect_literal("null")?;
                parent.push_value(key, LogicalType::Null, Payload::Null)
            }
            Some(b'u') if self.dialect == Dialect::Extended => {
                self.expect_literal("undefined")?;
                parent.push_value(key, LogicalType::Undefined, Payload::Undefined)
            }
            Some(b'0') if self.dialect == Dialect::Extended && self.looks_like_hex_prefix() => {
                let bytes = self.parse_hex_token()?;
                let blob = parent.alloc_blob(&bytes)?;
                parent.push_value(key, LogicalType::Bytes, Payload::Bytes(blob))
            }
            Some(b'-' | b'0'..=b'9' | b'N' | b'I') => {
                let (logical_type, payload) = self.parse_number()?;
                parent.push_value(key, logical_type, payload)
            }
            _ => Err(ErrorKind::MalformedMessage),
        }
    }

    fn parse_array_elements<I: ItemAllocator, B: OwningBlobAllocator>(
        &mut self,
        array: &mut crate::model::ItemHandleMut<'_, '_, I, B>,
    ) -> Result<(), ErrorKind> {
        self.expect_byte(b'[')?;
        self.skip_ws();
        if self.peek() == Some(b']') {
            self.bump();
            return Ok(());
        }
        loop {
            self.parse_value(array, None)?;
            self.skip_ws();
            match self.bump() {
                Some(b',') => continue,
                Some(b']') => return Ok(()),
                _ => return Err(ErrorKind::MalformedMessage),
            }
        }
    }

    fn parse_object_members<I: ItemAllocator, B: OwningBlobAllocator>(
        &mut self,
        map: &mut crate::model::ItemHandleMut<'_, '_, I, B>,
    ) -> Result<(), ErrorKind> {
        self.expect_byte(b'{')?;
        self.skip_ws();
        if self.peek() == Some(b'}') {
            self.bump();
            return Ok(());
        }
        loop {
            let key = self.parse_key(map)?;
            self.expect_byte(b':')?;
            self.parse_value(map, Some(key))?;
            self.skip_ws();
            match self.bump() {
                Some(b',') => continue,
                Some(b'}') => return Ok(()),
                _ => return Err(ErrorKind::MalformedMessage),
            }
        }
    }

    /// A map key: a JSON string everywhere, or (outside `Strict`) a bare
    /// integer literal, matching what [`crate::json::encode::encode_key`]
    /// is willing to produce.
    fn parse_key<I: ItemAllocator, B: OwningBlobAllocator>(
        &mut self,
        map: &mut crate::model::ItemHandleMut<'_, '_, I, B>,
    ) -> Result<ItemIndex, ErrorKind> {
        self.skip_ws();
        match self.peek() {
            Some(b'"') => {
                let text = self.parse_string()?;
                map.alloc_text_key(&text)
            }
            Some(b'-' | b'0'..=b'9') if self.dialect != Dialect::Strict => {
                let (logical_type, payload) = self.parse_number()?;
                if logical_type != LogicalType::Integer {
                    return Err(ErrorKind::UnsupportedKeyType);
                }
                let Payload::Int(v) = payload else {
                    return Err(ErrorKind::UnsupportedKeyType);
                };
                map.alloc_int_key(v)
            }
            _ => Err(ErrorKind::UnsupportedKeyType),
        }
    }

    fn parse_string(&mut self) -> Result<String, ErrorKind> {
        self.skip_ws();
        if self.bump() != Some(b'"') {
            return Err(ErrorKind::MalformedMessage);
        }
        let mut out = String::new();
        loop {
            match self.bump().ok_or(ErrorKind::MalformedMessage)? {
                b'"' => return Ok(out),
                b'\\' => match self.bump().ok_or(ErrorKind::MalformedMessage)? {
                    b'"' => out.push('"'),
                    b'\\' => out.push('\\'),
                    b'/' => out.push('/'),
                    b'n' => out.push('\n'),
                    b't' => out.push('\t'),
                    b'r' => out.push('\r'),
                    b'b' => out.push('\u{8}'),
                    b'f' => out.push('\u{c}'),
                    b'u' => {
                        let cp = self.parse_unicode_escape()?;
                        out.push(cp);
                    }
                    _ => return Err(ErrorKind::MalformedMessage),
                },
                b => {
                    // re-walk UTF-8 continuation bytes as part of this
                    // codepoint rather than one byte at a time.
                    let start = self.pos - 1;
                    let width = utf8_width(b)?;
                    self.pos = start + width;
                    let s = std::str::from_utf8(&self.bytes[start..self.pos])
                        .map_err(|_| ErrorKind::MalformedMessage)?;
                    out.push_str(s);
                }
            }
        }
    }

    fn parse_unicode_escape(&mut self) -> Result<char, ErrorKind> {
        let high = self.parse_hex4()?;
        if (0xD800..=0xDBFF).contains(&high) {
            if self.bump() != Some(b'\\') || self.bump() != Some(b'u') {
                return Err(ErrorKind::MalformedMessage);
            }
            let low = self.parse_hex4()?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(ErrorKind::MalformedMessage);
            }
            let cp = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            char::from_u32(cp).ok_or(ErrorKind::MalformedMessage)
        } else {
            char::from_u32(high).ok_or(ErrorKind::MalformedMessage)
        }
    }

    fn parse_hex4(&mut self) -> Result<u32, ErrorKind> {
        if self.pos + 4 > self.bytes.len() {
            return Err(ErrorKind::MalformedMessage);
        }
        let s = std::str::from_utf8(&self.bytes[self.pos..self.pos + 4]).map_err(|_| ErrorKind::MalformedMessage)?;
        let v = u32::from_str_radix(s, 16).map_err(|_| ErrorKind::MalformedMessage)?;
        self.pos += 4;
        Ok(v)
    }

    fn parse_number(&mut self) -> Result<(LogicalType, Payload), ErrorKind> {
        self.skip_ws();
        if self.dialect == Dialect::Extended {
            if self.bytes[self.pos..].starts_with(b"NaN") {
                self.pos += 3;
                return Ok((LogicalType::Float, Payload::Float(f64::NAN)));
            }
            if self.bytes[self.pos..].starts_with(b"Infinity") {
                self.pos += 8;
                return Ok((LogicalType::Float, Payload::Float(f64::INFINITY)));
            }
            if self.bytes[self.pos..].starts_with(b"-Infinity") {
                self.pos += 9;
                return Ok((LogicalType::Float, Payload::Float(f64::NEG_INFINITY)));
            }
        }
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        let mut is_float = false;
        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).map_err(|_| ErrorKind::MalformedMessage)?;
        if text.is_empty() || text == "-" {
            return Err(ErrorKind::MalformedMessage);
        }
        if is_float {
            let v: f64 = text.parse().map_err(|_| ErrorKind::MalformedMessage)?;
            return Ok((LogicalType::Float, Payload::Float(v)));
        }
        // An integer literal that overflows i64 (rare, but legal JSON) falls
        // back to Float rather than failing outright.
        match text.parse::<i64>() {
            Ok(v) => Ok((LogicalType::Integer, Payload::Int(v))),
            Err(_) => {
                let v: f64 = text.parse().map_err(|_| ErrorKind::MalformedMessage)?;
                Ok((LogicalType::Float, Payload::Float(v)))
            }
        }
    }

    fn parse_tag_number(&mut self) -> Result<u64, ErrorKind> {
        self.skip_ws();
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).map_err(|_| ErrorKind::MalformedMessage)?;
        text.parse().map_err(|_| ErrorKind::MalformedMessage)
    }

    fn looks_like_hex_prefix(&self) -> bool {
        self.bytes[self.pos..].starts_with(b"0x")
    }

    fn parse_hex_token(&mut self) -> Result<Vec<u8>, ErrorKind> {
        self.expect_literal("0x")?;
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F')) {
            self.pos += 1;
        }
        let hex = std::str::from_utf8(&self.bytes[start..self.pos]).map_err(|_| ErrorKind::MalformedMessage)?;
        if hex.is_empty() || hex.len() % 2 != 0 {
            return Err(ErrorKind::MalformedMessage);
        }
        (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ErrorKind::MalformedMessage))
            .collect()
    }

    /// Look ahead, without consuming, for `[0x..` — the nonstandard form
    /// [`crate::json::encode`] emits for byte strings under `Compat`. Must
    /// run before the caller decides whether to allocate an array or a byte
    /// string container, since by the time `[` is consumed that decision is
    /// already baked into which item was allocated.
    fn looks_like_compat_byte_array(&self) -> bool {
        let mut probe = self.pos + 1;
        while matches!(self.bytes.get(probe), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            probe += 1;
        }
        self.bytes[probe..].starts_with(b"0x")
    }

    fn parse_compat_byte_tokens(&mut self) -> Result<Vec<u8>, ErrorKind> {
        self.expect_byte(b'[')?;
        let mut out = Vec::new();
        self.skip_ws();
        if self.peek() == Some(b']') {
            self.bump();
            return Ok(out);
        }
        loop {
            self.skip_ws();
            let bytes = self.parse_hex_token()?;
            if bytes.len() != 1 {
                return Err(ErrorKind::MalformedMessage);
            }
            out.push(bytes[0]);
            self.skip_ws();
            match self.bump() {
                Some(b',') => continue,
                Some(b']') => return Ok(out),
                _ => return Err(ErrorKind::MalformedMessage),
            }
        }
    }
}

fn utf8_width(lead: u8) -> Result<usize, ErrorKind> {
    if lead & 0x80 == 0 {
        Ok(1)
    } else if lead & 0xE0 == 0xC0 {
        Ok(2)
    } else if lead & 0xF0 == 0xE0 {
        Ok(3)
    } else if lead & 0xF8 == 0xF0 {
        Ok(4)
    } else {
        Err(ErrorKind::MalformedMessage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DynamicModel;

    fn parse(text: &str, dialect: Dialect) -> DynamicModel<'static> {
        let mut model = DynamicModel::new_dynamic();
        parse_json(&mut model, text, dialect).unwrap();
        model
    }

    #[test]
    fn parses_flat_array_of_scalars() {
        let model = parse("[1, 2, true, null]", Dialect::Extended);
        let root = model.root().unwrap();
        assert_eq!(root.len(), Some(4));
        let values: Vec<_> = root.children().map(|c| (c.logical_type(), c.as_int())).collect();
        assert_eq!(values[0], (LogicalType::Integer, Some(1)));
        assert_eq!(values[2].0, LogicalType::Bool);
    }

    #[test]
    fn parses_nested_object_with_text_and_int_keys() {
        let model = parse(r#"{"name": "ferris", 7: {"nested": 1}}"#, Dialect::Extended);
        let root = model.root().unwrap();
        let mut entries = root.entries();
        let (k0, v0) = entries.next().unwrap();
        assert_eq!(k0.as_text(), Some("name"));
        assert_eq!(v0.as_text(), Some("ferris"));
        let (k1, v1) = entries.next().unwrap();
        assert_eq!(k1.as_int(), Some(7));
        assert_eq!(v1.logical_type(), LogicalType::Map);
    }

    #[test]
    fn strict_rejects_integer_key() {
        let mut model = DynamicModel::new_dynamic();
        let err = parse_json(&mut model, "{1: 2}", Dialect::Strict).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedKeyType);
    }

    #[test]
    fn extended_parses_tag_wrapper() {
        let model = parse("<0:23>", Dialect::Extended);
        let root = model.root().unwrap();
        assert_eq!(root.tag(), Some(0));
        assert_eq!(root.as_int(), Some(23));
    }

    #[test]
    fn extended_parses_hex_byte_string() {
        let model = parse("0x1234", Dialect::Extended);
        assert_eq!(model.root().unwrap().as_bytes(), Some(&[0x12, 0x34][..]));
    }

    #[test]
    fn compat_parses_bare_hex_array_as_bytes() {
        let model = parse("[0x12, 0x34]", Dialect::Compat);
        assert_eq!(model.root().unwrap().as_bytes(), Some(&[0x12, 0x34][..]));
    }

    #[test]
    fn compat_empty_brackets_parse_as_empty_array_not_bytes() {
        let model = parse("[]", Dialect::Compat);
        assert_eq!(model.root().unwrap().logical_type(), LogicalType::Array);
        assert_eq!(model.root().unwrap().len(), Some(0));
    }

    #[test]
    fn extended_parses_non_finite_floats() {
        let model = parse("[NaN, Infinity, -Infinity]", Dialect::Extended);
        let root = model.root().unwrap();
        let values: Vec<_> = root.children().map(|c| c.as_float().unwrap()).collect();
        assert!(values[0].is_nan());
        assert_eq!(values[1], f64::INFINITY);
        assert_eq!(values[2], f64::NEG_INFINITY);
    }

    #[test]
    fn parses_string_escapes() {
        let model = parse(r#""a\nb\"c""#, Dialect::Extended);
        assert_eq!(model.root().unwrap().as_text(), Some("a\nb\"c"));
    }

    #[test]
    fn parses_surrogate_pair_escape() {
        let model = parse(r#""😀""#, Dialect::Extended);
        assert_eq!(model.root().unwrap().as_text(), Some("\u{1f600}"));
    }

    #[test]
    fn rejects_trailing_garbage() {
        let mut model = DynamicModel::new_dynamic();
        let err = parse_json(&mut model, "1 2", Dialect::Extended).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedMessage);
    }

    #[test]
    fn parses_negative_and_float_numbers() {
        let model = parse("[-5, 1.5, 2.5e3]", Dialect::Extended);
        let root = model.root().unwrap();
        let mut it = root.children();
        assert_eq!(it.next().unwrap().as_int(), Some(-5));
        assert_eq!(it.next().unwrap().as_float(), Some(1.5));
        assert_eq!(it.next().unwrap().as_float(), Some(2500.0));
    }
}
