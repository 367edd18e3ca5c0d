//! The three closed JSON dialects this bridge supports, and output
//! formatting knobs orthogonal to dialect choice.

/// How much of a CBOR tree's structure survives the trip through JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// RFC 8259 JSON with no extensions: tags are dropped, non-string map
    /// keys are stringified, byte strings and `undefined` are rejected
    /// outright ([`crate::error::ErrorKind::UnsupportedDatatype`]).
    Strict,
    /// A superset that degrades lossily but never refuses to emit: byte
    /// strings become a bare, nonstandard `[0x12,0x34]` array of unquoted
    /// hex tokens, `undefined` becomes `null`, tags are dropped, and
    /// non-string (integer) keys are carried as bare numbers.
    Compat,
    /// A lossless superset with explicit escape hatches: `<TAG:VALUE>` for
    /// tagged items, a single `0xHEX` run for byte strings, the bare token
    /// `undefined`, and non-string (integer) map keys carried verbatim.
    Extended,
}

/// Output whitespace: compact or indented with a fixed per-level width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    Compact,
    Spaces(u8),
}
