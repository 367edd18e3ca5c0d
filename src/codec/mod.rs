//! Byte-level CBOR codec: a streaming header decoder/encoder (`header`)
//! and the tree decoder/encoder built on top of it (`tree`).

pub mod header;
pub mod tree;

pub use header::{decode_header, decode_header_strict, encode_header, DecodedHeader};
pub use tree::{decode_tree, encode_tree};
