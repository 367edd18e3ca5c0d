//! A CBOR ([RFC 8949](https://www.rfc-editor.org/rfc/rfc8949)) engine: a
//! byte-level header codec, an allocator-backed item tree, and a lossless
//! JSON bridge between the two.
//!
//! The crate decomposes into the same seven layers the format itself
//! suggests, leaves-first:
//!
//! - [`buffer`] — read/write cursors over in-memory byte storage.
//! - [`wire`] — the CBOR initial byte's bit layout and its enumerations.
//! - [`alloc`] — pluggable item and blob storage (fixed pool, growing, or
//!   borrow-in-place).
//! - [`model`] — the arena-backed item tree ([`model::DataModel`]) bound to
//!   a pair of allocators.
//! - [`codec::header`] — stateless, header-at-a-time encode/decode.
//! - [`codec::tree`] — materialising decode and walking encode, built on
//!   [`codec::header`] plus [`model`].
//! - [`json`] — a lossless JSON-family bridge in three closed dialects.
//!
//! [`error::ErrorKind`] is the single flat error enumeration every fallible
//! operation in this crate returns through.

pub mod alloc;
pub mod buffer;
pub mod codec;
pub mod error;
pub mod json;
pub mod model;
pub mod tags;
pub mod wire;
