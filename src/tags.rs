//! Numeric constants for the IANA CBOR tag registry entries this crate
//! recognises by number. None of these are promoted to a richer Rust type
//! during decode — a tag is carried as a bare [`u64`] on [`crate::model::Tag`]
//! and it is up to the caller to interpret it.
//!
//! <https://www.iana.org/assignments/cbor-tags/cbor-tags.xhtml>

#![allow(dead_code)]

pub const DATE_TIME_STRING: u64 = 0; // text string
pub const EPOCH_BASED_DATE_TIME: u64 = 1; // integer or float
pub const UNSIGNED_BIGNUM: u64 = 2; // byte string
pub const NEGATIVE_BIGNUM: u64 = 3; // byte string
pub const DECIMAL_FRACTION: u64 = 4; // array
pub const BIGFLOAT: u64 = 5; // array

pub const COSE_ENCRYPT0: u64 = 16;
pub const COSE_MAC0: u64 = 17;
pub const COSE_SIGN1: u64 = 18;
pub const COSE_COUNTERSIGNATURE: u64 = 19;

pub const EXPECTED_BASE64URL: u64 = 21; // any
pub const EXPECTED_BASE64: u64 = 22; // any
pub const EXPECTED_BASE16: u64 = 23; // any
pub const ENCODED_CBOR_ITEM: u64 = 24; // byte string
pub const SHARED_STRING_REFERENCE: u64 = 25; // unsigned integer
pub const SERIALIZED_PERL_OBJECT: u64 = 26; // array
pub const SERIALIZED_LANGUAGE_INDEPENDENT_OBJECT: u64 = 27; // array
pub const SHARED: u64 = 28; // any
pub const SHARED_VALUE_REFERENCE: u64 = 29; // unsigned integer
pub const RATIONAL_NUMBER: u64 = 30; // array

pub const URI: u64 = 32; // text string
pub const BASE64URL: u64 = 33; // text string
pub const BASE64: u64 = 34; // text string
pub const REGULAR_EXPRESSION: u64 = 35; // text string
pub const MIME_MESSAGE: u64 = 36; // text string
pub const BINARY_UUID: u64 = 37; // byte string
pub const LANGUAGE_TAGGED_STRING: u64 = 38; // array

pub const MULTI_DIMENSIONAL_ARRAY_ROW_MAJOR: u64 = 40; // array of two arrays
pub const HOMOGENOUS_ARRAY: u64 = 41; // array
pub const IPLD_CONTENT_IDENTIFIER: u64 = 42; // byte string

pub const IEEE_MAC_ADDRESS: u64 = 48; // byte string

pub const IPV4: u64 = 52; // byte string or array
pub const IPV6: u64 = 54; // byte string or array

pub const CBOR_WEB_TOKEN: u64 = 61;
pub const ENCODED_CBOR_SEQUENCE: u64 = 63; // byte string

// Typed arrays (RFC 8746). `*_BIG`/`*_LITTLE` are distinct IANA
// assignments, unlike the numbers a reimplementer might guess by pattern
// from the `_BIG` side alone - resolved here against the registry rather
// than duplicated.
pub const TYPED_ARRAY_UINT8: u64 = 64;
pub const TYPED_ARRAY_UINT16_BIG: u64 = 65;
pub const TYPED_ARRAY_UINT32_BIG: u64 = 66;
pub const TYPED_ARRAY_UINT64_BIG: u64 = 67;
pub const TYPED_ARRAY_UINT8_CLAMPED: u64 = 68;
pub const TYPED_ARRAY_UINT16_LITTLE: u64 = 69;
pub const TYPED_ARRAY_UINT32_LITTLE: u64 = 70;
pub const TYPED_ARRAY_UINT64_LITTLE: u64 = 71;
pub const TYPED_ARRAY_INT8: u64 = 72;
pub const TYPED_ARRAY_INT16_BIG: u64 = 73;
pub const TYPED_ARRAY_INT32_BIG: u64 = 74;
pub const TYPED_ARRAY_INT64_BIG: u64 = 75;
pub const TYPED_ARRAY_INT16_LITTLE: u64 = 77;
pub const TYPED_ARRAY_INT32_LITTLE: u64 = 78;
pub const TYPED_ARRAY_INT64_LITTLE: u64 = 79;
pub const TYPED_ARRAY_FLOAT16_BIG: u64 = 80;
pub const TYPED_ARRAY_FLOAT32_BIG: u64 = 81;
pub const TYPED_ARRAY_FLOAT64_BIG: u64 = 82;
pub const TYPED_ARRAY_FLOAT128_BIG: u64 = 83;
pub const TYPED_ARRAY_FLOAT16_LITTLE: u64 = 84;
pub const TYPED_ARRAY_FLOAT32_LITTLE: u64 = 85;
pub const TYPED_ARRAY_FLOAT64_LITTLE: u64 = 86;
pub const TYPED_ARRAY_FLOAT128_LITTLE: u64 = 87;

pub const EMBEDDED_JSON_OBJECT: u64 = 262; // text string
pub const HEXADECIMAL_STRING: u64 = 263; // text string

pub const EXTENDED_TIME: u64 = 1001; // map
pub const DURATION: u64 = 1002; // map
pub const PERIOD: u64 = 1003; // map

pub const SHA256_DIGEST: u64 = 40001; // byte string

/// Marker used by `self_describe` detection / CLI stream-splitting tools;
/// not a semantic tag on any item payload.
pub const SELF_DESCRIBE_CBOR: u64 = 55799;
