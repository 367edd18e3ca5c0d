use std::fmt::{Debug, Display};

/// Every way a CBOR operation can fail.
///
/// This is a single flat enumeration rather than one error type per
/// component: callers that only care about the failure *kind* (for example
/// to pick a process exit code) never have to match on a tree of nested
/// error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The item allocator ran out of capacity.
    ItemAllocFailed = 1,
    /// The blob allocator ran out of capacity.
    BlobAllocFailed,
    /// The input or output buffer ran out of room.
    UnexpectedEof,
    /// The current JSON dialect cannot represent this logical type.
    UnsupportedDatatype,
    /// The initial byte carried a reserved or otherwise invalid bit pattern.
    MalformedMessage,
    /// A tag modifier was applied to an item that already carries one.
    DoubleTagged,
    /// A map key decoded to a logical type other than integer or string.
    UnsupportedKeyType,
    /// An argument was encoded in a form larger than strictly necessary.
    MalformedArgument,
    /// A reserved simple value outside the four recognised codes.
    UnsupportedSimple,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::ItemAllocFailed => "item allocation failed",
            ErrorKind::BlobAllocFailed => "blob allocation failed",
            ErrorKind::UnexpectedEof => "unexpected end of input",
            ErrorKind::UnsupportedDatatype => "datatype unsupported in this JSON dialect",
            ErrorKind::MalformedMessage => "malformed CBOR message",
            ErrorKind::DoubleTagged => "tag applied to an already-tagged item",
            ErrorKind::UnsupportedKeyType => "map key is neither an integer nor a string",
            ErrorKind::MalformedArgument => "argument encoded in a non-minimal form",
            ErrorKind::UnsupportedSimple => "unrecognised simple value",
        };
        f.write_str(s)
    }
}

impl std::error::Error for ErrorKind {}

/// A decode-time error together with the byte offset at which it was
/// detected, relative to the start of the input that was handed to the
/// decoder.
#[derive(Clone, PartialEq, Eq)]
pub struct CborError {
    offset: usize,
    kind: ErrorKind,
}

impl CborError {
    pub fn new(offset: usize, kind: ErrorKind) -> Self {
        Self { offset, kind }
    }

    /// Byte offset, from the start of the decoded input, at which the error
    /// was detected.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl Display for CborError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset)
    }
}

impl Debug for CborError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for CborError {}

impl From<CborError> for ErrorKind {
    fn from(e: CborError) -> Self {
        e.kind
    }
}
