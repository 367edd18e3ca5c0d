use super::{Allocator, BlobAllocator, BlobRef, OwningBlobAllocator};
use std::ops::Range;

/// Bump-copies byte/text payloads into one fixed-size internal buffer.
/// Every [`BlobRef`] it hands out is a [`BlobRef::Pool`] range into that
/// buffer, so clearing the pool invalidates all of them at once (callers
/// are expected to drop the whole tree together with the allocator).
pub struct FixedBlobPool {
    data: Vec<u8>,
    capacity: usize,
}

impl FixedBlobPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }
}

impl Allocator for FixedBlobPool {
    fn clear(&mut self) {
        self.data.clear();
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl BlobAllocator for FixedBlobPool {
    fn local_bytes<'a>(&'a self, r: &BlobRef) -> Option<&'a [u8]> {
        match r {
            BlobRef::Pool(range) => Some(&self.data[range.clone()]),
            _ => None,
        }
    }

    fn alloc_for_decode(&mut self, bytes: &[u8], _range: Range<usize>) -> Option<BlobRef> {
        self.alloc_copy(bytes)
    }
}

impl OwningBlobAllocator for FixedBlobPool {
    fn alloc_copy(&mut self, data: &[u8]) -> Option<BlobRef> {
        if data.len() > self.capacity - self.data.len() {
            return None;
        }
        let start = self.data.len();
        self.data.extend_from_slice(data);
        Some(BlobRef::Pool(start..self.data.len()))
    }
}

/// Copies each byte/text payload into its own heap allocation, for tooling
/// use where the total size of the decoded data is not known up front.
#[derive(Default)]
pub struct GrowingBlobPool {
    blobs: Vec<Box<[u8]>>,
}

impl GrowingBlobPool {
    pub fn new() -> Self {
        Self { blobs: Vec::new() }
    }
}

impl Allocator for GrowingBlobPool {
    fn clear(&mut self) {
        self.blobs.clear();
    }

    fn len(&self) -> usize {
        self.blobs.iter().map(|b| b.len()).sum()
    }

    fn capacity(&self) -> usize {
        0
    }
}

impl BlobAllocator for GrowingBlobPool {
    fn local_bytes<'a>(&'a self, r: &BlobRef) -> Option<&'a [u8]> {
        match r {
            BlobRef::Owned(index) => self.blobs.get(*index).map(|b| &**b),
            _ => None,
        }
    }

    fn alloc_for_decode(&mut self, bytes: &[u8], _range: Range<usize>) -> Option<BlobRef> {
        self.alloc_copy(bytes)
    }
}

impl OwningBlobAllocator for GrowingBlobPool {
    fn alloc_copy(&mut self, data: &[u8]) -> Option<BlobRef> {
        let index = self.blobs.len();
        self.blobs.push(data.into());
        Some(BlobRef::Owned(index))
    }
}

/// Never copies: every allocation just records where in the decoder's
/// input the payload bytes live. Only usable for decoding, since the
/// programmatic builder has no input slice to borrow from — it does not
/// implement [`OwningBlobAllocator`], so the builder's byte/text
/// constructors are simply not callable against this allocator.
#[derive(Default)]
pub struct BorrowBlobAllocator {
    total_len: usize,
}

impl BorrowBlobAllocator {
    pub fn new() -> Self {
        Self { total_len: 0 }
    }
}

impl Allocator for BorrowBlobAllocator {
    fn clear(&mut self) {
        self.total_len = 0;
    }

    fn len(&self) -> usize {
        self.total_len
    }

    fn capacity(&self) -> usize {
        0
    }
}

impl BlobAllocator for BorrowBlobAllocator {
    fn local_bytes<'a>(&'a self, _r: &BlobRef) -> Option<&'a [u8]> {
        None
    }

    fn alloc_for_decode(&mut self, _bytes: &[u8], range: Range<usize>) -> Option<BlobRef> {
        self.total_len += range.end - range.start;
        Some(BlobRef::Borrowed(range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_pool_rejects_past_capacity() {
        let mut pool = FixedBlobPool::new(4);
        assert!(pool.alloc_copy(&[1, 2, 3]).is_some());
        assert!(pool.alloc_copy(&[4, 5]).is_none());
        assert!(pool.alloc_copy(&[4]).is_some());
    }

    #[test]
    fn fixed_pool_resolves_stored_bytes() {
        let mut pool = FixedBlobPool::new(8);
        let r = pool.alloc_copy(b"hello").unwrap();
        assert_eq!(pool.local_bytes(&r), Some(&b"hello"[..]));
    }

    #[test]
    fn growing_pool_resolves_by_index() {
        let mut pool = GrowingBlobPool::new();
        let a = pool.alloc_copy(b"abc").unwrap();
        let b = pool.alloc_copy(b"xy").unwrap();
        assert_eq!(pool.local_bytes(&a), Some(&b"abc"[..]));
        assert_eq!(pool.local_bytes(&b), Some(&b"xy"[..]));
    }

    #[test]
    fn borrow_allocator_never_resolves_locally() {
        let mut alloc = BorrowBlobAllocator::new();
        let r = alloc.alloc_for_decode(b"abc", 3..6).unwrap();
        assert_eq!(alloc.local_bytes(&r), None);
        assert!(matches!(r, BlobRef::Borrowed(range) if range == (3..6)));
    }
}
