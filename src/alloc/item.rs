use super::{Allocator, ItemAllocator, ItemIndex};
use crate::model::Item;
use std::convert::TryFrom;

/// Bump-allocates items into a `Vec` reserved up front to `capacity` and
/// never grown past it; `allocate` returns `None` once full. Mirrors the
/// original's fixed-size item array but sidesteps `unsafe` uninitialised
/// storage by paying for a `Vec` allocation once at construction.
pub struct FixedItemPool {
    items: Vec<Item>,
    capacity: usize,
}

impl FixedItemPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }
}

impl Allocator for FixedItemPool {
    fn clear(&mut self) {
        self.items.clear();
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl ItemAllocator for FixedItemPool {
    fn allocate(&mut self, item: Item) -> Option<ItemIndex> {
        if self.items.len() >= self.capacity {
            return None;
        }
        let index = self.items.len() as u32;
        self.items.push(item);
        Some(ItemIndex(index))
    }

    fn get(&self, index: ItemIndex) -> &Item {
        &self.items[index.0 as usize]
    }

    fn get_mut(&mut self, index: ItemIndex) -> &mut Item {
        &mut self.items[index.0 as usize]
    }
}

/// Unbounded item storage for tooling use, where the input size is not
/// known ahead of time and a failed allocation would just be an annoyance.
#[derive(Default)]
pub struct GrowingItemPool {
    items: Vec<Item>,
}

impl GrowingItemPool {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }
}

impl Allocator for GrowingItemPool {
    fn clear(&mut self) {
        self.items.clear();
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn capacity(&self) -> usize {
        0
    }
}

impl ItemAllocator for GrowingItemPool {
    fn allocate(&mut self, item: Item) -> Option<ItemIndex> {
        let index = u32::try_from(self.items.len()).ok()?;
        self.items.push(item);
        Some(ItemIndex(index))
    }

    fn get(&self, index: ItemIndex) -> &Item {
        &self.items[index.0 as usize]
    }

    fn get_mut(&mut self, index: ItemIndex) -> &mut Item {
        &mut self.items[index.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LogicalType, Payload, Tag};

    fn leaf() -> Item {
        Item::new(LogicalType::Null, Tag::NONE, Payload::Null)
    }

    #[test]
    fn fixed_pool_rejects_past_capacity() {
        let mut pool = FixedItemPool::new(1);
        assert!(pool.allocate(leaf()).is_some());
        assert!(pool.allocate(leaf()).is_none());
    }

    #[test]
    fn clear_resets_len_but_not_capacity() {
        let mut pool = FixedItemPool::new(2);
        pool.allocate(leaf()).unwrap();
        pool.clear();
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.capacity(), 2);
        assert!(pool.allocate(leaf()).is_some());
    }

    #[test]
    fn growing_pool_has_no_capacity_limit() {
        let mut pool = GrowingItemPool::new();
        for _ in 0..1000 {
            assert!(pool.allocate(leaf()).is_some());
        }
        assert_eq!(pool.capacity(), 0);
    }
}
