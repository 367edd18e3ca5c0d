//! The allocator-backed item tree: a decoded (or hand-built) CBOR document
//! as a forest of [`Item`]s indexed by [`ItemIndex`] rather than linked by
//! raw pointers, plus the [`ItemHandle`]/[`ItemHandleMut`] views used to
//! navigate and construct it.

use crate::alloc::{
    Allocator, BlobAllocator, BlobRef, ItemAllocator, ItemIndex, OwningBlobAllocator,
};
use crate::error::ErrorKind;

pub use crate::alloc::{
    BorrowBlobAllocator, FixedBlobPool, FixedItemPool, GrowingBlobPool, GrowingItemPool,
};

/// The logical shape of an item's payload, independent of which CBOR major
/// type produced it (a positive and a negative integer are both
/// [`LogicalType::Integer`]; they differ only in `Payload::Int`'s sign).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    Integer,
    Float,
    Bool,
    Null,
    Undefined,
    Bytes,
    Text,
    Array,
    Map,
}

/// A map key's payload, restricted at the type level to the two logical
/// types the tree permits as a key — the same restriction [`crate::codec::tree::decode_tree`]
/// checks after the fact against wire input, enforced here at construction
/// time instead.
#[derive(Debug, Clone)]
pub enum KeyPayload {
    Int(i64),
    Text(String),
}

impl From<i64> for KeyPayload {
    fn from(v: i64) -> Self {
        KeyPayload::Int(v)
    }
}

impl From<&str> for KeyPayload {
    fn from(v: &str) -> Self {
        KeyPayload::Text(v.to_owned())
    }
}

impl From<String> for KeyPayload {
    fn from(v: String) -> Self {
        KeyPayload::Text(v)
    }
}

/// An item's optional tag modifier. An item can carry at most one; a second
/// `set_tag` call on an already-tagged item is [`ErrorKind::DoubleTagged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag(Option<u64>);

impl Tag {
    pub const NONE: Tag = Tag(None);

    pub fn value(self) -> Option<u64> {
        self.0
    }
}

/// An item's value, stored as a sum type rather than the tagged union the
/// original used — the compiler, not a manually maintained type tag,
/// enforces that only the active variant is ever read.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Undefined,
    Bytes(BlobRef),
    Text(BlobRef),
    /// Array or map. `first_child`/`last_child` thread a singly linked list
    /// through the children's `next_sibling` fields; `len` is maintained
    /// incrementally so it never needs to walk the list.
    Container {
        first_child: Option<ItemIndex>,
        last_child: Option<ItemIndex>,
        len: u32,
    },
}

impl Payload {
    pub(crate) fn empty_container() -> Self {
        Payload::Container {
            first_child: None,
            last_child: None,
            len: 0,
        }
    }
}

/// A single node in the tree: a logical type, an optional tag, its value,
/// and the links that place it among siblings, under a parent, and (for map
/// values) under a key.
#[derive(Debug, Clone)]
pub struct Item {
    logical_type: LogicalType,
    tag: Tag,
    parent: Option<ItemIndex>,
    next_sibling: Option<ItemIndex>,
    /// For a map's value items, the index of the paired key item. `None`
    /// for array elements, root items, and key items themselves.
    key: Option<ItemIndex>,
    payload: Payload,
}

impl Item {
    pub fn new(logical_type: LogicalType, tag: Tag, payload: Payload) -> Self {
        Item {
            logical_type,
            tag,
            parent: None,
            next_sibling: None,
            key: None,
            payload,
        }
    }

    fn child(logical_type: LogicalType, payload: Payload, parent: ItemIndex) -> Self {
        let mut item = Item::new(logical_type, Tag::NONE, payload);
        item.parent = Some(parent);
        item
    }

    fn entry(
        logical_type: LogicalType,
        payload: Payload,
        parent: ItemIndex,
        key: ItemIndex,
    ) -> Self {
        let mut item = Item::child(logical_type, payload, parent);
        item.key = Some(key);
        item
    }
}

/// A cheap, copyable read-only view of one item within a [`DataModel`].
/// Borrows the model for as long as it's held; there is no way to obtain
/// one that outlives its model.
pub struct ItemHandle<'m, I: ItemAllocator, B: BlobAllocator> {
    items: &'m I,
    blobs: &'m B,
    source: Option<&'m [u8]>,
    index: ItemIndex,
}

impl<'m, I: ItemAllocator, B: BlobAllocator> Clone for ItemHandle<'m, I, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'m, I: ItemAllocator, B: BlobAllocator> Copy for ItemHandle<'m, I, B> {}

impl<'m, I: ItemAllocator, B: BlobAllocator> ItemHandle<'m, I, B> {
    fn item(&self) -> &'m Item {
        self.items.get(self.index)
    }

    pub fn index(&self) -> ItemIndex {
        self.index
    }

    pub fn logical_type(&self) -> LogicalType {
        self.item().logical_type
    }

    pub fn tag(&self) -> Option<u64> {
        self.item().tag.value()
    }

    pub fn parent(&self) -> Option<Self> {
        self.item().parent.map(|i| self.with_index(i))
    }

    pub fn as_int(&self) -> Option<i64> {
        match &self.item().payload {
            Payload::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match &self.item().payload {
            Payload::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &self.item().payload {
            Payload::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&'m [u8]> {
        match &self.item().payload {
            Payload::Bytes(r) => Some(self.resolve(r)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&'m str> {
        match &self.item().payload {
            Payload::Text(r) => {
                // valid by construction: text payloads are only ever
                // populated from &str input (decode validates UTF-8 before
                // storing the bytes; see codec::tree).
                Some(std::str::from_utf8(self.resolve(r)).unwrap_or(""))
            }
            _ => None,
        }
    }

    pub fn len(&self) -> Option<usize> {
        match &self.item().payload {
            Payload::Container { len, .. } => Some(*len as usize),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len().unwrap_or(0) == 0
    }

    pub fn is_null(&self) -> bool {
        self.logical_type() == LogicalType::Null
    }

    pub fn is_undefined(&self) -> bool {
        self.logical_type() == LogicalType::Undefined
    }

    /// Iterate an array's elements, or a map's values in insertion order.
    pub fn children(&self) -> ChildrenIter<'m, I, B> {
        let first = match &self.item().payload {
            Payload::Container { first_child, .. } => *first_child,
            _ => None,
        };
        ChildrenIter {
            items: self.items,
            blobs: self.blobs,
            source: self.source,
            next: first,
        }
    }

    /// Iterate a map's entries as `(key, value)` pairs. For anything other
    /// than a map, yields nothing.
    pub fn entries(&self) -> impl Iterator<Item = (Self, Self)> + 'm
    where
        Self: 'm,
    {
        let this = *self;
        self.children().map(move |value| {
            let key_index = value.item().key.expect("map value item carries a key");
            (this.with_index(key_index), value)
        })
    }

    fn resolve(&self, r: &BlobRef) -> &'m [u8] {
        match r {
            BlobRef::Borrowed(range) => {
                let src = self
                    .source
                    .expect("BlobRef::Borrowed only exists when a source was captured");
                &src[range.clone()]
            }
            other => self
                .blobs
                .local_bytes(other)
                .expect("non-borrowed BlobRef always resolves against its own allocator"),
        }
    }

    fn with_index(&self, index: ItemIndex) -> Self {
        ItemHandle {
            items: self.items,
            blobs: self.blobs,
            source: self.source,
            index,
        }
    }
}

pub struct ChildrenIter<'m, I: ItemAllocator, B: BlobAllocator> {
    items: &'m I,
    blobs: &'m B,
    source: Option<&'m [u8]>,
    next: Option<ItemIndex>,
}

impl<'m, I: ItemAllocator, B: BlobAllocator> Iterator for ChildrenIter<'m, I, B> {
    type Item = ItemHandle<'m, I, B>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        self.next = self.items.get(index).next_sibling;
        Some(ItemHandle {
            items: self.items,
            blobs: self.blobs,
            source: self.source,
            index,
        })
    }
}

/// A mutable, single-use view of one item, used to grow the tree
/// programmatically. Each push returns the new child's index; recurse into
/// it with [`ItemHandleMut::child_mut`].
pub struct ItemHandleMut<'m, 'input, I: ItemAllocator, B: BlobAllocator> {
    model: &'m mut DataModel<'input, I, B>,
    index: ItemIndex,
}

impl<'m, 'input, I: ItemAllocator, B: BlobAllocator> ItemHandleMut<'m, 'input, I, B> {
    pub fn index(&self) -> ItemIndex {
        self.index
    }

    pub fn set_tag(&mut self, tag: u64) -> Result<(), ErrorKind> {
        let item = self.model.items.get_mut(self.index);
        if item.tag.0.is_some() {
            return Err(ErrorKind::DoubleTagged);
        }
        item.tag = Tag(Some(tag));
        Ok(())
    }

    /// Obtain a handle to a previously pushed child, to recurse into a
    /// nested array or map.
    pub fn child_mut(&mut self, index: ItemIndex) -> ItemHandleMut<'_, 'input, I, B> {
        self.model.item_mut(index)
    }

    pub fn push_int(&mut self, value: i64) -> Result<ItemIndex, ErrorKind> {
        self.model
            .push_leaf(self.index, LogicalType::Integer, Payload::Int(value))
    }

    pub fn push_float(&mut self, value: f64) -> Result<ItemIndex, ErrorKind> {
        self.model
            .push_leaf(self.index, LogicalType::Float, Payload::Float(value))
    }

    pub fn push_bool(&mut self, value: bool) -> Result<ItemIndex, ErrorKind> {
        self.model
            .push_leaf(self.index, LogicalType::Bool, Payload::Bool(value))
    }

    pub fn push_null(&mut self) -> Result<ItemIndex, ErrorKind> {
        self.model
            .push_leaf(self.index, LogicalType::Null, Payload::Null)
    }

    pub fn push_undefined(&mut self) -> Result<ItemIndex, ErrorKind> {
        self.model
            .push_leaf(self.index, LogicalType::Undefined, Payload::Undefined)
    }

    pub fn push_array(&mut self) -> Result<ItemIndex, ErrorKind> {
        self.model
            .push_leaf(self.index, LogicalType::Array, Payload::empty_container())
    }

    pub fn push_map(&mut self) -> Result<ItemIndex, ErrorKind> {
        self.model
            .push_leaf(self.index, LogicalType::Map, Payload::empty_container())
    }

    pub fn push_int_entry(&mut self, key: i64, value: i64) -> Result<ItemIndex, ErrorKind> {
        let key_index = self.model.alloc_key_int(key)?;
        self.model
            .push_entry(self.index, key_index, LogicalType::Integer, Payload::Int(value))
    }

    pub fn push_array_entry(&mut self, key: i64) -> Result<ItemIndex, ErrorKind> {
        let key_index = self.model.alloc_key_int(key)?;
        self.model.push_entry(
            self.index,
            key_index,
            LogicalType::Array,
            Payload::empty_container(),
        )
    }

    pub fn push_map_entry(&mut self, key: i64) -> Result<ItemIndex, ErrorKind> {
        let key_index = self.model.alloc_key_int(key)?;
        self.model.push_entry(
            self.index,
            key_index,
            LogicalType::Map,
            Payload::empty_container(),
        )
    }

    /// Append a child of arbitrary logical type, keyed or not. The
    /// combinatorial `push_*`/`push_*_entry` helpers above are sugar over
    /// this for the common scalar cases; this one is what [`crate::json::parse`]
    /// builds on, since it needs to construct trees whose shape isn't known
    /// until the JSON text is parsed.
    pub(crate) fn push_value(
        &mut self,
        key: Option<ItemIndex>,
        logical_type: LogicalType,
        payload: Payload,
    ) -> Result<ItemIndex, ErrorKind> {
        match key {
            Some(k) => self.model.push_entry(self.index, k, logical_type, payload),
            None => self.model.push_leaf(self.index, logical_type, payload),
        }
    }

    pub(crate) fn alloc_int_key(&mut self, key: i64) -> Result<ItemIndex, ErrorKind> {
        self.model.alloc_key_int(key)
    }

    /// Append a child of any logical type. A value already carrying a
    /// [`BlobRef`] (`Payload::Text`/`Payload::Bytes`) must have been
    /// allocated against this same model's blob allocator first — see
    /// `push_text`/`push_bytes` on the [`OwningBlobAllocator`]-bound impl
    /// below for the common case of allocating and pushing in one call.
    pub fn add_child(&mut self, logical_type: LogicalType, value: Payload) -> Result<ItemIndex, ErrorKind> {
        self.push_value(None, logical_type, value)
    }
}

impl<'m, 'input, I: ItemAllocator, B: OwningBlobAllocator> ItemHandleMut<'m, 'input, I, B> {
    pub fn push_bytes(&mut self, data: &[u8]) -> Result<ItemIndex, ErrorKind> {
        let blob = self
            .model
            .blobs
            .alloc_copy(data)
            .ok_or(ErrorKind::BlobAllocFailed)?;
        self.model
            .push_leaf(self.index, LogicalType::Bytes, Payload::Bytes(blob))
    }

    pub fn push_text(&mut self, text: &str) -> Result<ItemIndex, ErrorKind> {
        let blob = self
            .model
            .blobs
            .alloc_copy(text.as_bytes())
            .ok_or(ErrorKind::BlobAllocFailed)?;
        self.model
            .push_leaf(self.index, LogicalType::Text, Payload::Text(blob))
    }

    pub fn push_text_entry(&mut self, key: &str, value: &str) -> Result<ItemIndex, ErrorKind> {
        let key_index = self.model.alloc_key_text(key)?;
        let blob = self
            .model
            .blobs
            .alloc_copy(value.as_bytes())
            .ok_or(ErrorKind::BlobAllocFailed)?;
        self.model
            .push_entry(self.index, key_index, LogicalType::Text, Payload::Text(blob))
    }

    pub fn push_array_entry_text_key(&mut self, key: &str) -> Result<ItemIndex, ErrorKind> {
        let key_index = self.model.alloc_key_text(key)?;
        self.model.push_entry(
            self.index,
            key_index,
            LogicalType::Array,
            Payload::empty_container(),
        )
    }

    pub fn push_map_entry_text_key(&mut self, key: &str) -> Result<ItemIndex, ErrorKind> {
        let key_index = self.model.alloc_key_text(key)?;
        self.model.push_entry(
            self.index,
            key_index,
            LogicalType::Map,
            Payload::empty_container(),
        )
    }

    pub(crate) fn alloc_text_key(&mut self, key: &str) -> Result<ItemIndex, ErrorKind> {
        self.model.alloc_key_text(key)
    }

    pub(crate) fn alloc_blob(&mut self, data: &[u8]) -> Result<BlobRef, ErrorKind> {
        self.model.blobs.alloc_copy(data).ok_or(ErrorKind::BlobAllocFailed)
    }

    /// Allocate `text` against this model's blob allocator and wrap it as a
    /// ready-to-push [`Payload::Text`], for use with [`ItemHandleMut::add_child`]/
    /// [`ItemHandleMut::add_entry`] when the convenience `push_text*` helpers
    /// don't fit (for example, building the value ahead of deciding whether
    /// it's keyed).
    pub fn text_payload(&mut self, text: &str) -> Result<Payload, ErrorKind> {
        Ok(Payload::Text(self.alloc_blob(text.as_bytes())?))
    }

    /// As [`ItemHandleMut::text_payload`], for a byte string.
    pub fn bytes_payload(&mut self, data: &[u8]) -> Result<Payload, ErrorKind> {
        Ok(Payload::Bytes(self.alloc_blob(data)?))
    }

    /// Append a keyed child of any logical type to a map, per the data
    /// model facade: the key is allocated first (restricted to `Integer`/`Text`
    /// at the type level by [`KeyPayload`]), then the value is linked under it.
    pub fn add_entry(
        &mut self,
        key: impl Into<KeyPayload>,
        value_type: LogicalType,
        value: Payload,
    ) -> Result<ItemIndex, ErrorKind> {
        let key_index = match key.into() {
            KeyPayload::Int(k) => self.alloc_int_key(k),
            KeyPayload::Text(k) => self.alloc_text_key(&k),
        }?;
        self.push_value(Some(key_index), value_type, value)
    }
}

/// An allocator-backed document: an item arena, a blob arena, and (when
/// decoding) a borrowed view of the bytes that produced it.
///
/// `'input` is only meaningful for models built by [`crate::codec::tree::decode_tree`]
/// against a [`crate::alloc::BlobAllocator`] that borrows — it is what lets
/// [`BlobRef::Borrowed`] items resolve back into the original bytes.
/// Programmatically built models never populate `source` and can pick any
/// lifetime for it.
pub struct DataModel<'input, I: ItemAllocator, B: BlobAllocator> {
    items: I,
    blobs: B,
    source: Option<&'input [u8]>,
    root: Option<ItemIndex>,
}

impl<'input, I: ItemAllocator, B: BlobAllocator> DataModel<'input, I, B> {
    pub fn new(items: I, blobs: B) -> Self {
        DataModel {
            items,
            blobs,
            source: None,
            root: None,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.blobs.clear();
        self.source = None;
        self.root = None;
    }

    pub fn item_capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn blob_capacity(&self) -> usize {
        self.blobs.capacity()
    }

    pub fn root(&self) -> Option<ItemHandle<'_, I, B>> {
        self.root.map(|index| self.item(index))
    }

    pub fn item(&self, index: ItemIndex) -> ItemHandle<'_, I, B> {
        ItemHandle {
            items: &self.items,
            blobs: &self.blobs,
            source: self.source,
            index,
        }
    }

    pub fn item_mut(&mut self, index: ItemIndex) -> ItemHandleMut<'_, 'input, I, B> {
        ItemHandleMut { model: self, index }
    }

    pub fn build_root_array(&mut self) -> Result<ItemHandleMut<'_, 'input, I, B>, ErrorKind> {
        let index = self.alloc_item(Item::new(
            LogicalType::Array,
            Tag::NONE,
            Payload::empty_container(),
        ))?;
        self.root = Some(index);
        Ok(self.item_mut(index))
    }

    pub fn build_root_map(&mut self) -> Result<ItemHandleMut<'_, 'input, I, B>, ErrorKind> {
        let index = self.alloc_item(Item::new(
            LogicalType::Map,
            Tag::NONE,
            Payload::empty_container(),
        ))?;
        self.root = Some(index);
        Ok(self.item_mut(index))
    }

    pub fn build_root_scalar(&mut self, logical_type: LogicalType, payload: Payload) -> Result<ItemIndex, ErrorKind> {
        let index = self.alloc_item(Item::new(logical_type, Tag::NONE, payload))?;
        self.root = Some(index);
        Ok(index)
    }

    pub(crate) fn alloc_item(&mut self, item: Item) -> Result<ItemIndex, ErrorKind> {
        self.items.allocate(item).ok_or(ErrorKind::ItemAllocFailed)
    }

    pub(crate) fn set_root(&mut self, index: ItemIndex) {
        self.root = Some(index);
    }

    pub(crate) fn set_source(&mut self, source: &'input [u8]) {
        self.source = Some(source);
    }

    pub(crate) fn blobs_mut(&mut self) -> &mut B {
        &mut self.blobs
    }

    /// Link a freestanding item (as returned by [`crate::codec::tree::decode_tree`]'s
    /// internal per-item decode step) as a child of `parent`, optionally
    /// under `key` (for map values). Used only by the tree decoder — the
    /// programmatic builder goes through [`DataModel::push_leaf`]/[`DataModel::push_entry`]
    /// instead, which allocate and link in one step.
    pub(crate) fn link_as_child(&mut self, parent: ItemIndex, key: Option<ItemIndex>, child: ItemIndex) {
        {
            let item = self.items.get_mut(child);
            item.parent = Some(parent);
            item.key = key;
        }
        self.append_child(parent, child);
    }

    /// Record `parent` on a map key item without linking it into the
    /// parent's child chain (keys are reachable only via a value's `key`
    /// field, never iterated directly).
    pub(crate) fn set_key_parent(&mut self, key_item: ItemIndex, parent: ItemIndex) {
        self.items.get_mut(key_item).parent = Some(parent);
    }

    fn alloc_key_int(&mut self, key: i64) -> Result<ItemIndex, ErrorKind> {
        self.alloc_item(Item::new(LogicalType::Integer, Tag::NONE, Payload::Int(key)))
    }

    fn push_leaf(
        &mut self,
        parent: ItemIndex,
        logical_type: LogicalType,
        payload: Payload,
    ) -> Result<ItemIndex, ErrorKind> {
        let index = self.alloc_item(Item::child(logical_type, payload, parent))?;
        self.append_child(parent, index);
        Ok(index)
    }

    fn push_entry(
        &mut self,
        parent: ItemIndex,
        key: ItemIndex,
        logical_type: LogicalType,
        payload: Payload,
    ) -> Result<ItemIndex, ErrorKind> {
        let index = self.alloc_item(Item::entry(logical_type, payload, parent, key))?;
        self.append_child(parent, index);
        Ok(index)
    }

    fn append_child(&mut self, parent: ItemIndex, child: ItemIndex) {
        let last_child = match &self.items.get(parent).payload {
            Payload::Container { last_child, .. } => *last_child,
            _ => unreachable!("append_child called on a non-container parent"),
        };
        if let Some(last) = last_child {
            self.items.get_mut(last).next_sibling = Some(child);
        }
        match &mut self.items.get_mut(parent).payload {
            Payload::Container {
                first_child, last_child, len,
            } => {
                if first_child.is_none() {
                    *first_child = Some(child);
                }
                *last_child = Some(child);
                *len += 1;
            }
            _ => unreachable!("checked above"),
        }
    }
}

impl<'input, I: ItemAllocator, B: OwningBlobAllocator> DataModel<'input, I, B> {
    fn alloc_key_text(&mut self, key: &str) -> Result<ItemIndex, ErrorKind> {
        let blob = self
            .blobs
            .alloc_copy(key.as_bytes())
            .ok_or(ErrorKind::BlobAllocFailed)?;
        self.alloc_item(Item::new(LogicalType::Text, Tag::NONE, Payload::Text(blob)))
    }
}

/// Fixed item pool + fixed blob pool: the embedded preset, suited to a
/// statically sized buffer with no heap growth.
pub type StaticModel<'input> = DataModel<'input, FixedItemPool, FixedBlobPool>;

/// Growing item pool + growing blob pool: the tooling preset, with no
/// capacity limits on either axis.
pub type DynamicModel<'input> = DataModel<'input, GrowingItemPool, GrowingBlobPool>;

/// Growing item pool + borrow-only blob allocator: zero-copy decode, tied
/// to the lifetime of the input it was decoded from.
pub type BorrowModel<'input> = DataModel<'input, GrowingItemPool, BorrowBlobAllocator>;

impl<'input> StaticModel<'input> {
    pub fn new_static(item_capacity: usize, blob_capacity: usize) -> Self {
        DataModel::new(FixedItemPool::new(item_capacity), FixedBlobPool::new(blob_capacity))
    }
}

impl<'input> DynamicModel<'input> {
    pub fn new_dynamic() -> Self {
        DataModel::new(GrowingItemPool::new(), GrowingBlobPool::new())
    }
}

impl<'input> BorrowModel<'input> {
    pub fn new_borrowing() -> Self {
        DataModel::new(GrowingItemPool::new(), BorrowBlobAllocator::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_array_of_scalars() {
        let mut model = DynamicModel::new_dynamic();
        {
            let mut root = model.build_root_array().unwrap();
            root.push_int(1).unwrap();
            root.push_int(2).unwrap();
            root.push_bool(true).unwrap();
        }
        let root = model.root().unwrap();
        assert_eq!(root.logical_type(), LogicalType::Array);
        assert_eq!(root.len(), Some(3));
        let values: Vec<_> = root.children().map(|c| c.as_int()).collect();
        assert_eq!(values, vec![Some(1), Some(2), None]);
    }

    #[test]
    fn build_nested_map_with_text_values() {
        let mut model = DynamicModel::new_dynamic();
        {
            let mut root = model.build_root_map().unwrap();
            root.push_text_entry("name", "ferris").unwrap();
            let nested = root.push_map_entry(7).unwrap();
            let mut nested = root.child_mut(nested);
            nested.push_int_entry(1, 100).unwrap();
        }
        let root = model.root().unwrap();
        let mut entries = root.entries();
        let (k0, v0) = entries.next().unwrap();
        assert_eq!(k0.as_text(), Some("name"));
        assert_eq!(v0.as_text(), Some("ferris"));
        let (k1, v1) = entries.next().unwrap();
        assert_eq!(k1.as_int(), Some(7));
        assert_eq!(v1.logical_type(), LogicalType::Map);
        let (k2, v2) = v1.entries().next().unwrap();
        assert_eq!(k2.as_int(), Some(1));
        assert_eq!(v2.as_int(), Some(100));
    }

    #[test]
    fn double_tag_rejected() {
        let mut model = DynamicModel::new_dynamic();
        let idx = model.build_root_scalar(LogicalType::Integer, Payload::Int(5)).unwrap();
        let mut handle = model.item_mut(idx);
        assert!(handle.set_tag(1).is_ok());
        assert_eq!(handle.set_tag(2), Err(ErrorKind::DoubleTagged));
    }

    #[test]
    fn add_child_and_add_entry_match_the_combinatorial_helpers() {
        let mut model = DynamicModel::new_dynamic();
        {
            let mut root = model.build_root_array().unwrap();
            root.add_child(LogicalType::Integer, Payload::Int(5)).unwrap();
        }
        let root = model.root().unwrap();
        assert_eq!(root.children().next().unwrap().as_int(), Some(5));

        let mut model = DynamicModel::new_dynamic();
        {
            let mut root = model.build_root_map().unwrap();
            root.add_entry("count", LogicalType::Integer, Payload::Int(3)).unwrap();
            root.add_entry(7i64, LogicalType::Bool, Payload::Bool(true)).unwrap();
        }
        let root = model.root().unwrap();
        let mut entries = root.entries();
        let (k0, v0) = entries.next().unwrap();
        assert_eq!(k0.as_text(), Some("count"));
        assert_eq!(v0.as_int(), Some(3));
        let (k1, v1) = entries.next().unwrap();
        assert_eq!(k1.as_int(), Some(7));
        assert_eq!(v1.as_bool(), Some(true));
    }

    #[test]
    fn clear_resets_tree_and_allows_reuse() {
        let mut model = StaticModel::new_static(4, 16);
        {
            let mut root = model.build_root_array().unwrap();
            root.push_int(1).unwrap();
        }
        model.clear();
        assert!(model.root().is_none());
        assert_eq!(model.item_capacity(), 4);
        let mut root = model.build_root_array().unwrap();
        assert!(root.push_int(9).is_ok());
    }
}
