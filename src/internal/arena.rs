use std::{
    fmt::{Debug, Formatter},
    iter::FusedIterator,
    marker::PhantomData,
    ops::{Index, IndexMut},
};

/// An `Arena<TId, TValue>` stores values that are addressed by a dense,
/// strongly typed id. Values are never removed, so an id handed out by the
/// arena stays valid for the lifetime of the arena (and of every clone of it).
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Arena<TId: ArenaId, TValue> {
    values: Vec<TValue>,
    #[cfg_attr(feature = "serde", serde(skip))]
    _phantom: PhantomData<TId>,
}

impl<TId: ArenaId, TValue> Default for Arena<TId, TValue> {
    fn default() -> Self {
        Self::new()
    }
}

impl<TId: ArenaId, TValue> Arena<TId, TValue> {
    /// Constructs a new, empty arena.
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Stores `value` and returns the id under which it can be retrieved.
    pub fn alloc(&mut self, value: TValue) -> TId {
        let id = TId::from_usize(self.values.len());
        self.values.push(value);
        id
    }

    /// Returns the value associated with `id` or `None` if the id was not
    /// handed out by this arena.
    pub fn get(&self, id: TId) -> Option<&TValue> {
        self.values.get(id.to_usize())
    }

    /// Mutable counterpart of [`Self::get`].
    pub fn get_mut(&mut self, id: TId) -> Option<&mut TValue> {
        self.values.get_mut(id.to_usize())
    }

    /// Returns the number of values in the arena.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterates over all ids and values in allocation order.
    pub fn iter(&self) -> ArenaIter<'_, TId, TValue> {
        ArenaIter {
            inner: self.values.iter().enumerate(),
            _phantom: PhantomData,
        }
    }
}

impl<TId: ArenaId, TValue> Index<TId> for Arena<TId, TValue> {
    type Output = TValue;

    fn index(&self, index: TId) -> &Self::Output {
        &self.values[index.to_usize()]
    }
}

impl<TId: ArenaId, TValue> IndexMut<TId> for Arena<TId, TValue> {
    fn index_mut(&mut self, index: TId) -> &mut Self::Output {
        &mut self.values[index.to_usize()]
    }
}

impl<TId: ArenaId, TValue: Debug> Debug for Arena<TId, TValue> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}

/// Iterator over the `(id, value)` pairs of an [`Arena`].
pub struct ArenaIter<'a, TId, TValue> {
    inner: std::iter::Enumerate<std::slice::Iter<'a, TValue>>,
    _phantom: PhantomData<TId>,
}

impl<'a, TId: ArenaId, TValue> Iterator for ArenaIter<'a, TId, TValue> {
    type Item = (TId, &'a TValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(index, value)| (TId::from_usize(index), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<TId: ArenaId, TValue> ExactSizeIterator for ArenaIter<'_, TId, TValue> {}

impl<TId: ArenaId, TValue> FusedIterator for ArenaIter<'_, TId, TValue> {}

/// A trait indicating that the type can be transformed to `usize` and back
pub trait ArenaId {
    /// Constructs the id from an index into the arena.
    fn from_usize(x: usize) -> Self;

    /// Returns the index into the arena.
    fn to_usize(self) -> usize;
}
