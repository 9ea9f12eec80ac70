//! # Growable Array
//!
//! Contiguous, resizable sequence used for every collection in the editing
//! core: the characters of a line, the lines of a buffer and the open sessions
//! of the application.
//!
//! ## Capacity policy
//!
//! - Growth doubles the capacity whenever an insert would not fit.
//! - After a removal, once `len <= capacity / 2`, the capacity drops to the
//!   midpoint between `len` and the old capacity. Alternating insert/remove
//!   right at a boundary therefore never reallocates on every call.
//!
//! The capacity reported by [`GrowableArray::capacity`] is the one this policy
//! computes; the backing `Vec` is always reserved to at least that much.
//! Growing or shrinking may move the storage, which is why no element
//! reference can outlive a mutation.

use std::slice;

use crate::error::{EditError, EditResult};

#[derive(Debug, Clone)]
pub struct GrowableArray<T> {
    elements: Vec<T>,
    capacity: usize,
}

impl<T> Default for GrowableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GrowableArray<T> {
    /// Create an empty array with a single slot.
    pub fn new() -> Self {
        Self {
            elements: Vec::with_capacity(1),
            capacity: 1,
        }
    }

    /// Create an empty array with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> EditResult<Self> {
        if capacity == 0 {
            return Err(EditError::invalid_input("initial capacity must be at least 1"));
        }

        let mut elements = Vec::new();
        elements
            .try_reserve_exact(capacity)
            .map_err(|_| EditError::Allocation {
                requested: capacity,
            })?;

        Ok(Self { elements, capacity })
    }

    /// Create an array holding exactly one element.
    pub fn singleton(value: T) -> Self {
        let mut elements = Vec::with_capacity(1);
        elements.push(value);
        Self {
            elements,
            capacity: 1,
        }
    }

    /// Build an array from an iterator, failing instead of aborting when storage runs out.
    pub fn try_from_iter<I>(iter: I) -> EditResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let iter = iter.into_iter();
        let mut array = Self::with_capacity(iter.size_hint().0.max(1))?;
        for element in iter {
            array.append(element)?;
        }
        Ok(array)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> EditResult<&T> {
        let len = self.len();
        self.elements
            .get(index)
            .ok_or_else(|| EditError::index(index, len))
    }

    pub fn get_mut(&mut self, index: usize) -> EditResult<&mut T> {
        let len = self.len();
        self.elements
            .get_mut(index)
            .ok_or_else(|| EditError::index(index, len))
    }

    /// Overwrite the element at `index`, returning the previous value.
    pub fn set(&mut self, index: usize, value: T) -> EditResult<T> {
        let slot = self.get_mut(index)?;
        Ok(std::mem::replace(slot, value))
    }

    pub fn swap(&mut self, a: usize, b: usize) -> EditResult<()> {
        let len = self.len();
        for index in [a, b] {
            if index >= len {
                return Err(EditError::index(index, len));
            }
        }
        self.elements.swap(a, b);
        Ok(())
    }

    /// Insert `value` at `index`, shifting `[index, len)` one slot to the right.
    pub fn insert(&mut self, index: usize, value: T) -> EditResult<()> {
        if index > self.len() {
            return Err(EditError::index(index, self.len()));
        }

        self.reserve(1)?;
        self.elements.insert(index, value);
        Ok(())
    }

    pub fn append(&mut self, value: T) -> EditResult<()> {
        self.insert(self.len(), value)
    }

    /// Remove the element at `index`, shifting the tail one slot to the left.
    pub fn remove(&mut self, index: usize) -> EditResult<T> {
        if index >= self.len() {
            return Err(EditError::index(index, self.len()));
        }

        let value = self.elements.remove(index);
        self.shrink_if_sparse();
        Ok(value)
    }

    /// Make room for `additional` more elements, doubling the capacity as often as needed.
    ///
    /// Multi-step edits call this up front so that nothing after it can fail.
    pub fn reserve(&mut self, additional: usize) -> EditResult<()> {
        let required = self
            .len()
            .checked_add(additional)
            .ok_or(EditError::Allocation {
                requested: usize::MAX,
            })?;
        if required <= self.capacity {
            return Ok(());
        }

        let mut target = self.capacity.max(1);
        while target < required {
            target = target.checked_mul(2).ok_or(EditError::Allocation {
                requested: required,
            })?;
        }

        self.elements
            .try_reserve_exact(target - self.elements.len())
            .map_err(|_| EditError::Allocation { requested: target })?;
        self.capacity = target;
        Ok(())
    }

    /// Split the array at `at`, returning `[at, len)` as a new array.
    pub fn split_off(&mut self, at: usize) -> EditResult<Self> {
        if at > self.len() {
            return Err(EditError::index(at, self.len()));
        }

        let mut tail = Self::with_capacity((self.len() - at).max(1))?;
        tail.elements.extend(self.elements.drain(at..));
        self.shrink_if_sparse();
        Ok(tail)
    }

    /// Move every element of `other` onto the end of this array.
    pub fn append_all(&mut self, other: Self) -> EditResult<()> {
        self.reserve(other.len())?;
        self.elements.extend(other.elements);
        Ok(())
    }

    pub fn truncate(&mut self, len: usize) {
        if len < self.len() {
            self.elements.truncate(len);
            self.shrink_if_sparse();
        }
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.elements
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.elements.iter_mut()
    }

    pub fn first(&self) -> Option<&T> {
        self.elements.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.elements.last()
    }

    fn shrink_if_sparse(&mut self) {
        let len = self.len();
        if len <= self.capacity / 2 {
            let target = (self.capacity - (self.capacity - len) / 2).max(1);
            self.elements.shrink_to(target);
            self.capacity = target;
        }
    }
}

impl<T: PartialEq> PartialEq for GrowableArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl<T: Eq> Eq for GrowableArray<T> {}

impl<'a, T> IntoIterator for &'a GrowableArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for GrowableArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}
