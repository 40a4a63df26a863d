//! Specialized collection types

use std::collections::TryReserveError;

/// Records stored in a [`SlotPool`] report whether they are still live.
///
/// The pool keeps no activity bookkeeping of its own: a slot whose record
/// says it is inactive is free to be overwritten by the next insert.
pub trait PoolRecord {
    /// Whether the record currently occupies its slot
    fn is_active(&self) -> bool;
}

/// Slot pool errors
#[derive(thiserror::Error, Debug)]
pub enum PoolError {
    /// Backing storage could not grow
    #[error("slot pool could not grow past {len} records")]
    Exhausted {
        /// Number of records held when growth failed
        len: usize,
        /// Allocator error
        #[source]
        source: TryReserveError,
    },
}

/// Reusable-slot storage for fixed-size records.
///
/// Inserting scans for the first inactive record and overwrites it, or
/// appends when every slot is live. Slots are never removed, so indices stay
/// stable and iteration order is creation/reuse order.
#[derive(Debug, Clone)]
pub struct SlotPool<T> {
    records: Vec<T>,
}

impl<T: PoolRecord> SlotPool<T> {
    /// Create an empty pool
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Create an empty pool with room for `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Index that the next [`insert`](Self::insert) will use
    pub fn next_index(&self) -> usize {
        self.records
            .iter()
            .position(|record| !record.is_active())
            .unwrap_or(self.records.len())
    }

    /// Insert a record, reusing the first inactive slot. Returns its index.
    pub fn insert(&mut self, record: T) -> Result<usize, PoolError> {
        let index = self.next_index();
        if index < self.records.len() {
            self.records[index] = record;
            return Ok(index);
        }

        self.records
            .try_reserve(1)
            .map_err(|source| PoolError::Exhausted {
                len: self.records.len(),
                source,
            })?;
        self.records.push(record);
        Ok(index)
    }

    /// Get a record by index
    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    /// Get a mutable reference to a record by index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.records.get_mut(index)
    }

    /// Borrow two distinct records mutably at once.
    ///
    /// Returns `None` if `a == b` or either index is out of bounds.
    pub fn get_pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut T, &mut T)> {
        if a == b || a >= self.records.len() || b >= self.records.len() {
            return None;
        }

        if a < b {
            let (head, tail) = self.records.split_at_mut(b);
            Some((&mut head[a], &mut tail[0]))
        } else {
            let (head, tail) = self.records.split_at_mut(a);
            Some((&mut tail[0], &mut head[b]))
        }
    }

    /// Number of slots, live or not
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the pool holds no slots at all
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over every slot in index order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// Iterate mutably over every slot in index order
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.records.iter_mut()
    }

    /// Drop every slot, keeping the allocation
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl<T: PoolRecord> Default for SlotPool<T> {
    fn default() -> Self {
        Self::new()
    }
}
