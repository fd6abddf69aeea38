use crate::error::BufferError;
use crate::types::*;
use rustc_hash::FxHashMap;

// ─── FieldIndex ─────────────────────────────────────────────────────────────

/// Offsets of every field occurrence inside the arena.
///
/// Each id maps to its occurrences' offsets in append order, which is not
/// necessarily ascending offset order. Distinct ids iterate in the order they
/// were first inserted; an id removed completely and added again moves to the
/// tail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldIndex {
    order: Vec<FieldId>,
    offsets: FxHashMap<FieldId, Vec<usize>>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn occurrences(&self, id: FieldId) -> &[usize] {
        self.offsets.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn offset_at(&self, id: FieldId, occurrence: usize) -> Result<usize, BufferError> {
        self.occurrences(id)
            .get(occurrence)
            .copied()
            .ok_or(BufferError::NotFound { id, occurrence })
    }

    #[inline]
    pub fn count(&self, id: FieldId) -> usize {
        self.occurrences(id).len()
    }

    pub fn total(&self) -> usize {
        self.offsets.values().map(Vec::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Distinct ids in iteration order.
    #[inline]
    pub fn ids(&self) -> &[FieldId] {
        &self.order
    }

    pub fn append(&mut self, id: FieldId, offset: usize) {
        match self.offsets.get_mut(&id) {
            Some(list) => list.push(offset),
            None => {
                self.order.push(id);
                self.offsets.insert(id, vec![offset]);
            }
        }
    }

    /// Erase one occurrence; later occurrences of `id` move down by one.
    /// Returns the erased offset.
    pub fn remove(&mut self, id: FieldId, occurrence: usize) -> Result<usize, BufferError> {
        let list = self
            .offsets
            .get_mut(&id)
            .filter(|list| occurrence < list.len())
            .ok_or(BufferError::NotFound { id, occurrence })?;
        let offset = list.remove(occurrence);
        if list.is_empty() {
            self.drop_id(id);
        }
        Ok(offset)
    }

    /// Erase every occurrence of `id`, returning their offsets.
    pub fn remove_all(&mut self, id: FieldId) -> Vec<usize> {
        let list = self.offsets.remove(&id).unwrap_or_default();
        if !list.is_empty() {
            self.order.retain(|&other| other != id);
        }
        list
    }

    fn drop_id(&mut self, id: FieldId) {
        self.offsets.remove(&id);
        self.order.retain(|&other| other != id);
    }

    /// Add `delta` to every offset, across all ids, strictly greater than
    /// `threshold`. Physical order and occurrence order are independent, so
    /// this must never be limited to the id being mutated.
    pub fn shift(&mut self, threshold: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        for offset in self.offsets.values_mut().flat_map(|list| list.iter_mut()) {
            if *offset > threshold {
                *offset = offset.wrapping_add_signed(delta);
            }
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.offsets.clear();
    }

    // ════════════════════════════════════════════════════════════════════════
    // Iteration
    // ════════════════════════════════════════════════════════════════════════

    /// First `(id, 0)` pair, or `OutOfBounds` when empty.
    #[inline]
    pub fn first(&self) -> Result<(FieldId, usize), BufferError> {
        self.order
            .first()
            .map(|&id| (id, 0))
            .ok_or(BufferError::OutOfBounds)
    }

    /// Pair following `(id, occurrence)`. `NO_ID` restarts from the first.
    pub fn next(&self, id: FieldId, occurrence: usize) -> Result<(FieldId, usize), BufferError> {
        if id == NO_ID {
            return self.first();
        }
        let pos = self
            .order
            .iter()
            .position(|&other| other == id)
            .ok_or(BufferError::NotFound { id, occurrence })?;
        if occurrence < self.count(id).saturating_sub(1) {
            return Ok((id, occurrence + 1));
        }
        self.order
            .get(pos + 1)
            .map(|&next| (next, 0))
            .ok_or(BufferError::OutOfBounds)
    }

    /// All `(id, offset)` pairs sorted by offset.
    pub fn by_offset(&self) -> Vec<(FieldId, usize)> {
        let mut pairs: Vec<(FieldId, usize)> = self
            .offsets
            .iter()
            .flat_map(|(&id, list)| list.iter().map(move |&offset| (id, offset)))
            .collect();
        pairs.sort_unstable_by_key(|&(_, offset)| offset);
        pairs
    }
}
