use super::buffer::FieldBuffer;
use super::layout::encoded_len;
use crate::error::BufferError;
use crate::types::*;
use tracing::trace;

impl FieldBuffer {
    // ════════════════════════════════════════════════════════════════════════
    // Structural mutations
    // ════════════════════════════════════════════════════════════════════════

    /// Remove one occurrence. Later occurrences of the same id are renumbered
    /// down by one; records physically after it move left.
    pub fn remove(&mut self, id: FieldId, occurrence: usize) -> Result<(), BufferError> {
        let field = self.locate(id, occurrence)?;
        let (offset, record_len) = (field.offset, encoded_len(field.size()));

        self.splice_data(offset, record_len, &[]);
        self.index.remove(id, occurrence)?;
        self.index.shift(offset, -(record_len as isize));
        trace!(id, occurrence, offset, record_len, "field removed");
        Ok(())
    }

    /// Remove every occurrence of `id`. Removing an absent id is `NotFound`.
    pub fn remove_all(&mut self, id: FieldId) -> Result<(), BufferError> {
        if self.index.count(id) == 0 {
            return Err(BufferError::NotFound { id, occurrence: 0 });
        }
        // Validate every record before touching the arena.
        let mut records = Vec::with_capacity(self.index.count(id));
        for occurrence in 0..self.index.count(id) {
            let field = self.locate(id, occurrence)?;
            records.push((field.offset, encoded_len(field.size())));
        }
        // Highest offset first so earlier offsets stay valid.
        records.sort_unstable_by(|a, b| b.0.cmp(&a.0));

        self.index.remove_all(id);
        for (offset, record_len) in records {
            self.splice_data(offset, record_len, &[]);
            self.index.shift(offset, -(record_len as isize));
        }
        trace!(id, "all occurrences removed");
        Ok(())
    }

    /// Drop all fields. Capacity is kept.
    pub fn reset(&mut self) {
        self.arena.clear();
        self.index.clear();
    }

    /// Replace this buffer's content with a deep copy of `source`.
    pub fn copy_from(&mut self, source: &FieldBuffer) -> Result<(), BufferError> {
        if source.utilized() > self.reserved {
            return Err(BufferError::NoSpace {
                needed: source.utilized(),
                available: self.reserved,
            });
        }
        let index = source.index.clone();
        self.arena.clear();
        self.arena.extend_from_slice(&source.arena);
        self.index = index;
        Ok(())
    }
}
