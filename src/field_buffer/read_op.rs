use super::buffer::FieldBuffer;
use super::layout::read_record;
use crate::codec::{NetworkCodec, decode_string};
use crate::error::BufferError;
use crate::field_id::{type_of, validate};
use crate::field_value::FieldValue;
use crate::types::*;

impl FieldBuffer {
    // ════════════════════════════════════════════════════════════════════════
    // Internal: locate
    // ════════════════════════════════════════════════════════════════════════

    /// Resolve `(id, occurrence)` to its record without type validation.
    pub(crate) fn locate(&self, id: FieldId, occurrence: usize) -> Result<FieldRef<'_>, BufferError> {
        let offset = self.index.offset_at(id, occurrence)?;
        let record = read_record(&self.arena, offset)
            .map_err(|e| BufferError::InternalFailure(format!("index points at bad record: {e}")))?;
        if record.id != id {
            return Err(BufferError::InternalFailure(format!(
                "index entry for {id} points at record of {}",
                record.id
            )));
        }
        Ok(FieldRef {
            id,
            occurrence,
            offset,
            data: record.data,
        })
    }

    // ════════════════════════════════════════════════════════════════════════
    // Select
    // ════════════════════════════════════════════════════════════════════════

    /// Raw data of one occurrence (zero-copy).
    #[inline]
    pub fn select_raw(
        &self,
        id: FieldId,
        occurrence: usize,
        field_type: FieldType,
    ) -> Result<FieldRef<'_>, BufferError> {
        validate(id, field_type)?;
        self.locate(id, occurrence)
    }

    /// Decoded value of one occurrence.
    pub fn select(
        &self,
        id: FieldId,
        occurrence: usize,
        field_type: FieldType,
    ) -> Result<FieldValue<'_>, BufferError> {
        let field = self.select_raw(id, occurrence, field_type)?;
        FieldValue::decode(field_type, field.data)
    }

    /// Decoded value of one occurrence, typed by the id itself.
    pub fn value(&self, id: FieldId, occurrence: usize) -> Result<FieldValue<'_>, BufferError> {
        self.select(id, occurrence, type_of(id)?)
    }

    #[inline]
    fn select_scalar<T: NetworkCodec>(
        &self,
        id: FieldId,
        occurrence: usize,
        field_type: FieldType,
    ) -> Result<T, BufferError> {
        T::decode(self.select_raw(id, occurrence, field_type)?.data)
    }

    pub fn get_short(&self, id: FieldId, occurrence: usize) -> Result<i16, BufferError> {
        self.select_scalar(id, occurrence, FieldType::Short)
    }

    pub fn get_long(&self, id: FieldId, occurrence: usize) -> Result<i64, BufferError> {
        self.select_scalar(id, occurrence, FieldType::Long)
    }

    pub fn get_char(&self, id: FieldId, occurrence: usize) -> Result<u8, BufferError> {
        self.select_scalar(id, occurrence, FieldType::Char)
    }

    pub fn get_float(&self, id: FieldId, occurrence: usize) -> Result<f32, BufferError> {
        self.select_scalar(id, occurrence, FieldType::Float)
    }

    pub fn get_double(&self, id: FieldId, occurrence: usize) -> Result<f64, BufferError> {
        self.select_scalar(id, occurrence, FieldType::Double)
    }

    /// String value without its terminator (zero-copy).
    pub fn get_string(&self, id: FieldId, occurrence: usize) -> Result<&str, BufferError> {
        decode_string(self.select_raw(id, occurrence, FieldType::String)?.data)
    }

    pub fn get_binary(&self, id: FieldId, occurrence: usize) -> Result<&[u8], BufferError> {
        Ok(self.select_raw(id, occurrence, FieldType::Binary)?.data)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Queries
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn exists(&self, id: FieldId, occurrence: usize) -> bool {
        occurrence < self.index.count(id)
    }

    /// Occurrence count of one id.
    #[inline]
    pub fn count(&self, id: FieldId) -> usize {
        self.index.count(id)
    }

    /// Occurrence count across all ids.
    #[inline]
    pub fn total_count(&self) -> usize {
        self.index.total()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Iteration
    // ════════════════════════════════════════════════════════════════════════

    /// First `(id, occurrence)` pair; `OutOfBounds` on an empty buffer.
    #[inline]
    pub fn first(&self) -> Result<(FieldId, usize), BufferError> {
        self.index.first()
    }

    /// Pair after `(id, occurrence)`. Pass `NO_ID` to start over.
    #[inline]
    pub fn next(&self, id: FieldId, occurrence: usize) -> Result<(FieldId, usize), BufferError> {
        self.index.next(id, occurrence)
    }

    /// Iterate every occurrence in index order.
    #[inline]
    pub fn iter(&self) -> FieldIter<'_> {
        FieldIter {
            buffer: self,
            cursor: Some((NO_ID, 0)),
            remaining: self.total_count(),
        }
    }
}

// ─── Iterator ───────────────────────────────────────────────────────────────

pub struct FieldIter<'a> {
    buffer: &'a FieldBuffer,
    cursor: Option<(FieldId, usize)>,
    remaining: usize,
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = FieldRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, occurrence) = self.cursor?;
        let (id, occurrence) = match self.buffer.next(id, occurrence) {
            Ok(pair) => pair,
            Err(_) => {
                self.cursor = None;
                return None;
            }
        };
        self.cursor = Some((id, occurrence));
        self.remaining = self.remaining.saturating_sub(1);
        self.buffer.locate(id, occurrence).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for FieldIter<'a> {}
