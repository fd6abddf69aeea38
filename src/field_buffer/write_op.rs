use super::buffer::FieldBuffer;
use super::layout::{encoded_len, write_record, write_size};
use crate::codec::{NetworkCodec, encode_string_into};
use crate::error::BufferError;
use crate::field_id::validate;
use crate::field_value::FieldValue;
use crate::types::*;
use tracing::trace;

/// Run `f` over the encoded data segment of `value`. Only strings allocate.
fn with_encoded<R>(
    value: &FieldValue<'_>,
    f: impl FnOnce(&[u8]) -> Result<R, BufferError>,
) -> Result<R, BufferError> {
    match *value {
        FieldValue::Short(v) => f(v.encode().as_slice()),
        FieldValue::Long(v) => f(v.encode().as_slice()),
        FieldValue::Char(v) => f(v.encode().as_slice()),
        FieldValue::Float(v) => f(v.encode().as_slice()),
        FieldValue::Double(v) => f(v.encode().as_slice()),
        FieldValue::String(s) => {
            let mut buf = Vec::new();
            encode_string_into(s, &mut buf)?;
            f(&buf)
        }
        FieldValue::Binary(b) => f(b),
    }
}

/// Reject data segments that cannot be a valid `field_type` value.
fn check_data(field_type: FieldType, data: &[u8]) -> Result<(), BufferError> {
    match field_type.fixed_width() {
        Some(width) if width != data.len() => Err(BufferError::InvalidArgument(format!(
            "{field_type} data must be {width} bytes, got {}",
            data.len()
        ))),
        None if field_type == FieldType::String && data.last() != Some(&0) => Err(
            BufferError::InvalidArgument("string data must end with a NUL terminator".into()),
        ),
        _ => Ok(()),
    }
}

impl FieldBuffer {
    // ════════════════════════════════════════════════════════════════════════
    // Internal: arena splice
    // ════════════════════════════════════════════════════════════════════════

    /// Replace `old_len` bytes at `offset` with `new_data`. Records behind the
    /// span move with it; their index offsets are the caller's to fix.
    ///
    /// The size difference must already fit in the reserved capacity, so the
    /// arena never reallocates here.
    pub(crate) fn splice_data(&mut self, offset: usize, old_len: usize, new_data: &[u8]) {
        let span = offset..offset + old_len;
        debug_assert!(span.end <= self.arena.len());
        debug_assert!(self.arena.len() - old_len + new_data.len() <= self.reserved());

        if new_data.len() == old_len {
            self.arena[span].copy_from_slice(new_data);
        } else {
            self.arena.splice(span, new_data.iter().copied());
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Add
    // ════════════════════════════════════════════════════════════════════════

    /// Append a new occurrence from an already-encoded data segment.
    pub fn add_raw(
        &mut self,
        id: FieldId,
        field_type: FieldType,
        data: &[u8],
    ) -> Result<(), BufferError> {
        validate(id, field_type)?;
        check_data(field_type, data)?;
        self.ensure_space(encoded_len(data.len()))?;

        let offset = self.arena.len();
        write_record(&mut self.arena, id, data);
        self.index.append(id, offset);
        trace!(id, offset, size = data.len(), "field added");
        Ok(())
    }

    /// Append a new occurrence of `id`; the value's type must match the id.
    pub fn add(&mut self, id: FieldId, value: &FieldValue<'_>) -> Result<(), BufferError> {
        let field_type = value.field_type();
        with_encoded(value, |data| self.add_raw(id, field_type, data))
    }

    pub fn add_short(&mut self, id: FieldId, value: i16) -> Result<(), BufferError> {
        self.add_raw(id, FieldType::Short, &value.encode())
    }

    pub fn add_long(&mut self, id: FieldId, value: i64) -> Result<(), BufferError> {
        self.add_raw(id, FieldType::Long, &value.encode())
    }

    pub fn add_char(&mut self, id: FieldId, value: u8) -> Result<(), BufferError> {
        self.add_raw(id, FieldType::Char, &value.encode())
    }

    pub fn add_float(&mut self, id: FieldId, value: f32) -> Result<(), BufferError> {
        self.add_raw(id, FieldType::Float, &value.encode())
    }

    pub fn add_double(&mut self, id: FieldId, value: f64) -> Result<(), BufferError> {
        self.add_raw(id, FieldType::Double, &value.encode())
    }

    pub fn add_string(&mut self, id: FieldId, value: &str) -> Result<(), BufferError> {
        self.add(id, &FieldValue::String(value))
    }

    pub fn add_binary(&mut self, id: FieldId, value: &[u8]) -> Result<(), BufferError> {
        self.add_raw(id, FieldType::Binary, value)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Update
    // ════════════════════════════════════════════════════════════════════════

    /// Replace the data of an existing occurrence.
    ///
    /// Same size → in-place overwrite. Different size → the arena tail moves
    /// and every index offset past this record shifts by the size delta.
    pub fn update_raw(
        &mut self,
        id: FieldId,
        occurrence: usize,
        field_type: FieldType,
        data: &[u8],
    ) -> Result<(), BufferError> {
        validate(id, field_type)?;
        check_data(field_type, data)?;
        let field = self.locate(id, occurrence)?;
        let (offset, old_len) = (field.offset, field.size());
        let new_len = data.len();
        if new_len > old_len {
            self.ensure_space(new_len - old_len)?;
        }

        self.splice_data(offset + RECORD_HEADER_SIZE, old_len, data);
        if new_len != old_len {
            write_size(&mut self.arena, offset, new_len);
            self.index
                .shift(offset, new_len as isize - old_len as isize);
            trace!(id, occurrence, offset, old_len, new_len, "field resized");
        }
        Ok(())
    }

    /// Replace an existing occurrence with `value`.
    pub fn update(
        &mut self,
        id: FieldId,
        occurrence: usize,
        value: &FieldValue<'_>,
    ) -> Result<(), BufferError> {
        let field_type = value.field_type();
        with_encoded(value, |data| self.update_raw(id, occurrence, field_type, data))
    }

    pub fn update_short(&mut self, id: FieldId, occurrence: usize, value: i16) -> Result<(), BufferError> {
        self.update_raw(id, occurrence, FieldType::Short, &value.encode())
    }

    pub fn update_long(&mut self, id: FieldId, occurrence: usize, value: i64) -> Result<(), BufferError> {
        self.update_raw(id, occurrence, FieldType::Long, &value.encode())
    }

    pub fn update_char(&mut self, id: FieldId, occurrence: usize, value: u8) -> Result<(), BufferError> {
        self.update_raw(id, occurrence, FieldType::Char, &value.encode())
    }

    pub fn update_float(&mut self, id: FieldId, occurrence: usize, value: f32) -> Result<(), BufferError> {
        self.update_raw(id, occurrence, FieldType::Float, &value.encode())
    }

    pub fn update_double(&mut self, id: FieldId, occurrence: usize, value: f64) -> Result<(), BufferError> {
        self.update_raw(id, occurrence, FieldType::Double, &value.encode())
    }

    pub fn update_string(&mut self, id: FieldId, occurrence: usize, value: &str) -> Result<(), BufferError> {
        self.update(id, occurrence, &FieldValue::String(value))
    }

    pub fn update_binary(&mut self, id: FieldId, occurrence: usize, value: &[u8]) -> Result<(), BufferError> {
        self.update_raw(id, occurrence, FieldType::Binary, value)
    }
}
