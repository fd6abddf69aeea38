use super::index::FieldIndex;
use super::layout::{RecordScan, encoded_len};
use crate::error::BufferError;
use crate::field_id::type_of;
use crate::types::*;
use tracing::debug;

/// Field buffer: a fixed-capacity byte arena of records plus its index.
///
/// `reserved` is set by whoever owns the buffer (normally the pool) and is
/// never grown by the buffer itself; operations that do not fit fail with
/// `NoSpace`. Every public operation either applies fully or leaves the
/// buffer untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBuffer {
    pub(crate) arena: Vec<u8>,
    pub(crate) reserved: usize,
    pub(crate) index: FieldIndex,
}

impl FieldBuffer {
    /// Create an empty buffer able to hold `reserved` bytes.
    pub fn with_capacity(reserved: usize) -> Result<Self, BufferError> {
        let mut arena = Vec::new();
        arena.try_reserve_exact(reserved)?;
        Ok(Self {
            arena,
            reserved,
            index: FieldIndex::new(),
        })
    }

    /// Build a buffer from wire bytes, rebuilding the index by scanning the
    /// records sequentially.
    pub fn from_bytes(bytes: &[u8], reserved: usize) -> Result<Self, BufferError> {
        if bytes.len() > reserved {
            return Err(BufferError::InvalidArgument(format!(
                "{} bytes do not fit in a capacity of {reserved}",
                bytes.len()
            )));
        }
        let mut index = FieldIndex::new();
        for record in RecordScan::new(bytes) {
            let record = record.inspect_err(|e| debug!(error = %e, "malformed field buffer"))?;
            type_of(record.id).map_err(|_| {
                BufferError::InvalidArgument(format!(
                    "record at offset {} has invalid id {}",
                    record.offset, record.id
                ))
            })?;
            index.append(record.id, record.offset);
        }
        let mut arena = Vec::new();
        arena.try_reserve_exact(reserved)?;
        arena.extend_from_slice(bytes);
        Ok(Self {
            arena,
            reserved,
            index,
        })
    }

    // ════════════════════════════════════════════════════════════════════════
    // Sizing
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn utilized(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn reserved(&self) -> usize {
        self.reserved
    }

    #[inline]
    pub fn explore(&self) -> BufferUsage {
        BufferUsage {
            reserved: self.reserved,
            utilized: self.arena.len(),
        }
    }

    /// Bytes a new record of `field_type` with `data_len` data bytes needs.
    /// For strings, `data_len` excludes the terminator.
    pub fn minimum_need(field_type: FieldType, data_len: usize) -> usize {
        match field_type {
            FieldType::String => encoded_len(data_len + 1),
            FieldType::Binary => encoded_len(data_len),
            fixed => encoded_len(fixed.fixed_width().unwrap_or(0)),
        }
    }

    /// Change the capacity. Refuses to drop below the utilized length.
    pub fn set_reserved(&mut self, reserved: usize) -> Result<(), BufferError> {
        if reserved < self.arena.len() {
            return Err(BufferError::NoSpace {
                needed: self.arena.len(),
                available: reserved,
            });
        }
        if reserved > self.arena.capacity() {
            self.arena.try_reserve_exact(reserved - self.arena.len())?;
        } else {
            self.arena.shrink_to(reserved);
        }
        self.reserved = reserved;
        Ok(())
    }

    #[inline]
    pub(crate) fn ensure_space(&self, extra: usize) -> Result<(), BufferError> {
        let available = self.reserved - self.arena.len();
        if extra > available {
            return Err(BufferError::NoSpace {
                needed: extra,
                available,
            });
        }
        Ok(())
    }

    // ════════════════════════════════════════════════════════════════════════
    // Raw access
    // ════════════════════════════════════════════════════════════════════════

    /// Wire bytes of the buffer, ready for transport.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.arena
    }

    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.arena
    }

    #[inline]
    pub fn index(&self) -> &FieldIndex {
        &self.index
    }
}
