use crate::config::PoolConfig;
use crate::error::BufferError;
use crate::field_buffer::FieldBuffer;
use crate::field_buffer::layout::encoded_len;
use crate::field_value::FieldValue;
use crate::types::FieldId;
use tracing::debug;

// ─── Handle ─────────────────────────────────────────────────────────────────

/// Opaque, generation-checked reference to a pooled buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    slot: u32,
    generation: u32,
}

impl Handle {
    /// Pack into a single integer for callers that can only carry one.
    #[inline]
    pub fn to_raw(self) -> u64 {
        ((self.generation as u64) << 32) | self.slot as u64
    }

    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self {
            slot: raw as u32,
            generation: (raw >> 32) as u32,
        }
    }
}

struct Slot {
    generation: u32,
    buffer: Option<FieldBuffer>,
}

// ─── BufferPool ─────────────────────────────────────────────────────────────

/// Owns field buffers and maps handles to them.
///
/// A released slot is reused with a bumped generation, so stale handles
/// resolve to `InvalidHandle` instead of someone else's buffer.
pub struct BufferPool {
    config: PoolConfig,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::new_with_config(PoolConfig::default())
    }

    pub fn new_with_config(config: PoolConfig) -> Self {
        Self {
            config,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    fn check_capacity(&self, capacity: usize) -> Result<(), BufferError> {
        if capacity > self.config.max_capacity {
            return Err(BufferError::InvalidArgument(format!(
                "capacity {capacity} exceeds the pool maximum {}",
                self.config.max_capacity
            )));
        }
        Ok(())
    }

    /// Allocate an empty buffer of `capacity` bytes (`None` = configured default).
    pub fn allocate(&mut self, capacity: Option<usize>) -> Result<Handle, BufferError> {
        let capacity = capacity.unwrap_or(self.config.default_capacity);
        self.check_capacity(capacity)?;
        let buffer = FieldBuffer::with_capacity(capacity)?;
        Ok(self.insert(buffer))
    }

    /// Adopt wire bytes into a new pooled buffer.
    pub fn adopt(&mut self, bytes: &[u8], capacity: Option<usize>) -> Result<Handle, BufferError> {
        let capacity = capacity.unwrap_or(self.config.default_capacity).max(bytes.len());
        self.check_capacity(capacity)?;
        let buffer = FieldBuffer::from_bytes(bytes, capacity)?;
        Ok(self.insert(buffer))
    }

    fn insert(&mut self, buffer: FieldBuffer) -> Handle {
        let reserved = buffer.reserved();
        let handle = match self.free.pop() {
            Some(slot) => {
                let entry = &mut self.slots[slot as usize];
                entry.buffer = Some(buffer);
                Handle {
                    slot,
                    generation: entry.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    buffer: Some(buffer),
                });
                Handle {
                    slot: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        debug!(handle = handle.to_raw(), reserved, "buffer allocated");
        handle
    }

    /// Change a buffer's capacity. A capacity below the utilized length
    /// shrinks the buffer to fit. The returned handle replaces `handle`.
    pub fn reallocate(&mut self, handle: Handle, capacity: usize) -> Result<Handle, BufferError> {
        self.check_capacity(capacity)?;
        let buffer = self.get_mut(handle)?;
        let capacity = capacity.max(buffer.utilized());
        let old = buffer.reserved();
        buffer.set_reserved(capacity)?;
        debug!(handle = handle.to_raw(), old, new = capacity, "buffer reallocated");
        Ok(handle)
    }

    pub fn get(&self, handle: Handle) -> Result<&FieldBuffer, BufferError> {
        self.slots
            .get(handle.slot as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.buffer.as_ref())
            .ok_or(BufferError::InvalidHandle)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut FieldBuffer, BufferError> {
        self.slots
            .get_mut(handle.slot as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.buffer.as_mut())
            .ok_or(BufferError::InvalidHandle)
    }

    /// Release a buffer, returning its content.
    pub fn release(&mut self, handle: Handle) -> Result<FieldBuffer, BufferError> {
        let slot = self
            .slots
            .get_mut(handle.slot as usize)
            .filter(|slot| slot.generation == handle.generation)
            .ok_or(BufferError::InvalidHandle)?;
        let buffer = slot.buffer.take().ok_or(BufferError::InvalidHandle)?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.slot);
        debug!(handle = handle.to_raw(), "buffer released");
        Ok(buffer)
    }

    /// Number of live buffers.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ════════════════════════════════════════════════════════════════════════
    // Caller-side growth policy
    // ════════════════════════════════════════════════════════════════════════

    /// Add `value`, growing the buffer once if it runs out of space.
    ///
    /// Returns the (possibly replaced) handle. Growth picks the larger of the
    /// exact need and `capacity * growth_factor`, capped at `max_capacity`.
    pub fn add_growing(
        &mut self,
        handle: Handle,
        id: FieldId,
        value: &FieldValue<'_>,
    ) -> Result<Handle, BufferError> {
        match self.get_mut(handle)?.add(id, value) {
            Err(BufferError::NoSpace { .. }) => {}
            other => return other.map(|_| handle),
        }
        let usage = self.get(handle)?.explore();
        let needed = usage.utilized + encoded_len(value.encoded_len());
        let grown = usage
            .reserved
            .saturating_mul(self.config.growth_factor)
            .max(needed)
            .min(self.config.max_capacity);
        if grown < needed {
            return Err(BufferError::NoSpace {
                needed: encoded_len(value.encoded_len()),
                available: usage.available(),
            });
        }
        let handle = self.reallocate(handle, grown)?;
        self.get_mut(handle)?.add(id, value)?;
        Ok(handle)
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}
