//! Typed, self-describing field buffers.
//!
//! A [`FieldBuffer`] stores any number of typed, identified values, each of
//! which may occur several times, as a flat sequence of network-order records
//! that can be sent as-is. An offset index keeps lookups cheap and is kept in
//! step with the bytes on every mutation.

pub mod codec;
pub mod config;
pub mod error;
pub mod field_buffer;
pub mod field_id;
pub mod field_value;
pub mod pool;
pub mod repository;
pub mod stream;
pub mod types;

pub use config::PoolConfig;
pub use error::{BufferError, RepositoryError, ResultCode};
pub use field_buffer::{FieldBuffer, FieldIndex, FieldIter};
pub use field_value::FieldValue;
pub use pool::{BufferPool, Handle};
pub use repository::FieldRepository;
pub use types::{FieldId, FieldRef, FieldType, NO_ID, TYPE_BASE};
