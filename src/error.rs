// ─── Error ──────────────────────────────────────────────────────────────────
use crate::types::{FieldId, FieldType};
use smol_str::SmolStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BufferError {
    #[error("no space: need {needed} bytes, {available} available")]
    NoSpace { needed: usize, available: usize },
    #[error("occurrence {occurrence} of field {id} not found")]
    NotFound { id: FieldId, occurrence: usize },
    #[error("invalid field id: {0}")]
    InvalidId(FieldId),
    #[error("type mismatch for field {id}: expected {expected}, got {actual}")]
    InvalidType {
        id: FieldId,
        expected: FieldType,
        actual: FieldType,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("handle does not refer to a live buffer")]
    InvalidHandle,
    #[error("no further field occurrence")]
    OutOfBounds,
    #[error("out of memory")]
    OutOfMemory,
    #[error("internal failure: {0}")]
    InternalFailure(String),
}

impl BufferError {
    /// Protocol result code for this error.
    pub fn code(&self) -> ResultCode {
        match self {
            BufferError::NoSpace { .. } => ResultCode::NoSpace,
            BufferError::NotFound { .. } => ResultCode::NotFoundOccurrence,
            BufferError::InvalidId(_) => ResultCode::InvalidId,
            BufferError::InvalidType { .. } => ResultCode::InvalidType,
            BufferError::InvalidArgument(_) => ResultCode::InvalidArgument,
            BufferError::InvalidHandle => ResultCode::InvalidHandle,
            BufferError::OutOfBounds => ResultCode::OutOfBounds,
            BufferError::OutOfMemory => ResultCode::OutOfMemory,
            BufferError::InternalFailure(_) => ResultCode::InternalFailure,
        }
    }
}

impl From<std::collections::TryReserveError> for BufferError {
    fn from(_: std::collections::TryReserveError) -> Self {
        BufferError::OutOfMemory
    }
}

// ─── Result codes ───────────────────────────────────────────────────────────

/// Stable numeric codes surfaced across the handle boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ResultCode {
    Success = 0,
    NoSpace = 1,
    NotFoundOccurrence = 2,
    InvalidHandle = 3,
    InvalidArgument = 4,
    OutOfMemory = 5,
    InvalidId = 6,
    InvalidType = 7,
    OutOfBounds = 8,
    InternalFailure = 9,
}

impl ResultCode {
    #[inline]
    pub fn from_result<T>(result: &Result<T, BufferError>) -> Self {
        match result {
            Ok(_) => ResultCode::Success,
            Err(e) => e.code(),
        }
    }

    #[inline]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

// ─── Repository Error ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to read field table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse field table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("rejected field: {0}")]
    InvalidId(#[source] BufferError),
    #[error("duplicate field name '{0}'")]
    DuplicateName(SmolStr),
    #[error("duplicate field id {0}")]
    DuplicateId(FieldId),
}
