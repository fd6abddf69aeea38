use crate::error::BufferError;
use crate::types::*;

/// Raw type code of an id (`id / TYPE_BASE`), without validation.
#[inline]
pub fn type_code(id: FieldId) -> i64 {
    id / TYPE_BASE
}

/// Resolve the type encoded in `id`.
pub fn type_of(id: FieldId) -> Result<FieldType, BufferError> {
    if id <= NO_ID {
        return Err(BufferError::InvalidId(id));
    }
    FieldType::from_code(type_code(id)).ok_or(BufferError::InvalidId(id))
}

/// Check that `id` encodes `expected`.
#[inline]
pub fn validate(id: FieldId, expected: FieldType) -> Result<(), BufferError> {
    let actual = type_of(id)?;
    if actual != expected {
        return Err(BufferError::InvalidType {
            id,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Build an id from a type and a relative id.
#[inline]
pub fn make_id(field_type: FieldType, relative: i64) -> FieldId {
    field_type.code() * TYPE_BASE + relative
}

#[inline]
pub fn relative_id(id: FieldId) -> i64 {
    id % TYPE_BASE
}
