//! Text and JSON renderings of a buffer's fields, in index order.

use crate::error::BufferError;
use crate::field_buffer::FieldBuffer;
use crate::repository::FieldRepository;
use crate::types::FieldId;
use std::fmt::{self, Write};

fn label(id: FieldId, repository: Option<&FieldRepository>) -> String {
    repository
        .and_then(|repo| repo.id_to_name(id))
        .map(str::to_owned)
        .unwrap_or_else(|| id.to_string())
}

/// Write one `name[occurrence] = value` line per occurrence.
pub fn write_fields<W: Write>(
    buffer: &FieldBuffer,
    repository: Option<&FieldRepository>,
    out: &mut W,
) -> Result<(), BufferError> {
    for field in buffer.iter() {
        let value = buffer.value(field.id, field.occurrence)?;
        writeln!(
            out,
            "{}[{}] = {}",
            label(field.id, repository),
            field.occurrence,
            value
        )
        .map_err(|e: fmt::Error| BufferError::InternalFailure(e.to_string()))?;
    }
    Ok(())
}

pub fn to_text(
    buffer: &FieldBuffer,
    repository: Option<&FieldRepository>,
) -> Result<String, BufferError> {
    let mut out = String::new();
    write_fields(buffer, repository, &mut out)?;
    Ok(out)
}

/// JSON object keyed by field name (or id), each holding its occurrences.
pub fn to_json(
    buffer: &FieldBuffer,
    repository: Option<&FieldRepository>,
) -> Result<serde_json::Value, BufferError> {
    let mut map = serde_json::Map::new();
    for &id in buffer.index().ids() {
        let mut values = Vec::with_capacity(buffer.count(id));
        for occurrence in 0..buffer.count(id) {
            let value = buffer.value(id, occurrence)?;
            values.push(
                serde_json::to_value(value)
                    .map_err(|e| BufferError::InternalFailure(e.to_string()))?,
            );
        }
        map.insert(label(id, repository), serde_json::Value::Array(values));
    }
    Ok(serde_json::Value::Object(map))
}
