use crate::codec::NetworkCodec;
use crate::error::BufferError;
use crate::types::*;

/// One decoded record header plus its data span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordRef<'a> {
    pub id: FieldId,
    pub offset: usize,
    pub data: &'a [u8],
}

impl<'a> RecordRef<'a> {
    /// Offset of the first data byte.
    #[inline]
    pub fn data_offset(&self) -> usize {
        self.offset + RECORD_HEADER_SIZE
    }

    /// Offset one past the record's last byte.
    #[inline]
    pub fn end(&self) -> usize {
        self.data_offset() + self.data.len()
    }
}

/// Total bytes a record with `data_len` data bytes occupies.
#[inline]
pub fn encoded_len(data_len: usize) -> usize {
    RECORD_HEADER_SIZE + data_len
}

/// Decode the record starting at `offset`. Every span is bounds-checked
/// against `arena`.
pub fn read_record(arena: &[u8], offset: usize) -> Result<RecordRef<'_>, BufferError> {
    let header_end = offset
        .checked_add(RECORD_HEADER_SIZE)
        .filter(|&end| end <= arena.len())
        .ok_or_else(|| {
            BufferError::InvalidArgument(format!("truncated record header at offset {offset}"))
        })?;
    let id = i64::decode(&arena[offset..offset + RECORD_ID_SIZE])?;
    let size = u64::decode(&arena[offset + RECORD_ID_SIZE..header_end])?;
    let data_end = usize::try_from(size)
        .ok()
        .and_then(|size| header_end.checked_add(size))
        .filter(|&end| end <= arena.len())
        .ok_or_else(|| {
            BufferError::InvalidArgument(format!(
                "record at offset {offset} claims {size} bytes past the end"
            ))
        })?;
    Ok(RecordRef {
        id,
        offset,
        data: &arena[header_end..data_end],
    })
}

/// Append a record to `out`.
#[inline]
pub fn write_record(out: &mut Vec<u8>, id: FieldId, data: &[u8]) {
    out.reserve(encoded_len(data.len()));
    id.encode_into(out);
    (data.len() as u64).encode_into(out);
    out.extend_from_slice(data);
}

/// Overwrite the size field of the record at `offset`.
#[inline]
pub fn write_size(arena: &mut [u8], offset: usize, size: usize) {
    let at = offset + RECORD_ID_SIZE;
    arena[at..at + RECORD_SIZE_SIZE].copy_from_slice(&(size as u64).encode());
}

/// Walk records sequentially from offset 0.
pub struct RecordScan<'a> {
    arena: &'a [u8],
    cursor: usize,
}

impl<'a> RecordScan<'a> {
    pub fn new(arena: &'a [u8]) -> Self {
        Self { arena, cursor: 0 }
    }
}

impl<'a> Iterator for RecordScan<'a> {
    type Item = Result<RecordRef<'a>, BufferError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == self.arena.len() {
            return None;
        }
        match read_record(self.arena, self.cursor) {
            Ok(record) => {
                self.cursor = record.end();
                Some(Ok(record))
            }
            Err(e) => {
                // stop after the first malformed record
                self.cursor = self.arena.len();
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_record() {
        let mut arena = Vec::new();
        write_record(&mut arena, 0x0200_0001, &[0, 7]);
        assert_eq!(arena.len(), 18);
        assert_eq!(&arena[..8], &[0, 0, 0, 0, 2, 0, 0, 1]);
        assert_eq!(&arena[8..16], &[0, 0, 0, 0, 0, 0, 0, 2]);

        let record = read_record(&arena, 0).unwrap();
        assert_eq!(record.id, 0x0200_0001);
        assert_eq!(record.data, &[0, 7]);
        assert_eq!(record.end(), 18);
    }

    #[test]
    fn test_read_truncated_header() {
        let arena = vec![0u8; 10];
        assert!(matches!(
            read_record(&arena, 0),
            Err(BufferError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_read_size_past_end() {
        let mut arena = Vec::new();
        write_record(&mut arena, 1, b"abcd");
        arena.truncate(arena.len() - 1);
        assert!(matches!(
            read_record(&arena, 0),
            Err(BufferError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_scan_records() {
        let mut arena = Vec::new();
        write_record(&mut arena, 10, b"a");
        write_record(&mut arena, 20, b"");
        write_record(&mut arena, 30, b"xyz");
        let ids: Vec<FieldId> = RecordScan::new(&arena).map(|r| r.unwrap().id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_scan_stops_on_malformed() {
        let mut arena = Vec::new();
        write_record(&mut arena, 10, b"a");
        arena.extend_from_slice(&[1, 2, 3]);
        let results: Vec<_> = RecordScan::new(&arena).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_write_size_in_place() {
        let mut arena = Vec::new();
        write_record(&mut arena, 10, b"abc");
        write_size(&mut arena, 0, 2);
        assert_eq!(read_record(&arena, 0).unwrap().data, b"ab");
    }
}
