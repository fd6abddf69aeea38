use std::fmt;
use std::str::FromStr;

// ─── Field Ids ──────────────────────────────────────────────────────────────

/// Numeric field identifier. The field type is encoded as `id / TYPE_BASE`.
pub type FieldId = i64;

/// Divisor encoding a field's type into its id.
pub const TYPE_BASE: FieldId = 0x0200_0000;

/// Sentinel meaning "not a field". Starts iteration, never a lookup target.
pub const NO_ID: FieldId = 0;

// ─── Field Types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FieldType {
    Short = 1,
    Long = 2,
    Char = 3,
    Float = 4,
    Double = 5,
    String = 6,
    Binary = 7,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        FieldType::Short,
        FieldType::Long,
        FieldType::Char,
        FieldType::Float,
        FieldType::Double,
        FieldType::String,
        FieldType::Binary,
    ];

    #[inline]
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(FieldType::Short),
            2 => Some(FieldType::Long),
            3 => Some(FieldType::Char),
            4 => Some(FieldType::Float),
            5 => Some(FieldType::Double),
            6 => Some(FieldType::String),
            7 => Some(FieldType::Binary),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldType::Short => "short",
            FieldType::Long => "long",
            FieldType::Char => "char",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::String => "string",
            FieldType::Binary => "binary",
        }
    }

    /// Encoded data width for fixed-size types, `None` for string/binary.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            FieldType::Short => Some(2),
            FieldType::Long => Some(8),
            FieldType::Char => Some(1),
            FieldType::Float => Some(4),
            FieldType::Double => Some(8),
            FieldType::String | FieldType::Binary => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown field type '{s}'"))
    }
}

// ─── Binary Layout ──────────────────────────────────────────────────────────
//
//  ┌──────────────────────────────────────────────┐
//  │ Record (repeated, no padding)                │
//  │   id:   i64 (network order)                  │
//  │   size: u64 (network order)                  │
//  │   data: [u8; size]                           │
//  └──────────────────────────────────────────────┘
//
//  Strings carry a trailing NUL counted in `size`; binary does not.

pub const RECORD_ID_SIZE: usize = 8;
pub const RECORD_SIZE_SIZE: usize = 8;
pub const RECORD_HEADER_SIZE: usize = RECORD_ID_SIZE + RECORD_SIZE_SIZE;

// ─── FieldRef ───────────────────────────────────────────────────────────────

/// A raw, zero-copy reference to one occurrence's data bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRef<'a> {
    pub id: FieldId,
    pub occurrence: usize,
    pub offset: usize,
    pub data: &'a [u8],
}

impl<'a> FieldRef<'a> {
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

// ─── Usage ──────────────────────────────────────────────────────────────────

/// Capacity/length snapshot of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferUsage {
    pub reserved: usize,
    pub utilized: usize,
}

impl BufferUsage {
    #[inline]
    pub fn available(&self) -> usize {
        self.reserved - self.utilized
    }
}
