use crate::codec::{NetworkCodec, decode_string, encode_string_into};
use crate::error::BufferError;
use crate::types::FieldType;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::ser::{Serialize, Serializer};
use std::fmt;

// ─── FieldValue ─────────────────────────────────────────────────────────────

/// A typed field value. String and binary variants borrow their bytes, so a
/// value selected from a buffer is zero-copy.
#[derive(Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Short(i16),
    Long(i64),
    Char(u8),
    Float(f32),
    Double(f64),
    String(&'a str),
    Binary(&'a [u8]),
}

impl<'a> FieldValue<'a> {
    #[inline]
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Short(_) => FieldType::Short,
            FieldValue::Long(_) => FieldType::Long,
            FieldValue::Char(_) => FieldType::Char,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Double(_) => FieldType::Double,
            FieldValue::String(_) => FieldType::String,
            FieldValue::Binary(_) => FieldType::Binary,
        }
    }

    /// Length of the encoded data segment (string includes its NUL).
    #[inline]
    pub fn encoded_len(&self) -> usize {
        match self {
            FieldValue::String(s) => s.len() + 1,
            FieldValue::Binary(b) => b.len(),
            other => other.field_type().fixed_width().unwrap_or(0),
        }
    }

    /// Append the encoded data segment to `buf`.
    pub fn write_into(&self, buf: &mut Vec<u8>) -> Result<(), BufferError> {
        match *self {
            FieldValue::Short(v) => v.encode_into(buf),
            FieldValue::Long(v) => v.encode_into(buf),
            FieldValue::Char(v) => v.encode_into(buf),
            FieldValue::Float(v) => v.encode_into(buf),
            FieldValue::Double(v) => v.encode_into(buf),
            FieldValue::String(s) => encode_string_into(s, buf)?,
            FieldValue::Binary(b) => buf.extend_from_slice(b),
        }
        Ok(())
    }

    /// Decode a data segment as `field_type`.
    pub fn decode(field_type: FieldType, data: &'a [u8]) -> Result<Self, BufferError> {
        Ok(match field_type {
            FieldType::Short => FieldValue::Short(i16::decode(data)?),
            FieldType::Long => FieldValue::Long(i64::decode(data)?),
            FieldType::Char => FieldValue::Char(u8::decode(data)?),
            FieldType::Float => FieldValue::Float(f32::decode(data)?),
            FieldType::Double => FieldValue::Double(f64::decode(data)?),
            FieldType::String => FieldValue::String(decode_string(data)?),
            FieldType::Binary => FieldValue::Binary(data),
        })
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            FieldValue::Short(v) => Some(v as i64),
            FieldValue::Long(v) => Some(v),
            FieldValue::Char(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            FieldValue::Float(v) => Some(v as f64),
            FieldValue::Double(v) => Some(v),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match *self {
            FieldValue::Binary(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Short(v) => write!(f, "Short({})", v),
            FieldValue::Long(v) => write!(f, "Long({})", v),
            FieldValue::Char(v) => write!(f, "Char({:?})", *v as char),
            FieldValue::Float(v) => write!(f, "Float({})", v),
            FieldValue::Double(v) => write!(f, "Double({})", v),
            FieldValue::String(s) => write!(f, "String({:?})", s),
            FieldValue::Binary(b) => write!(f, "Binary({} bytes)", b.len()),
        }
    }
}

/// Text rendering used by the stream transform. Binary is base64.
impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Short(v) => write!(f, "{}", v),
            FieldValue::Long(v) => write!(f, "{}", v),
            FieldValue::Char(v) => write!(f, "{}", *v as char),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Double(v) => write!(f, "{}", v),
            FieldValue::String(s) => f.write_str(s),
            FieldValue::Binary(b) => f.write_str(&BASE64.encode(b)),
        }
    }
}

impl Serialize for FieldValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            FieldValue::Short(v) => serializer.serialize_i16(v),
            FieldValue::Long(v) => serializer.serialize_i64(v),
            FieldValue::Char(v) => serializer.serialize_char(v as char),
            FieldValue::Float(v) => serializer.serialize_f32(v),
            FieldValue::Double(v) => serializer.serialize_f64(v),
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Binary(b) => serializer.serialize_str(&BASE64.encode(b)),
        }
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<i16> for FieldValue<'_> {
    fn from(v: i16) -> Self {
        FieldValue::Short(v)
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(v: i64) -> Self {
        FieldValue::Long(v)
    }
}

impl From<u8> for FieldValue<'_> {
    fn from(v: u8) -> Self {
        FieldValue::Char(v)
    }
}

impl From<f32> for FieldValue<'_> {
    fn from(v: f32) -> Self {
        FieldValue::Float(v)
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(v: f64) -> Self {
        FieldValue::Double(v)
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(v: &'a str) -> Self {
        FieldValue::String(v)
    }
}

impl<'a> From<&'a [u8]> for FieldValue<'a> {
    fn from(v: &'a [u8]) -> Self {
        FieldValue::Binary(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_len_matches_written_bytes() {
        let values = [
            FieldValue::Short(3),
            FieldValue::Long(-1),
            FieldValue::Char(b'a'),
            FieldValue::Float(2.5),
            FieldValue::Double(9.75),
            FieldValue::String("hello"),
            FieldValue::Binary(&[1, 2, 3]),
        ];
        for v in values {
            let mut buf = Vec::new();
            v.write_into(&mut buf).unwrap();
            assert_eq!(buf.len(), v.encoded_len(), "{v:?}");
            assert_eq!(FieldValue::decode(v.field_type(), &buf).unwrap(), v);
        }
    }

    #[test]
    fn test_display_binary_is_base64() {
        assert_eq!(FieldValue::Binary(b"hi!").to_string(), "aGkh");
        assert_eq!(FieldValue::Char(b'z').to_string(), "z");
        assert_eq!(FieldValue::String("text").to_string(), "text");
    }

    #[test]
    fn test_serialize_json() {
        let json = serde_json::to_value(FieldValue::Long(42)).unwrap();
        assert_eq!(json, serde_json::json!(42));
        let json = serde_json::to_value(FieldValue::Binary(&[0xff])).unwrap();
        assert_eq!(json, serde_json::json!("/w=="));
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(FieldValue::Short(-4).as_i64(), Some(-4));
        assert_eq!(FieldValue::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(FieldValue::String("x").as_i64(), None);
        assert_eq!(FieldValue::Binary(b"ab").as_bytes(), Some(&b"ab"[..]));
    }
}
