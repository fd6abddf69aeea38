use crate::error::BufferError;
use arrayvec::ArrayVec;

// ─── NetworkCodec Trait ─────────────────────────────────────────────────────

/// Fixed-width scalar encoding in network (big-endian) byte order.
///
/// `long` is always 8 bytes on the wire, whatever the host's native width,
/// so buffers stay compatible across platforms.
pub trait NetworkCodec: Sized + Copy {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Encode into a stack buffer.
    fn encode(self) -> ArrayVec<u8, 8>;

    /// Decode from exactly `WIDTH` bytes.
    fn decode(bytes: &[u8]) -> Result<Self, BufferError>;

    /// Append the encoded bytes to `buf`.
    #[inline]
    fn encode_into(self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.encode());
    }
}

#[inline]
fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N], BufferError> {
    bytes.try_into().map_err(|_| {
        BufferError::InvalidArgument(format!("expected {N} bytes, got {}", bytes.len()))
    })
}

macro_rules! impl_network_codec {
    ($($ty:ty => $width:expr),* $(,)?) => {
        $(
            impl NetworkCodec for $ty {
                const WIDTH: usize = $width;

                #[inline]
                fn encode(self) -> ArrayVec<u8, 8> {
                    let mut out = ArrayVec::new();
                    out.extend(self.to_be_bytes());
                    out
                }

                #[inline]
                fn decode(bytes: &[u8]) -> Result<Self, BufferError> {
                    Ok(<$ty>::from_be_bytes(fixed::<{ $width }>(bytes)?))
                }
            }
        )*
    };
}

impl_network_codec! {
    u8 => 1,
    i16 => 2,
    i64 => 8,
    u64 => 8,
    f32 => 4,
    f64 => 8,
}

impl NetworkCodec for bool {
    const WIDTH: usize = 1;

    #[inline]
    fn encode(self) -> ArrayVec<u8, 8> {
        let mut out = ArrayVec::new();
        out.push(self as u8);
        out
    }

    #[inline]
    fn decode(bytes: &[u8]) -> Result<Self, BufferError> {
        let [b] = fixed::<1>(bytes)?;
        Ok(b != 0)
    }
}

// ─── Unsized spans ──────────────────────────────────────────────────────────

/// Encode a string's data segment: UTF-8 bytes plus a trailing NUL.
pub fn encode_string_into(value: &str, buf: &mut Vec<u8>) -> Result<(), BufferError> {
    if value.as_bytes().contains(&0) {
        return Err(BufferError::InvalidArgument(
            "string value contains an interior NUL".into(),
        ));
    }
    buf.reserve(value.len() + 1);
    buf.extend_from_slice(value.as_bytes());
    buf.push(0);
    Ok(())
}

/// Decode a string's data segment: the characters before the first NUL.
pub fn decode_string(data: &[u8]) -> Result<&str, BufferError> {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    std::str::from_utf8(&data[..end])
        .map_err(|e| BufferError::InvalidArgument(format!("string field is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_order_short() {
        assert_eq!(&0x0102i16.encode()[..], &[0x01, 0x02]);
        assert_eq!(i16::decode(&[0xff, 0xfe]).unwrap(), -2);
    }

    #[test]
    fn test_long_is_eight_bytes() {
        let bytes = 7i64.encode();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..], &[0, 0, 0, 0, 0, 0, 0, 7]);
        assert_eq!(i64::decode(&bytes).unwrap(), 7);
    }

    #[test]
    fn test_float_double_widths() {
        assert_eq!(<f32 as NetworkCodec>::WIDTH, 4);
        assert_eq!(1.5f32.encode().len(), 4);
        assert_eq!(f32::decode(&1.5f32.encode()).unwrap(), 1.5);
        assert_eq!(f64::decode(&(-0.25f64).encode()).unwrap(), -0.25);
    }

    #[test]
    fn test_bool_and_char() {
        assert!(bool::decode(&true.encode()).unwrap());
        assert!(!bool::decode(&[0]).unwrap());
        assert_eq!(u8::decode(&b'x'.encode()).unwrap(), b'x');
    }

    #[test]
    fn test_decode_wrong_width() {
        assert!(matches!(
            i64::decode(&[1, 2, 3]),
            Err(BufferError::InvalidArgument(_))
        ));
        assert!(matches!(i16::decode(&[]), Err(BufferError::InvalidArgument(_))));
    }

    #[test]
    fn test_string_terminator() {
        let mut buf = Vec::new();
        encode_string_into("abc", &mut buf).unwrap();
        assert_eq!(buf, b"abc\0");
        assert_eq!(decode_string(&buf).unwrap(), "abc");
    }

    #[test]
    fn test_string_interior_nul_rejected() {
        let mut buf = Vec::new();
        assert!(encode_string_into("a\0b", &mut buf).is_err());
        assert!(buf.is_empty());
    }
}
