use std::fmt;

use crate::{ObjectError, ObjectType};

// |-----------------------------------------------|
// |       The layout of the packed header         |
// |-----------------------------------------------|
// |    1 bit |      3 bit | 4 bit | up to 6 bytes |
// |----------|------------|-------|---------------|
// | reserved | size bytes | type  |  size (LE)    |
// |-----------------------------------------------|

const TYPE_MASK: u8 = 0x0f;
const COUNT_MASK: u8 = 0x07;
const RESERVED_BIT: u8 = 0x80;

/// Most size bytes a header may carry.
const MAX_SIZE_BYTES: usize = 6;

/// Packed `(type, size)` header of a stored object.
///
/// Encodes into 1 to 7 bytes: a tag byte `(byte_count << 4) | type`
/// followed by the `byte_count` low bytes of the size, little-endian.
/// `byte_count` is minimal, so every `(type, size)` pair has exactly one
/// encoding. Sizes up to 256 TiB (`2^48 - 1`) are representable.
///
/// The value lives in a fixed 8-byte buffer; only the first
/// [`bytes_len`](Self::bytes_len) bytes are meaningful and only they are
/// ever hashed or written out.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedHeader {
    data: [u8; 8],
}

impl PackedHeader {
    /// Largest object size a header can describe.
    pub const MAX_SIZE: u64 = (1 << 48) - 1;

    /// Longest encoded header.
    pub const MAX_LEN: usize = 1 + MAX_SIZE_BYTES;

    /// Pack a header for an object of type `ty` holding `size` bytes.
    ///
    /// Fails with [`ObjectError::InvalidSize`] when `size` does not fit in
    /// 48 bits. The size is never truncated.
    pub fn new(ty: ObjectType, size: u64) -> Result<Self, ObjectError> {
        let count = size_bytes(size);
        if count > MAX_SIZE_BYTES {
            tracing::debug!(size, %ty, "refusing to pack oversized object header");
            return Err(ObjectError::InvalidSize { size });
        }

        let mut data = [0u8; 8];
        data[0] = ((count as u8) << 4) | ty.as_u8();
        let le = size.to_le_bytes();
        data[1..=count].copy_from_slice(&le[..count]);
        Ok(Self { data })
    }

    /// Parse the header at the start of a framed object.
    ///
    /// Returns the header and the number of bytes it occupies; the payload
    /// starts right after. Only canonical encodings are accepted, so a
    /// decoded header re-encodes to exactly the bytes it was read from.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), ObjectError> {
        let Some(&tag) = buf.first() else {
            return Err(ObjectError::Truncated {
                expected: 1,
                actual: 0,
            });
        };
        if tag & RESERVED_BIT != 0 {
            return Err(reject(format!("reserved bit set in tag 0x{tag:02x}")));
        }
        let count = ((tag >> 4) & COUNT_MASK) as usize;
        if count > MAX_SIZE_BYTES {
            return Err(reject(format!("size field of {count} bytes exceeds 48 bits")));
        }
        let nibble = tag & TYPE_MASK;
        if ObjectType::from_u8(nibble).is_none() {
            return Err(reject(format!("unknown object type {nibble}")));
        }

        let len = 1 + count;
        if buf.len() < len {
            return Err(ObjectError::Truncated {
                expected: len,
                actual: buf.len(),
            });
        }
        if count > 0 && buf[count] == 0 {
            return Err(reject("non-minimal size encoding".to_owned()));
        }

        let mut data = [0u8; 8];
        data[..len].copy_from_slice(&buf[..len]);
        Ok((Self { data }, len))
    }

    /// Number of meaningful leading bytes in [`data`](Self::data).
    pub const fn bytes_len(&self) -> usize {
        1 + self.size_count()
    }

    /// The raw 8-byte backing buffer, including unused trailing bytes.
    pub const fn data(&self) -> &[u8; 8] {
        &self.data
    }

    /// The canonical encoded header.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.bytes_len()]
    }

    /// Unpack the object type.
    pub fn object_type(&self) -> ObjectType {
        // Constructors only admit known nibbles.
        ObjectType::from_u8(self.data[0] & TYPE_MASK).unwrap_or(ObjectType::None)
    }

    /// Unpack the object size.
    pub fn size(&self) -> u64 {
        let count = self.size_count();
        let mut le = [0u8; 8];
        le[..count].copy_from_slice(&self.data[1..=count]);
        u64::from_le_bytes(le)
    }

    /// Whether the header describes an object, i.e. its type is not `None`.
    pub fn is_present(&self) -> bool {
        !self.object_type().is_none()
    }

    const fn size_count(&self) -> usize {
        ((self.data[0] >> 4) & COUNT_MASK) as usize
    }
}

/// Minimal number of bytes needed to hold `size`; zero for zero.
const fn size_bytes(size: u64) -> usize {
    ((u64::BITS - size.leading_zeros() + 7) / 8) as usize
}

fn reject(reason: String) -> ObjectError {
    tracing::debug!(%reason, "rejecting packed header");
    ObjectError::InvalidHeader(reason)
}

impl fmt::Debug for PackedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackedHeader")
            .field("type", &self.object_type())
            .field("size", &self.size())
            .field("bytes", &self.as_bytes())
            .finish()
    }
}

impl fmt::Display for PackedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.object_type(), self.size())
    }
}
