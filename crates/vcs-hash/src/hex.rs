use crate::HashError;

/// Returned by [`hex_to_byte`] for characters that are not hex digits.
pub const INVALID: u8 = 255;

/// Lookup table: ASCII byte → nibble value (`INVALID` otherwise).
const HEX_DECODE: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0u8;
    loop {
        match i {
            b'0'..=b'9' => table[i as usize] = i - b'0',
            b'a'..=b'f' => table[i as usize] = i - b'a' + 10,
            b'A'..=b'F' => table[i as usize] = i - b'A' + 10,
            _ => {}
        }
        if i == 255 {
            break;
        }
        i += 1;
    }
    table
};

const HEX_ENCODE: &[u8; 16] = b"0123456789abcdef";

/// Whether `c` is a hex digit (`0-9`, `a-f`, `A-F`).
pub const fn is_hex(c: u8) -> bool {
    HEX_DECODE[c as usize] != INVALID
}

/// Value of the hex digit `c`, or [`INVALID`].
pub const fn hex_to_byte(c: u8) -> u8 {
    HEX_DECODE[c as usize]
}

/// Hex-encode `bytes` into `buf`. `buf` must be at least `bytes.len() * 2` bytes.
///
/// # Panics
///
/// Panics if `buf` is too short.
pub fn hex_encode(bytes: &[u8], buf: &mut [u8]) {
    assert!(
        buf.len() >= bytes.len() * 2,
        "hex_encode: buffer too short"
    );
    for (pair, &b) in buf.chunks_exact_mut(2).zip(bytes) {
        pair[0] = HEX_ENCODE[(b >> 4) as usize];
        pair[1] = HEX_ENCODE[(b & 0x0f) as usize];
    }
}

/// Hex-encode `bytes` to a new lowercase `String`.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut buf = vec![0u8; bytes.len() * 2];
    hex_encode(bytes, &mut buf);
    // SAFETY: hex_encode only writes ASCII hex digits.
    unsafe { String::from_utf8_unchecked(buf) }
}

/// Decode a hex string into `buf`. The hex string length must be exactly `buf.len() * 2`.
pub fn hex_decode(hex: &str, buf: &mut [u8]) -> Result<(), HashError> {
    let hex = hex.as_bytes();
    if hex.len() != buf.len() * 2 {
        return Err(HashError::InvalidHexLength {
            expected: buf.len() * 2,
            actual: hex.len(),
        });
    }
    for (i, (out, pair)) in buf.iter_mut().zip(hex.chunks_exact(2)).enumerate() {
        let hi = hex_to_byte(pair[0]);
        let lo = hex_to_byte(pair[1]);
        if hi == INVALID {
            return Err(HashError::InvalidHex {
                position: i * 2,
                character: pair[0] as char,
            });
        }
        if lo == INVALID {
            return Err(HashError::InvalidHex {
                position: i * 2 + 1,
                character: pair[1] as char,
            });
        }
        *out = (hi << 4) | lo;
    }
    Ok(())
}
