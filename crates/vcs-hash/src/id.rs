use std::fmt;
use std::hash::{BuildHasherDefault, Hash, Hasher};
use std::str::FromStr;

use vcs_object::ObjectType;

use crate::hex::{self, hex_decode};
use crate::{Builder, HashError};

/// Identity of a stored object: the SHA-256 digest of its packed header
/// followed by its payload.
///
/// Ordered by unsigned lexicographic comparison of the 32 bytes, which is
/// the order used for sorted index keys. The all-zero value
/// ([`ContentId::ZERO`], also the `Default`) stands for "no object".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(C, align(8))]
pub struct ContentId([u8; 32]);

const _: () = assert!(std::mem::size_of::<ContentId>() == ContentId::LEN);
const _: () = assert!(std::mem::align_of::<ContentId>() == std::mem::align_of::<u64>());

impl ContentId {
    /// Length of the raw digest in bytes.
    pub const LEN: usize = 32;
    /// Length of the hex representation.
    pub const HEX_LEN: usize = Self::LEN * 2;

    /// The null id (all zeros).
    pub const ZERO: Self = Self([0u8; 32]);
    /// Smallest id; same as [`ContentId::ZERO`].
    pub const MIN: Self = Self::ZERO;
    /// Largest id (all `0xff`).
    pub const MAX: Self = Self([0xff; 32]);

    /// Hash an object of type `ty` with the given payload.
    ///
    /// This is the canonical object identity:
    /// `SHA256(PackedHeader(ty, len) || content)`. Fails only when the
    /// payload is too large for a packed header.
    pub fn make(ty: ObjectType, content: impl AsRef<[u8]>) -> Result<Self, HashError> {
        let content = content.as_ref();
        Ok(Builder::for_object(ty, content.len() as u64)?
            .append(content)
            .build())
    }

    /// Copy an id out of `data`, which must be exactly 32 bytes.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let Ok(bytes) = <[u8; 32]>::try_from(data) else {
            tracing::trace!(len = data.len(), "rejecting raw content id of wrong length");
            return None;
        };
        Some(Self(bytes))
    }

    /// Parse a 64-character hex id (either case).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let mut bytes = [0u8; 32];
        match hex_decode(hex, &mut bytes) {
            Ok(()) => Some(Self(bytes)),
            Err(err) => {
                tracing::trace!(%err, "rejecting hex content id");
                None
            }
        }
    }

    /// Whether `data` has the length of a raw id.
    pub const fn is_bytes(data: &[u8]) -> bool {
        data.len() == Self::LEN
    }

    /// Whether `hex` is a well-formed hex id.
    pub fn is_hex(hex: &str) -> bool {
        hex.len() == Self::HEX_LEN && hex.bytes().all(hex::is_hex)
    }

    /// The raw digest bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Copy of the raw digest bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Byte length of the id.
    pub const fn len(&self) -> usize {
        Self::LEN
    }

    /// Check if this is the null (all-zeros) id.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Lowercase hex representation.
    pub fn to_hex(&self) -> String {
        hex::bytes_to_hex(&self.0)
    }

    /// Write the lowercase hex representation into `buf`.
    pub fn write_hex(&self, buf: &mut [u8; 64]) {
        hex::hex_encode(&self.0, buf);
    }

    /// Leading machine word of the digest.
    ///
    /// The digest is uniformly distributed, so this word is already a good
    /// hash for in-memory tables.
    pub(crate) fn hash_word(&self) -> u64 {
        let [a, b, c, d, e, f, g, h, ..] = self.0;
        u64::from_ne_bytes([a, b, c, d, e, f, g, h])
    }
}

impl Hash for ContentId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_word());
    }
}

/// Pass-through hasher for content ids.
///
/// `ContentId` hashes as a single `u64` taken from its digest, which this
/// hasher returns unchanged. Other input is folded byte by byte so the
/// hasher stays usable, if slower, for arbitrary keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdHasher(u64);

impl Hasher for IdHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.rotate_left(8) ^ u64::from(b);
        }
    }

    fn write_u64(&mut self, n: u64) {
        self.0 = n;
    }
}

/// `BuildHasher` for maps and sets keyed by [`ContentId`].
pub type BuildIdHasher = BuildHasherDefault<IdHasher>;

impl From<[u8; 32]> for ContentId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for ContentId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; 64];
        self.write_hex(&mut buf);
        f.write_str(std::str::from_utf8(&buf).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", &self.to_hex()[..8])
    }
}

impl FromStr for ContentId {
    type Err = HashError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex_decode(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::hash::BuildHasher;

    const TEST_HEX: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";
    const EMPTY_HEX: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ZERO_HEX: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    #[test]
    fn from_hex_valid() {
        let id = ContentId::from_hex(TEST_HEX).unwrap();
        assert_eq!(id.as_bytes()[0], 0x9f);
        assert_eq!(id.to_hex(), TEST_HEX);
    }

    #[test]
    fn from_hex_rejects() {
        assert_eq!(ContentId::from_hex(""), None);
        assert_eq!(ContentId::from_hex("a94a8fe5ccb19ba61c"), None);
        assert_eq!(ContentId::from_hex(&TEST_HEX[..63]), None);
        assert_eq!(ContentId::from_hex(&format!("{TEST_HEX}0")), None);
        let mut bad = TEST_HEX.to_owned();
        bad.replace_range(63..64, "z");
        assert_eq!(ContentId::from_hex(&bad), None);
    }

    #[test]
    fn from_bytes_exact_length() {
        let mut data = [0u8; 32];
        data[0] = 1;
        data[31] = 255;
        let hex = "01000000000000000000000000000000000000000000000000000000000000ff";
        assert_eq!(ContentId::from_bytes(&data).unwrap().to_hex(), hex);
        assert_eq!(ContentId::from(data).to_hex(), hex);
        assert_eq!(ContentId::from_bytes(&data[..31]), None);
        assert_eq!(ContentId::from_bytes(&[0u8; 33]), None);
        assert_eq!(ContentId::from_bytes(&[]), None);
    }

    #[test]
    fn is_bytes_checks_length() {
        assert!(ContentId::is_bytes(b"00000000000000000000000000000000"));
        assert!(!ContentId::is_bytes(b"0000"));
    }

    #[test]
    fn is_hex_checks() {
        assert!(ContentId::is_hex(TEST_HEX));
        assert!(ContentId::is_hex(
            "9f86d081884c7d659A2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        ));
        assert!(!ContentId::is_hex(
            "9f86d081884c7d659A2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a0z"
        ));
        assert!(!ContentId::is_hex(
            "xf86d081884c7d659A2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        ));
        assert!(!ContentId::is_hex("a94a8fe5ccb19ba61c"));
        assert!(!ContentId::is_hex(""));
    }

    #[test]
    fn uppercase_emits_lowercase() {
        let upper = TEST_HEX.to_ascii_uppercase();
        let id = ContentId::from_hex(&upper).unwrap();
        assert_eq!(id.to_hex(), TEST_HEX);
    }

    #[test]
    fn zero_and_bounds() {
        assert_eq!(ContentId::default(), ContentId::ZERO);
        assert_eq!(ContentId::MIN, ContentId::default());
        assert!(ContentId::MIN < ContentId::MAX);
        assert!(ContentId::default().is_null());
        assert!(!ContentId::MAX.is_null());
        assert_eq!(ContentId::ZERO.to_hex(), ZERO_HEX);
        assert_eq!(ContentId::MAX.to_hex(), "f".repeat(64));
    }

    #[test]
    fn ordering_is_bytewise() {
        let mut lo = [0u8; 32];
        let mut hi = [0u8; 32];
        lo[0] = 0x7f;
        lo[31] = 0xff;
        hi[0] = 0x80;
        assert!(ContentId::from(lo) < ContentId::from(hi));
    }

    #[test]
    fn display_and_parse() {
        let id: ContentId = TEST_HEX.parse().unwrap();
        assert_eq!(id.to_string(), TEST_HEX);
        assert_eq!(format!("{id}"), TEST_HEX);
        assert_eq!(format!("{id:?}"), "ContentId(9f86d081)");
    }

    #[test]
    fn parse_reports_errors() {
        let err = "abcd".parse::<ContentId>().unwrap_err();
        assert!(matches!(
            err,
            HashError::InvalidHexLength {
                expected: 64,
                actual: 4
            }
        ));
        let err = "g".repeat(64).parse::<ContentId>().unwrap_err();
        assert!(matches!(err, HashError::InvalidHex { position: 0, .. }));
    }

    #[test]
    fn bytes_roundtrip() {
        let id = ContentId::from_hex(EMPTY_HEX).unwrap();
        assert_eq!(ContentId::from_bytes(&id.to_bytes()), Some(id));
        assert_eq!(id.len(), 32);
    }

    #[test]
    fn id_hash_is_leading_word() {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&0x0123_4567_89ab_cdefu64.to_ne_bytes());
        bytes[31] = 0xff;
        let id = ContentId::from(bytes);
        assert_eq!(BuildIdHasher::default().hash_one(id), 0x0123_4567_89ab_cdef);
    }

    #[test]
    fn id_hasher_folds_other_keys() {
        let mut a = IdHasher::default();
        let mut b = IdHasher::default();
        a.write(b"ab");
        b.write(b"ba");
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn id_keyed_set() {
        let mut set: HashSet<ContentId, BuildIdHasher> = HashSet::default();
        assert!(set.insert(ContentId::MAX));
        assert!(!set.insert(ContentId::from([0xff; 32])));
        assert!(set.insert(ContentId::ZERO));
        assert!(set.contains(&ContentId::default()));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn hashmap_key() {
        let id = ContentId::from_hex(TEST_HEX).unwrap();
        let mut map = HashMap::new();
        map.insert(id, "value");
        assert_eq!(map.get(&id), Some(&"value"));
        assert_eq!(map.get(&ContentId::MAX), None);
    }

    #[test]
    fn object_type_changes_identity() {
        let blob = ContentId::make(ObjectType::Blob, "test").unwrap();
        let tree = ContentId::make(ObjectType::Tree, "test").unwrap();
        assert_ne!(blob, tree);
        assert_ne!(blob, ContentId::from_hex(TEST_HEX).unwrap());
    }
}
