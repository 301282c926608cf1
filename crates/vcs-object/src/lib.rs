//! Object types and the packed type/size header.
//!
//! Every object in the store is framed as `[packed header][payload]`. The
//! header carries the [`ObjectType`] and the payload length in 1 to 7 bytes,
//! and the same bytes seed the content hash computed by `vcs-hash`.

pub mod header;

pub use header::PackedHeader;

/// Errors produced by object type and header operations.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("object size {size} exceeds the 48-bit header limit")]
    InvalidSize { size: u64 },

    #[error("invalid object type: {0}")]
    InvalidType(String),

    #[error("invalid object header: {0}")]
    InvalidHeader(String),

    #[error("truncated object header: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// Kinds of objects held by the store.
///
/// The discriminants are a stable wire format: they occupy the low nibble
/// of every packed header and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum ObjectType {
    /// Absent value.
    #[default]
    None = 0,
    /// Content object.
    Blob = 1,
    /// Tree object.
    Tree = 2,
    /// Commit object.
    Commit = 3,
    /// History adjustment object.
    Renames = 4,
    /// Tag object.
    Tag = 5,
}

impl ObjectType {
    /// Every variant, in wire-value order.
    pub const ALL: [ObjectType; 6] = [
        Self::None,
        Self::Blob,
        Self::Tree,
        Self::Commit,
        Self::Renames,
        Self::Tag,
    ];

    /// Look up a type by its wire value.
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Blob),
            2 => Some(Self::Tree),
            3 => Some(Self::Commit),
            4 => Some(Self::Renames),
            5 => Some(Self::Tag),
            _ => None,
        }
    }

    /// The wire value.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Lowercase name of the type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Renames => "renames",
            Self::Tag => "tag",
        }
    }

    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ObjectType {
    type Err = ObjectError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| ObjectError::InvalidType(s.to_owned()))
    }
}

/// Compression applied by the storage layer to an object's payload.
///
/// Only recorded next to a header; nothing in this crate compresses data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Compression {
    None = 1,
    Lz4 = 2,
}

impl Compression {
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::None),
            2 => Some(Self::Lz4),
            _ => None,
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Lz4 => "lz4",
        })
    }
}
