use std::fmt;

use digest::typenum::Unsigned;
use digest::{Digest, OutputSizeUser};
use vcs_object::{ObjectType, PackedHeader};

use crate::{ContentId, HashError};

/// Hash engine behind every content id.
type Engine = sha2::Sha256;

const _: () = assert!(<<Engine as OutputSizeUser>::OutputSize as Unsigned>::USIZE == ContentId::LEN);

/// Streaming content id computation.
///
/// The SHA-256 state is held inline; a builder never allocates. Data can be
/// fed incrementally, by value with [`append`](Builder::append) for chaining
/// or in place with [`update`](Builder::update) and the [`std::io::Write`]
/// implementation. Splitting the input across calls does not change the
/// result. [`build`](Builder::build) consumes the builder.
///
/// For a canonical object id the packed header must be fed before any
/// payload; [`Builder::for_object`] does that.
#[derive(Clone, Default)]
pub struct Builder {
    engine: Engine,
}

impl Builder {
    /// Create a fresh builder.
    pub fn new() -> Self {
        Self {
            engine: Engine::new(),
        }
    }

    /// Create a builder already seeded with the header for an object of
    /// type `ty` holding `size` bytes. Feed exactly `size` payload bytes next.
    pub fn for_object(ty: ObjectType, size: u64) -> Result<Self, HashError> {
        let header = PackedHeader::new(ty, size)?;
        Ok(Self::new().append_header(header))
    }

    /// Feed the encoded bytes of `header`.
    pub fn append_header(mut self, header: PackedHeader) -> Self {
        self.update_header(header);
        self
    }

    /// Feed raw bytes.
    pub fn append(mut self, data: impl AsRef<[u8]>) -> Self {
        self.update(data);
        self
    }

    /// Feed the encoded bytes of `header` in place.
    pub fn update_header(&mut self, header: PackedHeader) {
        self.engine.update(header.as_bytes());
    }

    /// Feed raw bytes in place.
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        self.engine.update(data.as_ref());
    }

    /// Finalize and return the id.
    pub fn build(self) -> ContentId {
        let digest = self.engine.finalize();
        let mut bytes = [0u8; ContentId::LEN];
        bytes.copy_from_slice(digest.as_slice());
        ContentId::from(bytes)
    }

    /// Convenience: hash raw data in one call, without a header.
    pub fn digest(data: impl AsRef<[u8]>) -> ContentId {
        Self::new().append(data).build()
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder").finish_non_exhaustive()
    }
}

impl std::io::Write for Builder {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
