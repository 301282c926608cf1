//! Content identifiers and object hashing for the vcs object store.
//!
//! This crate provides the 256-bit [`ContentId`], the streaming
//! [`Builder`] that computes it from a packed header and payload, and hex
//! encoding/decoding.

mod error;
pub mod hex;
mod id;
pub mod builder;
#[cfg(feature = "serde")]
mod serde_impl;

pub use builder::Builder;
pub use error::HashError;
pub use id::{BuildIdHasher, ContentId, IdHasher};
pub use vcs_object::{ObjectType, PackedHeader};
