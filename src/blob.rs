//! Opaque serialized artifacts.
//!
//! AST, docblock, file-sig, type-sig, aloc-table and exports blobs are, from
//! this store's perspective, just byte strings: the parser, the
//! type-signature binary encoder and the location-table packer all live
//! outside this crate. The store only keeps and hands back the bytes a
//! worker handed it.
//!
//! `Arc<[u8]>` rather than `Vec<u8>` so that a `Parse` record's blobs can be
//! handed to multiple readers (mutator reader, committed reader, and any
//! local cache keyed by file) without copying.

use std::sync::Arc;

pub type Blob = Arc<[u8]>;

/// The shape external collaborators (parser, signature encoder, location
/// packer) must expose to produce/consume a [`Blob`] for one artifact kind.
/// Not used internally — this crate never decodes a blob — but documents the
/// boundary between the store and those collaborators.
pub trait ArtifactCodec {
    type Value;
    fn encode(value: &Self::Value) -> Blob;
    fn decode(blob: &Blob) -> Option<Self::Value>;
}
