//! A concurrent, transactional shared-memory store for an incremental
//! type checker's per-file parse artifacts and module-resolution graph.
//!
//! A store keeps, per source file, its hash, declared "haste" module name,
//! AST, docblock, signatures, and location table, plus the two module
//! tables (`file-path -> FileModule`, `haste-name -> HasteModule`) those
//! files provide. Workers publish artifacts in parallel; a single master
//! commits or rolls back a batch atomically. See [`store::Store`] for the
//! shared state, [`mutators`] for the write side, and [`readers`] for the
//! read side.
//!
//! What this crate does *not* do: durable on-disk persistence, multi-writer
//! concurrency on the same file key, cross-host distribution, or querying
//! or indexing of AST content. Parsing, type-signature encoding, and
//! location-table packing are external collaborators — this crate only
//! stores and hands back the bytes they produce (see [`blob`]).

pub mod arena;
pub mod blob;
pub mod cache;
pub mod cancellation;
pub mod config;
pub mod dirty;
pub mod entity;
pub mod error;
pub mod interner;
pub mod keys;
pub mod metrics;
pub mod mutators;
pub mod readers;
pub mod records;
pub mod store;
pub mod transaction;

pub use blob::Blob;
pub use config::StoreConfig;
pub use dirty::DirtySet;
pub use error::{HeapError, LookupError, LookupResult};
pub use keys::{FileKey, ModuleName};
pub use store::Store;
