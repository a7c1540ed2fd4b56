//! Error types, split the same way a low-level storage error is kept
//! separate from a crate-level one elsewhere in this codebase: `HeapError`
//! covers arena/allocation failures, `LookupError` covers the
//! missing-artifact kinds and is what the `*_unsafe` reader methods return.
//! Invariant violations are not modeled as error variants at all — they are
//! programmer errors and are reported with `panic!`/`unreachable!` at the
//! point of violation.

use crate::keys::ModuleName;

/// Failures at the allocation/arena layer.
#[derive(thiserror::Error, Debug)]
pub enum HeapError {
    #[error("arena handle does not refer to a live record")]
    StaleHandle,
    #[error("heap allocation failed: {0}")]
    OutOfSpace(String),
}

/// The artifact-lookup failures a caller can hit via a `*_unsafe` reader
/// method.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum LookupError {
    #[error("file not found")]
    FileNotFound,
    #[error("file has no parse (cleared or never parsed)")]
    FileNotParsed,
    #[error("file has only an untyped parse")]
    FileNotTyped,
    #[error("AST not found for this file's current parse")]
    AstNotFound,
    #[error("aloc table not found for this file's current parse")]
    AlocTableNotFound,
    #[error("docblock not found for this file's current parse")]
    DocblockNotFound,
    #[error("file-sig (requires) not found for this file's current parse")]
    RequiresNotFound,
    #[error("type-sig not found for this file's current parse")]
    TypeSigNotFound,
    #[error("no haste module named {0:?}")]
    HasteModuleNotFound(String),
    #[error("no file module for {0:?}")]
    FileModuleNotFound(ModuleName),
}

pub type LookupResult<T> = Result<T, LookupError>;
