//! Keys: `FileKey` and `ModuleName`.

use std::fmt;
use std::path::PathBuf;

/// Identifies a storable unit of source on disk (or, for `Builtins`, a
/// synthetic one that is never stored — see [`FileKey::is_storable`]).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileKey {
    Source(PathBuf),
    Json(PathBuf),
    Resource(PathBuf),
    Lib(PathBuf),
    Builtins,
}

impl FileKey {
    /// Builtins are synthetic and never storable.
    pub fn is_storable(&self) -> bool {
        !matches!(self, FileKey::Builtins)
    }

    /// Lib files never get an eponymous file-module.
    pub fn has_eponymous_file_module(&self) -> bool {
        !matches!(self, FileKey::Lib(_))
    }

    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            FileKey::Source(p) | FileKey::Json(p) | FileKey::Resource(p) | FileKey::Lib(p) => {
                Some(p)
            }
            FileKey::Builtins => None,
        }
    }
}

impl fmt::Debug for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKey::Source(p) => write!(f, "Source({})", p.display()),
            FileKey::Json(p) => write!(f, "Json({})", p.display()),
            FileKey::Resource(p) => write!(f, "Resource({})", p.display()),
            FileKey::Lib(p) => write!(f, "Lib({})", p.display()),
            FileKey::Builtins => write!(f, "Builtins"),
        }
    }
}

/// Identifies a module: either by a declared "haste" name, or by the path of
/// the file that provides it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ModuleName {
    Haste(String),
    File(FileKey),
}

impl fmt::Debug for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleName::Haste(name) => write!(f, "Haste({name:?})"),
            ModuleName::File(key) => write!(f, "File({key:?})"),
        }
    }
}
