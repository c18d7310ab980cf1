#![forbid(unsafe_code)]

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    NotFound {
        path: PathBuf,
    },
    NotADirectory {
        path: PathBuf,
    },
    Io {
        op: &'static str,
        path: PathBuf,
        detail: String,
    },
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "not found: {}", path.display()),
            Self::NotADirectory { path } => write!(f, "not a directory: {}", path.display()),
            Self::Io { op, path, detail } => {
                write!(f, "io error: {op} {} ({detail})", path.display())
            }
        }
    }
}

impl std::error::Error for AdapterError {}

/// Read-only filesystem port. Relative paths are resolved against the
/// invocation root so core logic never touches the process cwd directly.
pub trait Fs {
    fn read_text(&self, root: &Path, path: &Path) -> Result<String, AdapterError>;
    fn exists(&self, root: &Path, path: &Path) -> bool;
    fn is_dir(&self, root: &Path, path: &Path) -> bool;
    /// Immediate children of `path`, lexicographically sorted.
    fn list_dir(&self, root: &Path, path: &Path) -> Result<Vec<PathBuf>, AdapterError>;
}

pub fn resolve_from_root(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[derive(Debug, Default)]
pub struct RealFs;

impl Fs for RealFs {
    fn read_text(&self, root: &Path, path: &Path) -> Result<String, AdapterError> {
        let target = resolve_from_root(root, path);
        fs::read_to_string(&target).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                AdapterError::NotFound { path: target }
            } else {
                AdapterError::Io {
                    op: "read_to_string",
                    path: target,
                    detail: err.to_string(),
                }
            }
        })
    }

    fn exists(&self, root: &Path, path: &Path) -> bool {
        resolve_from_root(root, path).exists()
    }

    fn is_dir(&self, root: &Path, path: &Path) -> bool {
        resolve_from_root(root, path).is_dir()
    }

    fn list_dir(&self, root: &Path, path: &Path) -> Result<Vec<PathBuf>, AdapterError> {
        let target = resolve_from_root(root, path);
        if !target.is_dir() {
            return Err(AdapterError::NotADirectory { path: target });
        }
        let entries = fs::read_dir(&target).map_err(|err| AdapterError::Io {
            op: "read_dir",
            path: target.clone(),
            detail: err.to_string(),
        })?;
        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| AdapterError::Io {
                op: "read_dir",
                path: target.clone(),
                detail: err.to_string(),
            })?;
            out.push(entry.path());
        }
        out.sort();
        Ok(out)
    }
}
