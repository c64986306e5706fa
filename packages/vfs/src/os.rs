//! The real filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::path::{clean_path, confine};
use crate::traits::{Filesystem, ReadHandle, WriteHandle};

/// The operating system's filesystem.
///
/// Unrooted (the default), paths are used as given after cleaning. Rooted,
/// every path is resolved beneath the root and `..` cannot climb above it.
///
/// Parent directories are never created: writing below a missing directory
/// fails with `NotFound`.
#[derive(Clone, Debug, Default)]
pub struct OsFilesystem {
    root: Option<PathBuf>,
}

impl OsFilesystem {
    /// The whole filesystem, relative paths resolved against the working
    /// directory.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// A filesystem confined beneath `root`, which must be an existing
    /// directory.
    pub fn rooted(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        let attr = fs::metadata(&root).map_err(|error| {
            io::Error::new(
                error.kind(),
                format!("root path {} is invalid: {}", root.display(), error),
            )
        })?;

        if !attr.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("root path {} must be a directory", root.display()),
            ));
        }

        Ok(Self {
            root: Some(root.canonicalize()?),
        })
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Where `path` lives on disk.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) => root.join(confine(path)),
            None => clean_path(path),
        }
    }
}

impl Filesystem for OsFilesystem {
    fn open(&self, path: &Path) -> io::Result<ReadHandle> {
        let file_path = self.resolve(path);
        tracing::debug!(path = %file_path.display(), "opening file");
        Ok(Box::new(fs::File::open(file_path)?))
    }

    fn create(&self, path: &Path) -> io::Result<WriteHandle> {
        let file_path = self.resolve(path);
        tracing::debug!(path = %file_path.display(), "creating file");
        Ok(Box::new(fs::File::create(file_path)?))
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let file_path = self.resolve(path);
        tracing::debug!(path = %file_path.display(), "reading file");
        fs::read(file_path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let file_path = self.resolve(path);
        tracing::debug!(path = %file_path.display(), bytes = contents.len(), "writing file");
        fs::write(file_path, contents)
    }
}
