//! The Filesystem trait.

use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

/// A readable handle returned by [`Filesystem::open`].
pub type ReadHandle = Box<dyn Read + Send>;

/// A writable handle returned by [`Filesystem::create`].
pub type WriteHandle = Box<dyn Write + Send>;

/// A filesystem that manifests can be read from and written to.
///
/// Implementations decide how paths map to storage. Callers are expected to
/// pass lexically clean paths (see [`clean_path`](crate::clean_path)).
///
/// # Object Safety
///
/// This trait is object-safe: you can use `&dyn Filesystem` or
/// `Arc<dyn Filesystem>`.
pub trait Filesystem: Send + Sync {
    /// Open an existing file for reading.
    ///
    /// Fails with `io::ErrorKind::NotFound` if the file does not exist.
    fn open(&self, path: &Path) -> io::Result<ReadHandle>;

    /// Create a file for writing, truncating it if it exists.
    fn create(&self, path: &Path) -> io::Result<WriteHandle>;

    /// Read a whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let mut file = self.open(path)?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Replace a file's contents.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = self.create(path)?;
        file.write_all(contents)?;
        file.flush()
    }
}

// Blanket implementations for references and smart pointers

impl<T: Filesystem + ?Sized> Filesystem for &T {
    fn open(&self, path: &Path) -> io::Result<ReadHandle> {
        (**self).open(path)
    }

    fn create(&self, path: &Path) -> io::Result<WriteHandle> {
        (**self).create(path)
    }
}

impl<T: Filesystem + ?Sized> Filesystem for Box<T> {
    fn open(&self, path: &Path) -> io::Result<ReadHandle> {
        (**self).open(path)
    }

    fn create(&self, path: &Path) -> io::Result<WriteHandle> {
        (**self).create(path)
    }
}

impl<T: Filesystem + ?Sized> Filesystem for Arc<T> {
    fn open(&self, path: &Path) -> io::Result<ReadHandle> {
        (**self).open(path)
    }

    fn create(&self, path: &Path) -> io::Result<WriteHandle> {
        (**self).create(path)
    }
}
