//! In-memory filesystem.

use std::collections::BTreeMap;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::path::confine;
use crate::traits::{Filesystem, ReadHandle, WriteHandle};

type Files = Arc<RwLock<BTreeMap<PathBuf, Vec<u8>>>>;

/// A filesystem held entirely in memory.
///
/// Paths are keys: they are confined to the filesystem root, so `/a.yaml`,
/// `a.yaml` and `x/../a.yaml` name the same file. There are no directories;
/// writing `a/b.yaml` needs no `a` to exist.
///
/// Clones share the same files.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use manifold_vfs::{Filesystem, MemoryFilesystem};
///
/// let fs = MemoryFilesystem::new().with_file("pod.yaml", "kind: Pod\n");
/// assert_eq!(fs.read(Path::new("/pod.yaml")).unwrap(), b"kind: Pod\n");
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryFilesystem {
    files: Files,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder style.
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Add or replace a file.
    pub fn insert(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(confine(path.as_ref()), contents.into());
    }

    /// A copy of a file's contents.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&confine(path.as_ref()))
            .cloned()
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&confine(path.as_ref()))
    }

    /// All file paths, in sorted order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.files.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Filesystem for MemoryFilesystem {
    fn open(&self, path: &Path) -> io::Result<ReadHandle> {
        let contents = self.contents(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: file does not exist", path.display()),
            )
        })?;
        Ok(Box::new(Cursor::new(contents)))
    }

    fn create(&self, path: &Path) -> io::Result<WriteHandle> {
        let key = confine(path);
        if key.as_os_str().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{}: cannot create the root", path.display()),
            ));
        }
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), Vec::new());
        Ok(Box::new(MemoryFile {
            files: Arc::clone(&self.files),
            key,
        }))
    }
}

/// Write handle appending straight into the shared map.
struct MemoryFile {
    files: Files,
    key: PathBuf,
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(self.key.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
