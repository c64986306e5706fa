//! OverlayFilesystem: stack filesystems with read fallthrough.

use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::traits::{Filesystem, ReadHandle, WriteHandle};

/// Wraps a filesystem to reject all writes.
pub struct ReadOnly<F> {
    inner: F,
}

impl<F> ReadOnly<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: Filesystem> Filesystem for ReadOnly<F> {
    fn open(&self, path: &Path) -> io::Result<ReadHandle> {
        self.inner.open(path)
    }

    fn create(&self, path: &Path) -> io::Result<WriteHandle> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("{}: filesystem is read-only", path.display()),
        ))
    }
}

/// Layered filesystems, searched from the top layer down.
///
/// Reads go to the topmost layer that has the file: a `NotFound` from one
/// layer falls through to the next, any other error stops the search.
/// Writes always land on the top layer, so lower layers are never modified.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use manifold_vfs::{Filesystem, MemoryFilesystem, OverlayFilesystem};
///
/// let base = MemoryFilesystem::new().with_file("a.yaml", "base");
/// let scratch = MemoryFilesystem::new();
/// let overlay = OverlayFilesystem::new(base.clone()).with_layer(scratch.clone());
///
/// overlay.write(Path::new("a.yaml"), b"patched").unwrap();
/// assert_eq!(overlay.read(Path::new("a.yaml")).unwrap(), b"patched");
/// assert_eq!(base.contents("a.yaml").unwrap(), b"base");
/// ```
#[derive(Clone)]
pub struct OverlayFilesystem {
    // Bottom first.
    layers: Vec<Arc<dyn Filesystem>>,
}

impl OverlayFilesystem {
    /// Create an overlay with a single base layer.
    pub fn new<F: Filesystem + 'static>(base: F) -> Self {
        Self {
            layers: vec![Arc::new(base)],
        }
    }

    /// Add a layer on top, builder style.
    pub fn with_layer<F: Filesystem + 'static>(mut self, layer: F) -> Self {
        self.push_layer(layer);
        self
    }

    /// Add a layer on top.
    pub fn push_layer<F: Filesystem + 'static>(&mut self, layer: F) {
        self.layers.push(Arc::new(layer));
    }

    /// Add an already shared layer on top.
    pub fn push_shared(&mut self, layer: Arc<dyn Filesystem>) {
        self.layers.push(layer);
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn top(&self) -> &Arc<dyn Filesystem> {
        // `new` guarantees at least one layer.
        &self.layers[self.layers.len() - 1]
    }
}

impl Filesystem for OverlayFilesystem {
    fn open(&self, path: &Path) -> io::Result<ReadHandle> {
        for (depth, layer) in self.layers.iter().rev().enumerate() {
            match layer.open(path) {
                Ok(handle) => {
                    tracing::trace!(path = %path.display(), depth, "overlay hit");
                    return Ok(handle);
                }
                Err(error) if error.kind() == io::ErrorKind::NotFound => continue,
                Err(error) => return Err(error),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{}: not found in any layer", path.display()),
        ))
    }

    fn create(&self, path: &Path) -> io::Result<WriteHandle> {
        self.top().create(path)
    }
}
