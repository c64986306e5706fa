//! Manifold VFS: pluggable filesystems for loading and writing manifests.
//!
//! - `Filesystem`: the capability the loader is handed (`open`, `create`)
//! - `OsFilesystem`: the real filesystem, optionally confined to a root
//! - `MemoryFilesystem`: files held in memory, for tests and embedding
//! - `OverlayFilesystem`: layered filesystems with read fallthrough
//! - `clean_path`: lexical `.`/`..` elimination
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use manifold_vfs::{Filesystem, MemoryFilesystem};
//!
//! fn load(fs: &dyn Filesystem) -> std::io::Result<Vec<u8>> {
//!     fs.read(Path::new("policies/require-labels.yaml"))
//! }
//!
//! let fs = MemoryFilesystem::new().with_file("policies/require-labels.yaml", "kind: Policy\n");
//! assert_eq!(load(&fs).unwrap(), b"kind: Policy\n");
//! ```

mod memory;
mod os;
mod overlay;
mod path;
mod traits;

pub use memory::MemoryFilesystem;
pub use os::OsFilesystem;
pub use overlay::{OverlayFilesystem, ReadOnly};
pub use path::clean_path;
pub use traits::{Filesystem, ReadHandle, WriteHandle};
