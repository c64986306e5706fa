use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use manifold_vfs::{Filesystem, MemoryFilesystem, OsFilesystem, OverlayFilesystem, ReadOnly};

#[test]
fn disk_base_with_memory_scratch() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("policies")).unwrap();
    fs::write(dir.path().join("policies/require-labels.yaml"), "kind: ClusterPolicy\n").unwrap();

    let scratch = MemoryFilesystem::new();
    let overlay = OverlayFilesystem::new(ReadOnly::new(OsFilesystem::rooted(dir.path()).unwrap()))
        .with_layer(scratch.clone());

    let policy = overlay
        .read(Path::new("policies/require-labels.yaml"))
        .unwrap();
    assert_eq!(policy, b"kind: ClusterPolicy\n");

    overlay
        .write(Path::new("policies/require-labels.yaml"), b"kind: Policy\n")
        .unwrap();
    assert_eq!(
        overlay.read(Path::new("policies/require-labels.yaml")).unwrap(),
        b"kind: Policy\n"
    );
    assert_eq!(
        fs::read(dir.path().join("policies/require-labels.yaml")).unwrap(),
        b"kind: ClusterPolicy\n"
    );
    assert_eq!(scratch.len(), 1);
}

#[test]
fn read_only_base_alone_rejects_writes() {
    let dir = tempfile::tempdir().unwrap();
    let overlay = OverlayFilesystem::new(ReadOnly::new(OsFilesystem::rooted(dir.path()).unwrap()));

    let err = overlay.write(Path::new("a.yaml"), b"x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert!(!dir.path().join("a.yaml").exists());
}

#[test]
fn rooted_paths_cannot_escape() {
    let outer = tempfile::tempdir().unwrap();
    let inner = outer.path().join("inner");
    fs::create_dir(&inner).unwrap();
    fs::write(outer.path().join("secret.yaml"), "kind: Secret\n").unwrap();

    let rooted = OsFilesystem::rooted(&inner).unwrap();
    let err = rooted.read(Path::new("../secret.yaml")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn shared_filesystems() {
    let memory = std::sync::Arc::new(MemoryFilesystem::new());
    let as_dyn: std::sync::Arc<dyn Filesystem> = memory.clone();

    as_dyn.write(Path::new("a.yaml"), b"kind: A\n").unwrap();
    assert_eq!(memory.contents("a.yaml").unwrap(), b"kind: A\n");
}
