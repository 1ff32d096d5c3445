use std::fs;
use std::path::Path;

use restorer_core::{MemorySink, SourceSink, TreeWriter, WriteFailure};
use tempfile::tempdir;

#[tokio::test]
async fn creates_missing_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("src/components/deep/App.jsx");
    TreeWriter::new().write(&path, "export default 1;\n").await.unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "export default 1;\n");
}

#[tokio::test]
async fn replaces_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.js");
    fs::write(&path, "old").unwrap();
    TreeWriter::new().write(&path, "new").await.unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "new");
}

#[tokio::test]
async fn directory_failure_skips_write() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("src"), "i am a file").unwrap();
    let path = dir.path().join("src/a.js");
    let err = TreeWriter::new().write(&path, "x").await.unwrap_err();
    assert!(matches!(err, WriteFailure::DirectoryCreateFailed { .. }));
    assert_eq!(fs::read_to_string(dir.path().join("src")).unwrap(), "i am a file");
}

#[tokio::test]
async fn write_failure_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("taken");
    fs::create_dir(&path).unwrap();
    let err = TreeWriter::new().write(&path, "x").await.unwrap_err();
    assert!(matches!(err, WriteFailure::WriteFailed { .. }));
}

#[tokio::test]
async fn sibling_writes_race_on_shared_ancestor() {
    let dir = tempdir().unwrap();
    let writer = TreeWriter::new();
    let a = dir.path().join("new/shared/a.js");
    let b = dir.path().join("new/shared/b.js");
    let (ra, rb) = tokio::join!(writer.write(&a, "a"), writer.write(&b, "b"));
    ra.unwrap();
    rb.unwrap();
    assert_eq!(fs::read_to_string(a).unwrap(), "a");
    assert_eq!(fs::read_to_string(b).unwrap(), "b");
}

#[tokio::test]
async fn memory_sink_records_and_fails_on_demand() {
    let sink = MemorySink::new();
    sink.write(Path::new("out/a.js"), "A").await.unwrap();
    sink.fail_on("out/b.js").await;
    let err = sink.write(Path::new("out/b.js"), "B").await.unwrap_err();
    assert!(matches!(err, WriteFailure::WriteFailed { .. }));
    assert_eq!(sink.get(Path::new("out/a.js")).await.as_deref(), Some("A"));
    assert_eq!(sink.len().await, 1);
}
