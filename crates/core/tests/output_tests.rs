use std::fs;

use restorer_core::prepare_output_root;
use tempfile::tempdir;

#[tokio::test]
async fn creates_missing_directory() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("a/b/c");
    prepare_output_root(&nested).await.expect("should create dirs");
    assert!(nested.is_dir());
}

#[tokio::test]
async fn ok_if_directory_exists() {
    let dir = tempdir().unwrap();
    prepare_output_root(dir.path()).await.expect("existing dir should be ok");
}

#[tokio::test]
async fn error_if_path_is_file() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("file.txt");
    fs::write(&file_path, "data").unwrap();
    let err = prepare_output_root(&file_path)
        .await
        .expect_err("should error when path is a file");
    assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
}
