use super::*;

#[test]
fn metadata_round_trips_through_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metadata.yaml");
    let original = BatchMetadata {
        id: "123456".to_string(),
        backend: "slurm".to_string(),
    };

    write_metadata(&path, &original).unwrap();
    let loaded = read_metadata(&path).unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_metadata(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, BatchError::Io { .. }));
}
