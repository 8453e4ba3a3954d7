use super::*;

#[test]
fn finds_nested_ktests_yaml_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
    std::fs::write(dir.path().join("ktests.yaml"), "jobs: {}").unwrap();
    std::fs::write(dir.path().join("a/b/ktests.yaml"), "jobs: {}").unwrap();
    std::fs::write(dir.path().join("a/not-a-workflow.yaml"), "jobs: {}").unwrap();

    let found = scan(dir.path());
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p.file_name().unwrap() == FILENAME));
}

#[test]
fn missing_location_yields_empty_result() {
    let found = scan(Path::new("/does/not/exist"));
    assert!(found.is_empty());
}

#[test]
fn scan_locations_concatenates_each_root() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    std::fs::write(a.path().join("ktests.yaml"), "jobs: {}").unwrap();
    std::fs::write(b.path().join("ktests.yaml"), "jobs: {}").unwrap();

    let found = scan_locations(&[a.path(), b.path()]);
    assert_eq!(found.len(), 2);
}
