use assert_fs::TempDir;
use episode_mover::Config;
use std::fs;

#[test]
fn library_base_is_created_when_missing() {
    let td = TempDir::new().unwrap();
    let root = dunce::canonicalize(td.path()).unwrap();
    let library = root.join("TV").join("nested");
    assert!(!library.exists());

    Config::new(&library)
        .validate()
        .expect("validation creates the library base");
    assert!(library.is_dir());
}

#[test]
fn existing_library_is_left_clean() {
    let td = TempDir::new().unwrap();
    let root = dunce::canonicalize(td.path()).unwrap();
    let library = root.join("TV");
    fs::create_dir_all(library.join("Show")).unwrap();

    Config::new(&library).validate().unwrap();
    let names: Vec<_> = fs::read_dir(&library)
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("Show")]);
}

#[test]
fn empty_library_base_is_rejected() {
    let err = Config::new("").validate().unwrap_err();
    assert!(format!("{err}").contains("empty"), "{err}");
}

#[test]
fn worker_count_checked_before_touching_disk() {
    let td = TempDir::new().unwrap();
    let library = td.path().join("never_created");
    let mut cfg = Config::new(&library);
    cfg.workers = 0;
    assert!(cfg.validate().is_err());
    assert!(!library.exists());
}
