//! Path traversal prevention tests
//!
//! Extraction names come straight out of the index line, so a crafted header
//! must never place a file outside the extraction directory.

use std::fs;
use tarsau::{extract_archive, ArchiveReader, ExtractOptions, SauError};
use tempfile::TempDir;

/// Write raw archive bytes and try to extract them
fn extract_raw(bytes: &[u8]) -> (TempDir, Result<Vec<std::path::PathBuf>, SauError>) {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("crafted.sau");
    fs::write(&archive, bytes).unwrap();
    let result = extract_archive(&archive, dir.path().join("out"), &ExtractOptions::new());
    (dir, result)
}

#[test]
fn test_path_traversal_dot_dot() {
    let (dir, result) = extract_raw(b"1         |texts/../evil.txt,644,4|\nevil\n\x1a");

    assert!(matches!(result, Err(SauError::UnsafePath(_))));
    assert!(!dir.path().join("evil.txt").exists());
}

#[test]
fn test_parent_directory_name() {
    let (_dir, result) = extract_raw(b"1         |texts/..,644,4|\nevil\n\x1a");
    assert!(matches!(result, Err(SauError::UnsafePath(_))));
}

#[test]
fn test_nested_name_rejected() {
    let (_dir, result) = extract_raw(b"1         |texts/sub/a.txt,644,1|\na\n\x1a");
    assert!(matches!(result, Err(SauError::UnsafePath(_))));
}

#[test]
fn test_windows_separator_rejected() {
    let (_dir, result) = extract_raw(b"1         |texts/..\\evil.txt,644,4|\nevil\n\x1a");
    assert!(matches!(result, Err(SauError::UnsafePath(_))));
}

#[test]
fn test_empty_name_rejected() {
    let (_dir, result) = extract_raw(b"1         |texts/,644,4|\nevil\n\x1a");
    assert!(matches!(result, Err(SauError::UnsafePath(_))));
}

#[test]
fn test_unsafe_name_aborts_whole_extraction() {
    let (dir, result) =
        extract_raw(b"2         |texts/ok.txt,644,2||texts/../bad,644,3|\nok\nbad\n\x1a");

    assert!(result.is_err());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_absolute_prefix_is_stripped() {
    // Everything before texts/ is dropped, so an absolute stored path lands
    // inside the extraction directory.
    let (dir, result) = extract_raw(b"1         |/etc/texts/passwd,644,4|\nsafe\n\x1a");

    let written = result.unwrap();
    assert_eq!(written, vec![dir.path().join("out").join("passwd")]);
    assert_eq!(fs::read(&written[0]).unwrap(), b"safe");
}

#[test]
fn test_listing_does_not_validate() {
    let reader =
        ArchiveReader::from_bytes(b"1         |texts/../evil.txt,644,4|\nevil\n\x1a".to_vec())
            .unwrap();
    assert_eq!(reader.list_files(), vec!["../evil.txt".to_string()]);
}
