#![no_main]

use libfuzzer_sys::fuzz_target;
use tarsau::{ArchiveReader, ExtractOptions, ExtractPolicy};
use tempfile::TempDir;

fuzz_target!(|data: &[u8]| {
    // Try to parse - should never panic
    let reader = match ArchiveReader::from_bytes(data.to_vec()) {
        Ok(r) => r,
        Err(_) => return, // Expected for invalid data
    };

    // Both framings must tolerate any payload
    let _ = reader.list_files();
    let _ = reader.index();
    let _ = reader.recover(ExtractPolicy::LinePerEntry);
    let _ = reader.recover(ExtractPolicy::Sized);

    // Extraction must stay inside the target directory
    let dir = match TempDir::new() {
        Ok(d) => d,
        Err(_) => return,
    };
    let out = dir.path().join("out");
    if let Ok(written) = reader.extract_to(&out, &ExtractOptions::new()) {
        for path in written {
            assert_eq!(path.parent(), Some(out.as_path()));
        }
    }
});
