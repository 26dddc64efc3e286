//! tarsau: the `.sau` archive container
//!
//! A `.sau` file is one text index line followed by the raw contents of each
//! archived file:
//!
//! ```text
//! 2         |texts/a.txt,644,5||texts/b.txt,644,5|\n
//! hello\n
//! world\n
//! 0x1A
//! ```
//!
//! - the first 10 bytes hold the entry count, left-justified and space padded
//! - each `|name,mode,size|` record gives the stored name, octal permission
//!   bits and byte length
//! - every payload block is followed by one newline, and the archive ends
//!   with the `0x1A` sentinel
//!
//! Stored names must contain a `texts/` segment: extraction writes each file
//! under the text that follows it and skips records that lack it.
//!
//! # Example
//!
//! ```no_run
//! use tarsau::{build_archive, extract_archive, BuildOptions, ExtractOptions};
//!
//! build_archive("a.sau", &["texts/a.txt", "texts/b.txt"], BuildOptions::new())?;
//! let written = extract_archive("a.sau", "out", &ExtractOptions::new())?;
//! assert_eq!(written.len(), 2);
//! # Ok::<(), tarsau::error::SauError>(())
//! ```

// Core modules
pub mod archive;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use archive::{
    build_archive, extract_archive, ArchiveEntry, ArchiveIndex, ArchiveReader, ArchiveWriter,
    BuildOptions, ExtractOptions, ExtractPolicy, RecoveredFile, COUNT_WIDTH, DEFAULT_ARCHIVE_NAME,
    HEADER_CAPACITY, MAX_FILES, NAME_PREFIX, SENTINEL,
};
pub use error::{Result, SauError};
