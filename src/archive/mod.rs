mod format;
mod index;
mod options;
mod payload;
mod reader;
mod writer;

pub use format::{
    check_extract_name, extraction_name, validate_name, ArchiveEntry, COUNT_WIDTH,
    DEFAULT_ARCHIVE_NAME, FIELD_SEPARATOR, HEADER_CAPACITY, LINE_TERMINATOR, MAX_FILES,
    NAME_PREFIX, RECORD_DELIMITER, RECORD_SPLIT, RESTORE_MASK, SENTINEL,
};
pub use index::{bound_header, decode_names, parse_count, ArchiveIndex};
pub use options::{BuildOptions, ExtractOptions, ExtractPolicy};
pub use payload::{write_entry, write_sentinel, LineFramer, RecoveredFile, SizedFramer};
pub use reader::{extract_archive, ArchiveReader};
pub use writer::{build_archive, ArchiveWriter};
