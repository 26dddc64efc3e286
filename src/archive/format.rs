use crate::error::{Result, SauError};
use std::fs::Metadata;

/// Width of the left-justified decimal entry count at the start of the header
pub const COUNT_WIDTH: usize = 10;

/// Marks both ends of an index record
pub const RECORD_DELIMITER: char = '|';

/// Separates consecutive records when splitting the record region
pub const RECORD_SPLIT: &str = "||";

/// Separates name, mode and size inside a record
pub const FIELD_SEPARATOR: char = ',';

/// Terminates the header line and every payload block
pub const LINE_TERMINATOR: u8 = b'\n';

/// End-of-archive marker (ASCII SUB)
pub const SENTINEL: u8 = 0x1A;

/// Path segment a stored name must contain to be recoverable on extraction.
///
/// The name written to disk on extraction is whatever follows the first
/// occurrence of this segment, up to the field separator. Records whose
/// names lack it are archived but skipped when names are decoded.
pub const NAME_PREFIX: &str = "texts/";

/// Maximum number of input files per archive
pub const MAX_FILES: usize = 32;

/// Header bytes considered when decoding; the rest of the line is dropped
pub const HEADER_CAPACITY: usize = 4096;

/// Default output file name for builds
pub const DEFAULT_ARCHIVE_NAME: &str = "a.sau";

/// Permission bits kept in the index
pub const MODE_MASK: u32 = 0o7777;

/// Permission bits applied to extracted files; special bits are dropped
pub const RESTORE_MASK: u32 = 0o777;

/// Mode recorded when the platform has no POSIX permission bits
#[cfg(not(unix))]
pub const FALLBACK_MODE: u32 = 0o644;

/// One file as described by the archive index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub mode: u32,
    pub size: u64,
}

impl ArchiveEntry {
    /// Create an entry, rejecting names that would break the index grammar
    pub fn new(name: impl Into<String>, mode: u32, size: u64) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            mode: mode & MODE_MASK,
            size,
        })
    }

    /// Build an entry from file metadata
    pub fn from_metadata(name: impl Into<String>, metadata: &Metadata) -> Result<Self> {
        Self::new(name, mode_of(metadata), metadata.len())
    }

    /// Whether extraction will be able to recover this entry's name
    pub fn has_prefix(&self) -> bool {
        extraction_name(&self.name).is_some()
    }

    /// Write the `|name,mode,size|` record
    pub fn encode_record(&self, out: &mut String) {
        out.push(RECORD_DELIMITER);
        out.push_str(&self.name);
        out.push(FIELD_SEPARATOR);
        out.push_str(&format!("{:o}", self.mode));
        out.push(FIELD_SEPARATOR);
        out.push_str(&self.size.to_string());
        out.push(RECORD_DELIMITER);
    }
}

/// Reject names containing a delimiter, the field separator or a line break
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SauError::InvalidName("empty name".to_string()));
    }
    if let Some(c) = name
        .chars()
        .find(|c| matches!(c, '|' | ',' | '\n' | '\r'))
    {
        return Err(SauError::InvalidName(format!(
            "{:?} contains reserved character {:?}",
            name, c
        )));
    }
    Ok(())
}

/// Name a stored entry is extracted under: the text after `texts/`
pub fn extraction_name(stored: &str) -> Option<&str> {
    let start = stored.find(NAME_PREFIX)? + NAME_PREFIX.len();
    Some(&stored[start..])
}

/// Extraction names must stay a single component inside the target directory
pub fn check_extract_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(SauError::UnsafePath(name.to_string()));
    }
    Ok(())
}

#[cfg(unix)]
fn mode_of(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & MODE_MASK
}

#[cfg(not(unix))]
fn mode_of(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        FALLBACK_MODE
    }
}
