//! Index codec for the archive header line.
//!
//! Grammar (one line, terminated by `\n`):
//!
//! ```text
//! header  := count records
//! count   := decimal, left-justified, space-padded to 10 bytes
//! records := { "|" name "," mode "," size "|" }
//! mode    := octal permission bits
//! size    := decimal byte length
//! ```
//!
//! Records are split on `||`, which only separates records written back to
//! back. Names never contain `|` or `,` (see [`validate_name`]), so the split
//! is unambiguous for archives this crate writes.
//!
//! Two decode paths exist. [`decode_names`] is what extraction uses by
//! default: it only recovers names that contain the `texts/` segment and
//! silently skips every other record. [`ArchiveIndex::decode`] parses mode and
//! size as well, for callers that need a strict round-trip.
//!
//! [`validate_name`]: crate::archive::format::validate_name

use crate::archive::format::{
    ArchiveEntry, COUNT_WIDTH, FIELD_SEPARATOR, HEADER_CAPACITY, LINE_TERMINATOR, MAX_FILES,
    NAME_PREFIX, RECORD_DELIMITER, RECORD_SPLIT,
};
use crate::error::{Result, SauError};
use std::io::Write;

/// Ordered entry list written as the archive header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveIndex {
    entries: Vec<ArchiveEntry>,
}

impl ArchiveIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<ArchiveEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: ArchiveEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Count field value; always the number of entries
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode the header line, newline included
    pub fn encode(&self) -> Vec<u8> {
        let mut line = format!("{:<width$}", self.count(), width = COUNT_WIDTH);
        for entry in &self.entries {
            entry.encode_record(&mut line);
        }
        let mut bytes = line.into_bytes();
        bytes.push(LINE_TERMINATOR);
        bytes
    }

    /// Write the header line and return the number of bytes written
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<usize> {
        let bytes = self.encode();
        writer.write_all(&bytes)?;
        Ok(bytes.len())
    }

    /// Strict decode: every record must parse and the count must match.
    pub fn decode(header: &[u8]) -> Result<Self> {
        let count = parse_count(header)?;
        let region = record_region(header);

        let mut entries = Vec::with_capacity(count.min(MAX_FILES));
        for token in region.split(RECORD_SPLIT).filter(|t| !t.is_empty()) {
            entries.push(parse_record(token)?);
        }

        if entries.len() != count {
            return Err(SauError::InvalidFormat(format!(
                "header declares {} entries but {} records were found",
                count,
                entries.len()
            )));
        }

        Ok(Self { entries })
    }
}

/// Clamp a raw header line to [`HEADER_CAPACITY`] bytes.
///
/// Bytes past the capacity are dropped without an error; records cut off by
/// the boundary are lost or shortened.
pub fn bound_header(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(&[LINE_TERMINATOR]).unwrap_or(line);
    &line[..line.len().min(HEADER_CAPACITY)]
}

/// Parse the entry count from the first 10 bytes of the header
pub fn parse_count(header: &[u8]) -> Result<usize> {
    if header.len() < COUNT_WIDTH {
        return Err(SauError::HeaderTooShort(header.len()));
    }

    let field = String::from_utf8_lossy(&header[..COUNT_WIDTH]);
    let digits = field.trim_matches(' ');
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SauError::InvalidCount(field.into_owned()));
    }

    digits
        .parse()
        .map_err(|_| SauError::InvalidCount(field.to_string()))
}

/// Recover the extraction names from the header, in index order.
///
/// Only tokens containing `texts/` followed later by `,` yield a name; the
/// name is the text between the two. Anything else is skipped.
pub fn decode_names(header: &[u8]) -> Vec<String> {
    record_region(header)
        .split(RECORD_SPLIT)
        .filter_map(name_in_record)
        .map(str::to_string)
        .collect()
}

fn record_region(header: &[u8]) -> String {
    if header.len() <= COUNT_WIDTH {
        return String::new();
    }
    String::from_utf8_lossy(&header[COUNT_WIDTH..]).into_owned()
}

fn name_in_record(token: &str) -> Option<&str> {
    let start = token.find(NAME_PREFIX)? + NAME_PREFIX.len();
    let rest = &token[start..];
    let end = rest.find(FIELD_SEPARATOR)?;
    Some(&rest[..end])
}

fn parse_record(token: &str) -> Result<ArchiveEntry> {
    let body = token.strip_prefix(RECORD_DELIMITER).unwrap_or(token);
    let body = body.strip_suffix(RECORD_DELIMITER).unwrap_or(body);

    let malformed = || SauError::InvalidFormat(format!("malformed index record {:?}", token));

    let mut fields = body.rsplitn(3, FIELD_SEPARATOR);
    let size = fields.next().ok_or_else(malformed)?;
    let mode = fields.next().ok_or_else(malformed)?;
    let name = fields.next().ok_or_else(malformed)?;

    let mode = u32::from_str_radix(mode, 8).map_err(|_| malformed())?;
    let size = size.parse::<u64>().map_err(|_| malformed())?;

    ArchiveEntry::new(name, mode, size)
}
