use crate::archive::format::{extraction_name, ArchiveEntry, LINE_TERMINATOR, SENTINEL};
use crate::archive::index::ArchiveIndex;
use crate::error::{Result, SauError};
use std::io::{self, Read, Write};

/// Payload block recovered from an archive, bound to its extraction name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredFile {
    pub name: String,
    /// Permission bits; only known when the index was decoded strictly
    pub mode: Option<u32>,
    pub data: Vec<u8>,
}

/// Copy a source verbatim followed by the entry terminator.
///
/// Returns the number of content bytes copied (terminator excluded).
pub fn write_entry<R: Read, W: Write>(mut source: R, mut writer: W) -> io::Result<u64> {
    let copied = io::copy(&mut source, &mut writer)?;
    writer.write_all(&[LINE_TERMINATOR])?;
    Ok(copied)
}

/// Mark the end of the archive
pub fn write_sentinel<W: Write>(mut writer: W) -> io::Result<()> {
    writer.write_all(&[SENTINEL])
}

/// One-line-per-entry framing.
///
/// Each entry's content is the next line of the payload. Content that
/// spanned several lines is cut to its first line, and the following lines
/// are handed to the next entries in turn. Lines are consumed by position,
/// so names skipped during index decoding shift content onto later names.
#[derive(Debug)]
pub struct LineFramer<'a> {
    remaining: &'a [u8],
}

impl<'a> LineFramer<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        let remaining = payload.strip_suffix(&[SENTINEL]).unwrap_or(payload);
        Self { remaining }
    }

    /// Next line without its terminator; empty once the payload is exhausted
    pub fn next_block(&mut self) -> &'a [u8] {
        match self.remaining.iter().position(|&b| b == LINE_TERMINATOR) {
            Some(end) => {
                let line = &self.remaining[..end];
                self.remaining = &self.remaining[end + 1..];
                line
            }
            None => std::mem::take(&mut self.remaining),
        }
    }

    /// Pair each name with the next line
    pub fn recover(mut self, names: Vec<String>) -> Vec<RecoveredFile> {
        names
            .into_iter()
            .map(|name| RecoveredFile {
                name,
                mode: None,
                data: self.next_block().to_vec(),
            })
            .collect()
    }
}

/// Length-driven framing using the sizes stored in the index.
///
/// Reads exactly `size` bytes per entry regardless of embedded newlines,
/// then expects the terminator. The sentinel must follow the last block.
#[derive(Debug)]
pub struct SizedFramer<'a> {
    remaining: &'a [u8],
}

impl<'a> SizedFramer<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { remaining: payload }
    }

    pub fn next_block(&mut self, entry: &ArchiveEntry) -> Result<&'a [u8]> {
        let size = usize::try_from(entry.size).map_err(|_| SauError::TruncatedPayload {
            name: entry.name.clone(),
        })?;

        if self.remaining.len() <= size {
            return Err(SauError::TruncatedPayload {
                name: entry.name.clone(),
            });
        }

        let (block, rest) = self.remaining.split_at(size);
        if rest[0] != LINE_TERMINATOR {
            return Err(SauError::InvalidFormat(format!(
                "entry {:?} is not followed by a line terminator",
                entry.name
            )));
        }

        self.remaining = &rest[1..];
        Ok(block)
    }

    /// Check that only the sentinel is left
    pub fn finish(self) -> Result<()> {
        match self.remaining {
            [SENTINEL] => Ok(()),
            [SENTINEL, rest @ ..] => Err(SauError::InvalidFormat(format!(
                "{} trailing bytes after end-of-archive marker",
                rest.len()
            ))),
            _ => Err(SauError::MissingSentinel),
        }
    }

    /// Read every block; entries without the name prefix are skipped
    pub fn recover(mut self, index: &ArchiveIndex) -> Result<Vec<RecoveredFile>> {
        let mut files = Vec::with_capacity(index.count());
        for entry in index.entries() {
            let block = self.next_block(entry)?;
            if let Some(name) = extraction_name(&entry.name) {
                files.push(RecoveredFile {
                    name: name.to_string(),
                    mode: Some(entry.mode),
                    data: block.to_vec(),
                });
            }
        }
        self.finish()?;
        Ok(files)
    }
}
