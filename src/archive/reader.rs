use crate::archive::format::{check_extract_name, HEADER_CAPACITY, LINE_TERMINATOR};
use crate::archive::index::{bound_header, decode_names, parse_count, ArchiveIndex};
use crate::archive::options::{ExtractOptions, ExtractPolicy};
use crate::archive::payload::{LineFramer, RecoveredFile, SizedFramer};
use crate::error::{Result, SauError};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Archive reader.
///
/// The whole archive is loaded into memory on open. Only the entry count is
/// validated eagerly; records and payload are decoded on demand according to
/// the chosen [`ExtractPolicy`].
#[derive(Debug)]
pub struct ArchiveReader {
    data: Vec<u8>,
    header_len: usize,
    count: usize,
}

impl ArchiveReader {
    /// Open an archive file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => return Err(SauError::NotAnArchive(path.to_path_buf())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SauError::NotAnArchive(path.to_path_buf()))
            }
            Err(e) => return Err(SauError::file(path, e)),
        }

        let data = fs::read(path).map_err(|e| SauError::file(path, e))?;
        debug!(path = %path.display(), bytes = data.len(), "loaded archive");
        Self::from_bytes(data)
    }

    /// Parse an archive already held in memory
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let header_len = data
            .iter()
            .position(|&b| b == LINE_TERMINATOR)
            .unwrap_or(data.len());

        if header_len > HEADER_CAPACITY {
            warn!(
                header_len,
                capacity = HEADER_CAPACITY,
                "index line longer than capacity; truncating"
            );
        }

        let count = parse_count(bound_header(&data[..header_len]))?;
        Ok(Self {
            data,
            header_len,
            count,
        })
    }

    /// Header bytes seen by the decoder, bounded to the header capacity
    pub fn header(&self) -> &[u8] {
        bound_header(&self.data[..self.header_len])
    }

    /// Entry count declared in the header
    pub fn entry_count(&self) -> usize {
        self.count
    }

    /// Extraction names, in archive order. Records without `texts/` are skipped.
    pub fn list_files(&self) -> Vec<String> {
        decode_names(self.header())
    }

    /// Full index with mode and size; fails on any malformed record
    pub fn index(&self) -> Result<ArchiveIndex> {
        ArchiveIndex::decode(self.header())
    }

    /// Everything after the header line
    fn payload(&self) -> &[u8] {
        let start = (self.header_len + 1).min(self.data.len());
        &self.data[start..]
    }

    /// Decode payload blocks and bind them to their names
    pub fn recover(&self, policy: ExtractPolicy) -> Result<Vec<RecoveredFile>> {
        match policy {
            ExtractPolicy::LinePerEntry => {
                let names = self.list_files();
                if names.len() != self.count {
                    debug!(
                        declared = self.count,
                        recovered = names.len(),
                        "some index records were skipped"
                    );
                }
                Ok(LineFramer::new(self.payload()).recover(names))
            }
            ExtractPolicy::Sized => {
                let index = self.index()?;
                SizedFramer::new(self.payload()).recover(&index)
            }
        }
    }

    /// Write every recovered file into `dir`, returning the written paths.
    ///
    /// `dir` is created if missing (one level only). All names are checked
    /// before anything is written; two entries with the same name are a
    /// format error rather than a silent overwrite.
    pub fn extract_to<P: AsRef<Path>>(
        &self,
        dir: P,
        options: &ExtractOptions,
    ) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let files = self.recover(options.policy)?;

        {
            let mut seen = HashSet::with_capacity(files.len());
            for file in &files {
                check_extract_name(&file.name)?;
                if !seen.insert(file.name.as_str()) {
                    return Err(SauError::InvalidFormat(format!(
                        "entry name {:?} appears more than once",
                        file.name
                    )));
                }
            }
        }

        match fs::create_dir(dir) {
            Ok(()) => debug!(dir = %dir.display(), "created extraction directory"),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(SauError::file(dir, e)),
        }

        let mut written = Vec::with_capacity(files.len());
        for file in files {
            let target = dir.join(&file.name);
            fs::write(&target, &file.data).map_err(|e| SauError::file(&target, e))?;
            if let Some(mode) = file.mode {
                apply_mode(&target, mode)?;
            }
            debug!(path = %target.display(), bytes = file.data.len(), "extracted");
            written.push(target);
        }

        info!(dir = %dir.display(), files = written.len(), "archive extracted");
        Ok(written)
    }
}

/// Open `archive` and extract it into `dir`
pub fn extract_archive<P, Q>(archive: P, dir: Q, options: &ExtractOptions) -> Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    ArchiveReader::open(archive)?.extract_to(dir, options)
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> Result<()> {
    use crate::archive::format::RESTORE_MASK;
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode & RESTORE_MASK))
        .map_err(|e| SauError::file(path, e))
}

#[cfg(not(unix))]
fn apply_mode(path: &Path, mode: u32) -> Result<()> {
    if mode & 0o222 == 0 {
        let mut permissions = fs::metadata(path)
            .map_err(|e| SauError::file(path, e))?
            .permissions();
        permissions.set_readonly(true);
        fs::set_permissions(path, permissions).map_err(|e| SauError::file(path, e))?;
    }
    Ok(())
}
