use crate::archive::format::{check_extract_name, extraction_name, ArchiveEntry, HEADER_CAPACITY};
use crate::archive::index::ArchiveIndex;
use crate::archive::options::BuildOptions;
use crate::archive::payload::{write_entry, write_sentinel};
use crate::error::{Result, SauError};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Normalize path to forward slashes (Windows separators)
#[cfg(windows)]
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Backslash is an ordinary filename byte here; keep the name as given
#[cfg(not(windows))]
fn normalize_path(path: &str) -> String {
    path.to_string()
}

/// Archive writer for creating .sau files.
///
/// Sources are stat-ed as they are added; nothing touches the output path
/// until [`ArchiveWriter::finalize`]. The archive is assembled in a temporary
/// file next to the output and renamed into place once complete, so a failed
/// build never leaves a partial archive behind.
pub struct ArchiveWriter {
    output: PathBuf,
    options: BuildOptions,
    index: ArchiveIndex,
    sources: Vec<PathBuf>,
    identities: Vec<PathBuf>,
}

impl ArchiveWriter {
    /// Prepare a writer targeting `output`
    pub fn create<P: AsRef<Path>>(output: P) -> Self {
        let output = output.as_ref().to_path_buf();
        let identities = vec![identity(&output)];
        Self {
            output,
            options: BuildOptions::default(),
            index: ArchiveIndex::new(),
            sources: Vec::new(),
            identities,
        }
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a file from disk; it is stored under the path as given
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();

        if self.index.count() >= self.options.max_files {
            return Err(SauError::TooManyFiles {
                count: self.index.count() + 1,
                max: self.options.max_files,
            });
        }

        let id = identity(path);
        if id == self.identities[0] {
            return Err(SauError::Usage(format!(
                "'{}' is both an input and the output archive",
                path.display()
            )));
        }
        if self.identities[1..].contains(&id) {
            return Err(SauError::Usage(format!(
                "'{}' is listed more than once",
                path.display()
            )));
        }

        let metadata = fs::metadata(path).map_err(|e| SauError::file(path, e))?;
        if !metadata.is_file() {
            return Err(SauError::file(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        let name = path
            .to_str()
            .map(normalize_path)
            .ok_or_else(|| SauError::InvalidName(format!("{} is not UTF-8", path.display())))?;
        let entry = ArchiveEntry::from_metadata(name, &metadata)?;

        match extraction_name(&entry.name) {
            Some(target) => {
                check_extract_name(target).map_err(|_| {
                    SauError::InvalidName(format!(
                        "{:?} would extract as {:?}, which is not a plain file name",
                        entry.name, target
                    ))
                })?;
                let taken = self
                    .index
                    .entries()
                    .iter()
                    .any(|e| extraction_name(&e.name) == Some(target));
                if taken {
                    return Err(SauError::Usage(format!(
                        "'{}' extracts to '{}', which another input already uses",
                        path.display(),
                        target
                    )));
                }
            }
            None => warn!(
                name = %entry.name,
                "entry has no texts/ segment and will be skipped on extraction"
            ),
        }
        debug!(
            name = %entry.name,
            mode = %format!("{:o}", entry.mode),
            size = entry.size,
            "registered entry"
        );

        self.index.push(entry);
        self.sources.push(path.to_path_buf());
        self.identities.push(id);
        Ok(())
    }

    /// Entries registered so far, in archive order
    pub fn index(&self) -> &ArchiveIndex {
        &self.index
    }

    /// Write header, payload blocks and sentinel, then move the archive into place
    pub fn finalize(self) -> Result<ArchiveIndex> {
        let dir = match self.output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| SauError::file(dir, e))?;

        {
            let mut writer = BufWriter::new(temp.as_file_mut());

            let header_len = self.index.write_to(&mut writer)?;
            if header_len > HEADER_CAPACITY {
                warn!(
                    header_len,
                    capacity = HEADER_CAPACITY,
                    "index line exceeds the decode capacity; trailing records will not be recovered"
                );
            }

            for (entry, source) in self.index.entries().iter().zip(&self.sources) {
                let file = File::open(source).map_err(|e| SauError::file(source, e))?;
                let copied = write_entry(file, &mut writer).map_err(|e| SauError::file(source, e))?;
                if copied != entry.size {
                    return Err(SauError::file(
                        source,
                        io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!("size changed during build ({} -> {})", entry.size, copied),
                        ),
                    ));
                }
                debug!(name = %entry.name, bytes = copied, "appended payload");
            }

            write_sentinel(&mut writer)?;
            writer.flush()?;
        }

        set_archive_permissions(temp.as_file())?;
        temp.persist(&self.output)
            .map_err(|e| SauError::file(&self.output, e.error))?;

        info!(
            output = %self.output.display(),
            entries = self.index.count(),
            "archive created"
        );
        Ok(self.index)
    }
}

/// Build an archive from `inputs` in one call.
///
/// The input count is checked before any file is inspected, and every source
/// is stat-ed before the output is created.
pub fn build_archive<P, Q>(output: P, inputs: &[Q], options: BuildOptions) -> Result<ArchiveIndex>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    if inputs.len() > options.max_files {
        return Err(SauError::TooManyFiles {
            count: inputs.len(),
            max: options.max_files,
        });
    }

    let mut writer = ArchiveWriter::create(output).with_options(options);
    for input in inputs {
        writer.add_file(input)?;
    }
    writer.finalize()
}

/// Path used to detect one file registered under two roles
fn identity(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(unix)]
fn set_archive_permissions(file: &File) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_archive_permissions(_file: &File) -> Result<()> {
    Ok(())
}
