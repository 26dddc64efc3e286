use crate::archive::format::MAX_FILES;

/// How payload blocks are located on extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractPolicy {
    /// One line per entry, names only. Compatible with every `.sau` reader,
    /// but content with embedded newlines is cut to its first line.
    ///
    /// Lines are handed out by position while names come only from records
    /// carrying `texts/`. A skipped record still owns a payload line, so every
    /// name after it receives the content of the entry before it.
    #[default]
    LinePerEntry,
    /// Exactly `size` bytes per entry, taken from the index. Byte-exact, and
    /// restores permission bits on Unix.
    Sized,
}

/// Settings for building an archive
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub max_files: usize,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self {
            max_files: MAX_FILES,
        }
    }

    /// Override the input file limit (mainly for tests)
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings for extracting an archive
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub policy: ExtractPolicy,
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: ExtractPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Shorthand for [`ExtractPolicy::Sized`]
    pub fn strict(self) -> Self {
        self.with_policy(ExtractPolicy::Sized)
    }
}
