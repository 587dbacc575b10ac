//! Discovery of candidate email files under a root directory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{IndexerError, Result};
use crate::ingest::job::IngestJob;
use crate::parser::header::decode_text;

/// Extensions (lower-cased, with the dot) of files worth reading.
/// The empty string stands for "no extension".
pub const EMAIL_EXTENSIONS: [&str; 3] = [".txt", "", ".eml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// Emit empty files as jobs with empty content instead of dropping them.
    pub report_empty: bool,
}

impl Default for WalkOptions {
    /// Follows `ingest.report_empty_files` in the default config.
    fn default() -> Self {
        Self { report_empty: true }
    }
}

/// Counters kept while walking. Only used for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Jobs emitted.
    pub found: u64,
    /// Candidate files that were empty and dropped.
    pub empty: u64,
    /// Files with another extension.
    pub ignored: u64,
    /// Entries that could not be visited or read.
    pub read_errors: u64,
}

/// Check that `root` can be walked at all.
pub fn validate_root(root: &Path) -> Result<()> {
    let meta = std::fs::metadata(root).map_err(|source| IndexerError::PathNotAccessible {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(IndexerError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Whether `path` has one of the [`EMAIL_EXTENSIONS`].
pub fn is_candidate(path: &Path) -> bool {
    let ext = extension_of(path);
    EMAIL_EXTENSIONS.contains(&ext.as_str())
}

/// Lower-cased suffix of the file name from its last dot, or `""`.
///
/// Dotfiles keep their whole name (`.DS_Store` → `.ds_store`). A bare
/// trailing dot, as in Enron's `1.`, counts as no extension.
fn extension_of(path: &Path) -> String {
    let Some(name) = path.file_name() else {
        return String::new();
    };
    let name = name.to_string_lossy();
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() => name[dot..].to_lowercase(),
        _ => String::new(),
    }
}

/// Lazy sequence of jobs for every candidate file under a root.
///
/// Directories, symlinks and files with other extensions are passed over.
/// Entries that fail to be visited or read are logged and skipped; the walk
/// always continues with their siblings.
pub struct EmailFiles {
    entries: walkdir::IntoIter,
    options: WalkOptions,
    stats: WalkStats,
}

impl EmailFiles {
    pub fn new(root: impl AsRef<Path>, options: WalkOptions) -> Self {
        Self {
            entries: WalkDir::new(root).follow_links(false).into_iter(),
            options,
            stats: WalkStats::default(),
        }
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    fn read(&mut self, path: PathBuf) -> Option<IngestJob> {
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read file");
                self.stats.read_errors += 1;
                return None;
            }
        };

        if bytes.is_empty() && !self.options.report_empty {
            debug!(path = %path.display(), "Skipping empty file");
            self.stats.empty += 1;
            return None;
        }

        self.stats.found += 1;
        Some(IngestJob {
            content: decode_text(&bytes),
            path,
        })
    }
}

impl Iterator for EmailFiles {
    type Item = IngestJob;

    fn next(&mut self) -> Option<IngestJob> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Could not access entry");
                    self.stats.read_errors += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.into_path();
            if !is_candidate(&path) {
                self.stats.ignored += 1;
                continue;
            }

            if let Some(job) = self.read(path) {
                return Some(job);
            }
        }
    }
}

/// Walk `root`, handing every job to `emit`.
///
/// `emit` returns `false` to stop early. Returns the walk counters.
pub fn walk(
    root: &Path,
    options: WalkOptions,
    emit: &mut dyn FnMut(IngestJob) -> bool,
) -> Result<WalkStats> {
    validate_root(root)?;
    let mut files = EmailFiles::new(root, options);
    for job in files.by_ref() {
        if !emit(job) {
            break;
        }
    }
    Ok(files.stats())
}
