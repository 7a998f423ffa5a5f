//! File system access used by the project scan.
//!
//! The scan never touches `std::fs` directly. It goes through the
//! [`FileSystem`] trait so tests can supply an in-memory tree.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::AnalysisResult;

/// One entry produced by a directory walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl WalkEntry {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }
}

/// Directory walk and file read primitives.
pub trait FileSystem {
    /// Lists every entry below `root` (directories included).
    fn walk(&self, root: &Path) -> AnalysisResult<Vec<WalkEntry>>;

    /// Reads a whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// The real file system, walked depth-first with walkdir.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn walk(&self, root: &Path) -> AnalysisResult<Vec<WalkEntry>> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            entries.push(WalkEntry {
                is_dir: entry.file_type().is_dir(),
                path: entry.into_path(),
            });
        }

        Ok(entries)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

/// An in-memory file tree.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use vuedeps::analysis::{FileSystem, MemoryFileSystem};
///
/// let fs = MemoryFileSystem::new()
///     .with_dir("/p/src")
///     .with_file("/p/src/App.vue", "<script></script>");
///
/// assert_eq!(fs.walk(Path::new("/p")).unwrap().len(), 2);
/// assert!(fs.read(Path::new("/p/src/Missing.vue")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    entries: Vec<WalkEntry>,
    contents: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory entry.
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.entries.push(WalkEntry::dir(path));
        self
    }

    /// Adds a file entry with its contents.
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        let path = path.into();
        self.contents.insert(path.clone(), contents.into());
        self.entries.push(WalkEntry::file(path));
        self
    }

    /// Adds a file entry that cannot be read.
    pub fn with_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        self.entries.push(WalkEntry::file(path));
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn walk(&self, root: &Path) -> AnalysisResult<Vec<WalkEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.path.starts_with(root))
            .cloned()
            .collect())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.contents.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: no such file", path.display()),
            )
        })
    }
}
