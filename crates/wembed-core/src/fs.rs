//! Filesystem seam
//!
//! The embedder only touches files through [`FileSystem`]. [`OsFs`] goes to
//! disk; [`MemoryFs`] keeps files in a map so the text transform can be
//! exercised without touching disk.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Whole-file reads and writes
///
/// Each call opens, fully reads or writes, and closes the file.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem {
    /// Read the full contents of a file as bytes
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Read the full contents of a file as UTF-8 text
    ///
    /// Fails with [`io::ErrorKind::InvalidData`] on bad encoding.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Truncate and rewrite a file
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Real filesystem via `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl FileSystem for OsFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

/// In-memory filesystem
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    read_only: Mutex<Vec<PathBuf>>,
}

impl MemoryFs {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.lock().insert(path.into(), contents.into());
        self
    }

    /// Reject writes to `path` with `PermissionDenied`
    #[must_use]
    pub fn with_read_only(self, path: impl Into<PathBuf>) -> Self {
        self.read_only.lock().push(path.into());
        self
    }

    /// Current contents of a file
    #[must_use]
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files.lock().get(path.as_ref()).cloned()
    }

    /// Current contents of a file as text (lossy)
    #[must_use]
    pub fn text(&self, path: impl AsRef<Path>) -> Option<String> {
        self.contents(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl FileSystem for MemoryFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.lock().get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
        })
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        String::from_utf8(self.read(path)?)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if self.read_only.lock().iter().any(|p| p == path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", path.display()),
            ));
        }
        self.files.lock().insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        (**self).write(path, contents)
    }
}
