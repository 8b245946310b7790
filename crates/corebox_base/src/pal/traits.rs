use std::io::{Read, Seek, Write};
use std::sync::Arc;

use crate::{CoreboxError, CoreboxResult};

use super::file_path::FilePath;

/* 📖 # What does the PAL cover?

Exactly the filesystem primitives the corebox helpers are built from: existence
checks, whole-file reads and writes, recursive directory creation, listing the
entries of one directory and asking whether an entry is a directory.

Code takes a PalHandle instead of calling std::fs, so the same helpers run
against RealPal in production and MockPal in tests.
*/

/// Trait combining Read + Seek for file operations.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Platform Abstraction Layer (PAL) trait providing filesystem operations.
///
/// Two implementations are provided:
/// - `RealPal`: Uses the real filesystem via `std::fs`
/// - `MockPal`: In-memory implementation for testing
///
/// Reads, listings and status queries on a missing target fail with
/// `ErrorKind::NotFound`. Every other failure is an `ErrorKind::FileError`.
pub trait Pal: std::fmt::Debug + Send + Sync + 'static {
    /// Check if a file or directory exists at the given path.
    fn file_exists(&self, path: &FilePath) -> CoreboxResult<bool>;

    /// Open a file for reading.
    fn read_file(&self, path: &FilePath) -> CoreboxResult<Box<dyn ReadSeek + 'static>>;

    /// Read entire file contents as raw bytes.
    fn read_file_to_bytes(&self, path: &FilePath) -> CoreboxResult<Vec<u8>> {
        let mut reader = self.read_file(path)?;
        let mut contents = Vec::new();
        reader
            .read_to_end(&mut contents)
            .map_err(|e| Box::new(CoreboxError::file_error(path.as_path(), e)))?;
        Ok(contents)
    }

    /// Read entire file contents as a UTF-8 string.
    fn read_file_to_string(&self, path: &FilePath) -> CoreboxResult<String> {
        let contents = self.read_file_to_bytes(path)?;
        String::from_utf8(contents).map_err(|e| {
            Box::new(CoreboxError::file_error(
                path.as_path(),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            ))
        })
    }

    /// Create a new file, truncating it if it exists.
    ///
    /// `mode` holds the permission bits applied when the file is created.
    /// Platforms without permission bits ignore it.
    fn create_file(&self, path: &FilePath, mode: u32) -> CoreboxResult<Box<dyn Write>>;

    /// Create a directory and all missing parent directories.
    ///
    /// Succeeds without changes if the directory already exists.
    fn create_directory_all(&self, path: &FilePath, mode: u32) -> CoreboxResult<()>;

    /// List the immediate entries of a directory.
    ///
    /// Each entry is returned as the normalized `path` joined with the entry
    /// name, in the order the implementation enumerates them.
    fn read_directory(&self, path: &FilePath) -> CoreboxResult<Vec<FilePath>>;

    /// Check whether the entry at `path` is a directory.
    fn is_directory(&self, path: &FilePath) -> CoreboxResult<bool>;
}

/// Handle to a PAL implementation, enabling shared ownership.
///
/// Internally wraps `Arc<dyn Pal>` for cheap cloning and thread-safe sharing.
///
/// # Examples
///
/// ```no_run
/// use corebox_base::{RealPal, PalHandle};
///
/// let pal = PalHandle::new(RealPal::new(".".into()));
/// let pal_clone = pal.clone(); // Cheap clone, shares the same implementation
/// ```
#[derive(Debug, Clone)]
pub struct PalHandle(Arc<dyn Pal>);

impl PalHandle {
    /// Create a new PalHandle from a Pal implementation.
    pub fn new(pal: impl Pal + 'static) -> Self {
        Self(Arc::new(pal))
    }
}

impl std::ops::Deref for PalHandle {
    type Target = dyn Pal;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
