use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::{CoreboxError, CoreboxResult};

use super::FilePath;
use super::traits::{Pal, ReadSeek};

/// Concrete PAL implementation using the real filesystem via std::fs.
///
/// All file paths are resolved relative to a configured base directory. A
/// leading `/` in a FilePath does not escape the base directory.
#[derive(Debug)]
pub struct RealPal {
    base_dir: PathBuf,
}

impl RealPal {
    /// Create a new RealPal with the given base directory.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolve a FilePath to a filesystem path below the base directory.
    fn resolve_path(&self, path: &FilePath) -> PathBuf {
        path.as_relative().to_path(&self.base_dir)
    }
}

impl Pal for RealPal {
    #[instrument(skip(self), fields(path = %path))]
    fn file_exists(&self, path: &FilePath) -> CoreboxResult<bool> {
        let resolved = self.resolve_path(path);
        let exists = resolved.try_exists().map_err(|e| {
            debug!(error = %e, "failed to check existence");
            Box::new(CoreboxError::file_error(&resolved, e))
        })?;
        debug!(exists, resolved = %resolved.display(), "checked file existence");
        Ok(exists)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_file(&self, path: &FilePath) -> CoreboxResult<Box<dyn ReadSeek + 'static>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "opening file for reading");
        let metadata = fs::metadata(&resolved).map_err(|e| {
            debug!(error = %e, "failed to stat file");
            Box::new(CoreboxError::from_io(&resolved, e))
        })?;
        if metadata.is_dir() {
            debug!("path is a directory");
            return Err(Box::new(CoreboxError::file_error(
                &resolved,
                std::io::Error::new(std::io::ErrorKind::IsADirectory, "is a directory"),
            )));
        }
        let file = fs::File::open(&resolved).map_err(|e| {
            debug!(error = %e, "failed to open file");
            Box::new(CoreboxError::from_io(&resolved, e))
        })?;
        debug!("file opened successfully");
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_file(&self, path: &FilePath, mode: u32) -> CoreboxResult<Box<dyn Write>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "creating file");
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode);
        }
        let file = options.open(&resolved).map_err(|e| {
            debug!(error = %e, "failed to create file");
            Box::new(CoreboxError::file_error(&resolved, e))
        })?;
        debug!("file created successfully");
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_directory_all(&self, path: &FilePath, mode: u32) -> CoreboxResult<()> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "creating directory and parents");
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(mode);
        }
        builder.create(&resolved).map_err(|e| {
            debug!(error = %e, "failed to create directory");
            Box::new(CoreboxError::file_error(&resolved, e))
        })?;
        debug!("directory created successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_directory(&self, path: &FilePath) -> CoreboxResult<Vec<FilePath>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "reading directory");
        let read_dir = fs::read_dir(&resolved).map_err(|e| {
            debug!(error = %e, "failed to read directory");
            Box::new(CoreboxError::from_io(&resolved, e))
        })?;

        let dir = path.normalized();
        let mut children = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| {
                debug!(error = %e, "failed to read directory entry");
                Box::new(CoreboxError::file_error(&resolved, e))
            })?;
            children.push(dir.join(entry.file_name().to_string_lossy()));
        }
        debug!(count = children.len(), "directory read successfully");
        Ok(children)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn is_directory(&self, path: &FilePath) -> CoreboxResult<bool> {
        let resolved = self.resolve_path(path);
        let metadata = fs::metadata(&resolved).map_err(|e| {
            debug!(error = %e, "failed to stat entry");
            Box::new(CoreboxError::from_io(&resolved, e))
        })?;
        Ok(metadata.is_dir())
    }
}
