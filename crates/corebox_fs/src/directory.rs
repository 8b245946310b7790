use tracing::{debug, instrument};

use corebox_base::{CoreboxError, CoreboxResult, FilePath, PalHandle};

/// Permission bits used for directories created without an explicit mode.
pub const DEFAULT_DIRECTORY_MODE: u32 = 0o755;

/// Filtering flags for [`list_dir`]. The two flags are mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub only_directories: bool,
    pub only_files: bool,
}

/// Validated form of [`ListOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    All,
    DirectoriesOnly,
    FilesOnly,
}

impl ListOptions {
    /// No filtering.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn directories() -> Self {
        Self {
            only_directories: true,
            only_files: false,
        }
    }

    pub fn files() -> Self {
        Self {
            only_directories: false,
            only_files: true,
        }
    }

    /// Resolves the flags, failing with `ErrorKind::InvalidArgument` if both are set.
    pub fn filter(&self) -> CoreboxResult<ListFilter> {
        match (self.only_directories, self.only_files) {
            (true, true) => Err(Box::new(CoreboxError::invalid_argument(
                "only_directories and only_files can not be set together",
            ))),
            (true, false) => Ok(ListFilter::DirectoriesOnly),
            (false, true) => Ok(ListFilter::FilesOnly),
            (false, false) => Ok(ListFilter::All),
        }
    }
}

/// Creates `path` and all missing ancestors, applying `mode` to the created directories.
///
/// An existing directory is not an error. A path component that exists as a
/// file fails with `ErrorKind::FileError`.
#[instrument(skip(pal), fields(path = %path))]
pub fn mkdir(pal: &PalHandle, path: &FilePath, mode: u32) -> CoreboxResult<()> {
    pal.create_directory_all(path, mode)
}

/// Lists the immediate children of `path` as full paths.
///
/// Children keep the order in which the PAL enumerates them. With
/// `only_directories` only directories are returned, with `only_files` every
/// other entry. Setting both fails with `ErrorKind::InvalidArgument` before the
/// filesystem is touched; a missing directory fails with `ErrorKind::NotFound`.
#[instrument(skip(pal), fields(path = %path))]
pub fn list_dir(
    pal: &PalHandle,
    path: &FilePath,
    options: ListOptions,
) -> CoreboxResult<Vec<FilePath>> {
    let filter = options.filter()?;
    let children = pal.read_directory(path)?;
    if filter == ListFilter::All {
        debug!(count = children.len(), "listed directory");
        return Ok(children);
    }

    let mut selected = Vec::with_capacity(children.len());
    for child in children {
        let is_directory = pal.is_directory(&child)?;
        let keep = match filter {
            ListFilter::DirectoriesOnly => is_directory,
            ListFilter::FilesOnly => !is_directory,
            ListFilter::All => true,
        };
        if keep {
            selected.push(child);
        }
    }
    debug!(count = selected.len(), ?filter, "listed directory");
    Ok(selected)
}
