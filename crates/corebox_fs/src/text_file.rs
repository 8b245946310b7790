use std::io::Write;

use tracing::{debug, instrument};

use corebox_base::{CoreboxError, CoreboxResult, FilePath, PalHandle};

use crate::encoding::Encoding;

/// Permission bits used for files written without an explicit mode.
pub const DEFAULT_FILE_MODE: u32 = 0o755;

/// Options applied when writing a text file.
///
/// # Examples
/// ```
/// use corebox_fs::{Encoding, WriteOptions};
///
/// let options = WriteOptions::new()
///     .with_encoding(Encoding::Latin1)
///     .with_mode(0o640);
/// assert_eq!(options.mode, 0o640);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub encoding: Encoding,
    /// Permission bits applied when the file is created.
    pub mode: u32,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::default(),
            mode: DEFAULT_FILE_MODE,
        }
    }
}

/// Reads the whole file at `path` and decodes it with `encoding`.
///
/// Fails with `ErrorKind::NotFound` if the file does not exist and with
/// `ErrorKind::FileError` for any other read or decode failure.
#[instrument(skip(pal), fields(path = %path, encoding = %encoding))]
pub fn load(pal: &PalHandle, path: &FilePath, encoding: Encoding) -> CoreboxResult<String> {
    let bytes = pal.read_file_to_bytes(path)?;
    let text = encoding.decode(bytes).map_err(|e| {
        debug!(error = %e, "failed to decode file");
        Box::new(CoreboxError::file_error(path.as_path(), e))
    })?;
    debug!(len = text.len(), "text file loaded");
    Ok(text)
}

/// Writes `content` to `path`, creating or truncating the file.
///
/// Fails with `ErrorKind::FileError` when the file cannot be written, for
/// example when the parent directory is missing, and with
/// `ErrorKind::InvalidArgument` when `content` cannot be encoded.
#[instrument(skip(pal, content), fields(path = %path, len = content.len()))]
pub fn save(
    pal: &PalHandle,
    path: &FilePath,
    content: &str,
    options: &WriteOptions,
) -> CoreboxResult<()> {
    let bytes = options.encoding.encode(content)?;
    let mut writer = pal.create_file(path, options.mode)?;
    writer
        .write_all(&bytes)
        .and_then(|()| writer.flush())
        .map_err(|e| {
            debug!(error = %e, "failed to write file");
            Box::new(CoreboxError::file_error(path.as_path(), e))
        })?;
    debug!(bytes = bytes.len(), "text file saved");
    Ok(())
}

/// Creates `path` with the content produced by `supplier` if it does not exist yet.
///
/// Returns `true` when the file was written, `false` when it already existed.
/// `supplier` is only called in the first case. The existence check and the
/// write are two separate filesystem calls, so concurrent writers can race.
pub fn init_file<F>(pal: &PalHandle, path: &FilePath, supplier: F) -> CoreboxResult<bool>
where
    F: FnOnce() -> String,
{
    init_file_with_options(pal, path, &WriteOptions::default(), supplier)
}

/// Like [`init_file`], writing with the given options.
#[instrument(skip(pal, supplier), fields(path = %path))]
pub fn init_file_with_options<F>(
    pal: &PalHandle,
    path: &FilePath,
    options: &WriteOptions,
    supplier: F,
) -> CoreboxResult<bool>
where
    F: FnOnce() -> String,
{
    if pal.file_exists(path)? {
        debug!("file already exists, leaving it untouched");
        return Ok(false);
    }
    save(pal, path, &supplier(), options)?;
    debug!("file initialized");
    Ok(true)
}
