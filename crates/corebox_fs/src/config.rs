use serde::Deserialize;
use tracing::{debug, instrument};

use corebox_base::{CoreboxResult, FilePath, PalHandle, ResultExt, err};

use crate::directory::DEFAULT_DIRECTORY_MODE;
use crate::encoding::Encoding;
use crate::events::EventChannel;
use crate::text_file::{DEFAULT_FILE_MODE, WriteOptions};

/// Default options for the corebox helpers, usually read from `corebox.toml`.
///
/// ```toml
/// encoding = "utf-8"
/// file_mode = 0o644
/// dir_mode = 0o755
/// max_listeners = 20
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FsDefaults {
    /// Encoding used to load and save text files.
    pub encoding: Encoding,
    /// Permission bits for created files.
    pub file_mode: u32,
    /// Permission bits for created directories.
    pub dir_mode: u32,
    /// Listener cap for event channels, `0` for the built-in default.
    pub max_listeners: usize,
}

impl Default for FsDefaults {
    fn default() -> Self {
        Self {
            encoding: Encoding::default(),
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIRECTORY_MODE,
            max_listeners: 0,
        }
    }
}

impl FsDefaults {
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions::new()
            .with_encoding(self.encoding)
            .with_mode(self.file_mode)
    }

    /// Creates an empty event channel using the configured listener cap.
    pub fn event_channel<A>(&self) -> EventChannel<A> {
        EventChannel::new(self.max_listeners)
    }
}

/// Reads and parses a defaults file through the PAL.
///
/// A missing file keeps its `ErrorKind::NotFound` kind so callers can fall back
/// to [`FsDefaults::default`].
#[instrument(skip(pal), fields(path = %path))]
pub fn load_config(pal: &PalHandle, path: &FilePath) -> CoreboxResult<FsDefaults> {
    let text = pal
        .read_file_to_string(path)
        .with_context(|| format!("Failed to read config {}", path))?;
    let defaults: FsDefaults = toml::from_str(&text)
        .map_err(|e| err!("Failed to parse config {}: {}", path, e))?;
    debug!(?defaults, "config loaded");
    Ok(defaults)
}
