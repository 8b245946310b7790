/* 📖 # What does corebox_fs provide?

Small synchronous helpers over the PAL: whole-file text loading and saving,
"create if absent" initialization, recursive directory creation, filtered
directory listing and base name extraction. Next to them sits a self-contained
EventChannel for named publish/subscribe within one thread of control.

Every filesystem helper takes a PalHandle, so tests run them against MockPal.
*/

pub mod config;
pub mod directory;
pub mod encoding;
pub mod events;
pub mod path_naming;
mod real_fs_tests;
pub mod text_file;

pub use config::{FsDefaults, load_config};
pub use directory::{DEFAULT_DIRECTORY_MODE, ListFilter, ListOptions, list_dir, mkdir};
pub use encoding::Encoding;
pub use events::{DEFAULT_MAX_LISTENERS, EventChannel, Handler};
pub use path_naming::base_name;
pub use text_file::{
    DEFAULT_FILE_MODE, WriteOptions, init_file, init_file_with_options, load, save,
};
