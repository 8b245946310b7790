/* 📖 # What lives in corebox_base?

The pieces every other corebox crate builds on: the error type, tracing setup
and the platform abstraction layer that all filesystem access goes through.
*/

pub mod error;
pub mod pal;
mod pal_tests;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{CoreboxError, CoreboxResult, ErrorKind, ResultExt};
pub use pal::{FilePath, MockPal, Pal, PalHandle, ReadSeek, RealPal};
