/* 📖 # What is the Platform Abstraction Layer?

The PAL is the filesystem capability the corebox helpers are written against.
RealPal forwards to std::fs below a base directory, MockPal keeps an in-memory
tree for tests. Both report failures through the same CoreboxError kinds.
*/

mod file_path;
pub mod mock;
pub mod real_pal;
mod traits;

pub use file_path::FilePath;
pub use mock::MockPal;
pub use real_pal::RealPal;
pub use traits::{Pal, PalHandle, ReadSeek};
