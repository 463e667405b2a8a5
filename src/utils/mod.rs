//! Cross-platform helpers
//!
//! - [`fs`] - moving extracted files into place and removing scratch directories
//! - [`progress`] - download progress bars

pub mod fs;
pub mod progress;

pub use fs::{ensure_dir, move_tree, remove_dir_all};
pub use progress::{ProgressBar, ProgressStyle};
