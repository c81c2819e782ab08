//! HTTP API handlers.

pub mod error;
pub mod health;
pub mod listing;
pub mod records;
pub mod review;

pub use error::ApiError;
pub use health::{default_root, health};
pub use listing::list_directory;
pub use records::get_files;
pub use review::{save_file, skip_file};
