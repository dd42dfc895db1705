//! Filesystem layer for Settings Manager
//!
//! Provides normalized path handling, atomic text I/O with advisory locking,
//! and the content fingerprints used to skip redundant settings writes.

pub mod checksum;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::compute_content_checksum;
pub use constants::{DEFAULT_SETTINGS_NAME, SETTINGS_EXTENSION, SettingsPath};
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::{NormalizedPath, validate_path_identifier};
