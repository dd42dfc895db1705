//! Typed, scoped settings for Settings Manager
//!
//! This crate provides:
//!
//! - **Values**: [`SettingType`] maps Rust types onto the [`SettingValue`] forms
//!   that can be stored, with [`Json`] for anything serde can handle
//! - **Dictionary**: [`SettingsDictionary`], the deterministic on-disk layout
//!   that keeps settings files diffable and fingerprints stable
//! - **Repositories**: lazily loaded [`FileRepository`] and the
//!   per-key [`PreferenceRepository`], both behind [`SettingsRepository`]
//! - **Façade**: [`Settings`] routes typed calls by [`SettingsScope`] and
//!   optional repository name, and raises save notifications
//!
//! # Architecture
//!
//! ```text
//!                  settings-cli
//!                       |
//!                 settings-core
//!          +------------+------------+
//!          |                         |
//!     settings-fs              PreferenceStore
//!  (atomic files, locks)     (host preference service)
//! ```
//!
//! # Example
//!
//! ```
//! use settings_core::{MemoryPreferences, Settings, SettingsScope};
//!
//! let dir = tempfile::tempdir()?;
//! let mut settings = Settings::for_package(dir.path(), "com.example.tools", MemoryPreferences::new())?;
//!
//! settings.set("autosave", true, SettingsScope::User)?;
//! assert!(settings.get("autosave", SettingsScope::User, false));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dictionary;
pub mod error;
pub mod hooks;
pub mod repository;
pub mod scope;
pub mod settings;
pub mod value;
pub mod vcs;

pub use dictionary::{EntryKey, SettingsDictionary};
pub use error::{Error, Result};
pub use hooks::{HostEvent, SaveEvent, SaveHooks};
pub use repository::{
    FileRepository, JsonPreferences, MemoryPreferences, PREFERENCES_REPOSITORY_NAME,
    PreferenceRepository, PreferenceStore, Repository, SaveOutcome, SettingsRepository,
};
pub use scope::{RepositorySelector, SettingsScope};
pub use settings::Settings;
pub use value::{Json, SettingType, SettingValue, ValueBucket};
pub use vcs::{EditGuard, NoVersionControl, ReadOnlyCheckout};
