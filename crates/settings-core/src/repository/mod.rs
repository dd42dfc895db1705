//! Settings repositories
//!
//! A repository is one backing medium for typed settings: a JSON settings
//! file ([`FileRepository`]) or a host preference service
//! ([`PreferenceRepository`]). Both implement [`SettingsRepository`], and the
//! [`Repository`] enum lets the façade hold them side by side.

mod file;
mod preferences;

pub use file::FileRepository;
pub use preferences::{
    JsonPreferences, MemoryPreferences, PREFERENCES_REPOSITORY_NAME, PreferenceRepository,
    PreferenceStore,
};

use settings_fs::NormalizedPath;

use crate::Result;
use crate::dictionary::EntryKey;
use crate::scope::SettingsScope;
use crate::value::{SettingType, SettingValue};

/// What a call to [`SettingsRepository::save`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// New content was written to the backing medium
    Written,
    /// Nothing changed since the last load or save
    Unchanged,
    /// The save was abandoned; a warning has been logged
    Aborted,
}

/// Capabilities every settings backing store provides.
///
/// Accessors take `&mut self` because file repositories load lazily on first
/// access.
pub trait SettingsRepository {
    fn scope(&self) -> SettingsScope;

    /// Repository name used to target it through the façade
    fn name(&self) -> &str;

    /// Backing file, or `None` for repositories that are not file based
    fn path(&self) -> Option<&NormalizedPath>;

    fn set_value(&mut self, key: EntryKey, value: SettingValue);

    fn get_value(&mut self, key: &EntryKey) -> Option<SettingValue>;

    fn contains(&mut self, key: &EntryKey) -> bool;

    /// Remove an entry. Returns whether one existed.
    fn remove_entry(&mut self, key: &EntryKey) -> bool;

    /// Persist pending changes. Never fails; problems are logged.
    fn save(&mut self) -> SaveOutcome;

    /// Store `value` under `(T, key)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`](crate::Error::Serialization) if the
    /// value cannot be represented.
    fn set<T: SettingType>(&mut self, key: &str, value: T) -> Result<()>
    where
        Self: Sized,
    {
        let value = value.into_value()?;
        self.set_value(EntryKey::of::<T>(key), value);
        Ok(())
    }

    /// The value for `(T, key)`, or `fallback` if absent or undecodable.
    fn get<T: SettingType>(&mut self, key: &str, fallback: T) -> T
    where
        Self: Sized,
    {
        self.try_get(key).unwrap_or(fallback)
    }

    fn try_get<T: SettingType>(&mut self, key: &str) -> Option<T>
    where
        Self: Sized,
    {
        self.get_value(&EntryKey::of::<T>(key))
            .and_then(|value| T::from_value(&value))
    }

    fn contains_key<T: SettingType>(&mut self, key: &str) -> bool
    where
        Self: Sized,
    {
        self.contains(&EntryKey::of::<T>(key))
    }

    fn remove<T: SettingType>(&mut self, key: &str) -> bool
    where
        Self: Sized,
    {
        self.remove_entry(&EntryKey::of::<T>(key))
    }
}

/// Any repository the façade can own.
#[derive(Debug)]
pub enum Repository {
    File(FileRepository),
    Preferences(PreferenceRepository),
}

impl Repository {
    pub fn as_file(&self) -> Option<&FileRepository> {
        match self {
            Self::File(repo) => Some(repo),
            Self::Preferences(_) => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut FileRepository> {
        match self {
            Self::File(repo) => Some(repo),
            Self::Preferences(_) => None,
        }
    }

    fn inner(&self) -> &dyn SettingsRepository {
        match self {
            Self::File(repo) => repo,
            Self::Preferences(repo) => repo,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn SettingsRepository {
        match self {
            Self::File(repo) => repo,
            Self::Preferences(repo) => repo,
        }
    }
}

impl SettingsRepository for Repository {
    fn scope(&self) -> SettingsScope {
        self.inner().scope()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }

    fn path(&self) -> Option<&NormalizedPath> {
        self.inner().path()
    }

    fn set_value(&mut self, key: EntryKey, value: SettingValue) {
        self.inner_mut().set_value(key, value)
    }

    fn get_value(&mut self, key: &EntryKey) -> Option<SettingValue> {
        self.inner_mut().get_value(key)
    }

    fn contains(&mut self, key: &EntryKey) -> bool {
        self.inner_mut().contains(key)
    }

    fn remove_entry(&mut self, key: &EntryKey) -> bool {
        self.inner_mut().remove_entry(key)
    }

    fn save(&mut self) -> SaveOutcome {
        self.inner_mut().save()
    }
}

impl From<FileRepository> for Repository {
    fn from(repo: FileRepository) -> Self {
        Self::File(repo)
    }
}

impl From<PreferenceRepository> for Repository {
    fn from(repo: PreferenceRepository) -> Self {
        Self::Preferences(repo)
    }
}
