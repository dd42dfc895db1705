//! Settings stored in a host's flat preference service
//!
//! Each entry becomes one raw string under a namespaced key, so there is no
//! aggregated file and nothing to flush on save.

use std::collections::BTreeMap;
use std::fmt::Debug;

use settings_fs::{NormalizedPath, RobustnessConfig, io};

use super::{SaveOutcome, SettingsRepository};
use crate::dictionary::EntryKey;
use crate::scope::SettingsScope;
use crate::value::SettingValue;
use crate::{Error, Result};

/// Name every preference repository answers to.
pub const PREFERENCES_REPOSITORY_NAME: &str = "Preferences";

/// A flat string-to-string preference service provided by the host.
pub trait PreferenceStore: Debug {
    fn get_value(&self, key: &str) -> Option<String>;

    /// Store `raw` under `key`, persisting it immediately.
    fn set_value(&mut self, key: &str, raw: String) -> Result<()>;

    fn delete_value(&mut self, key: &str) -> Result<()>;

    fn has_key(&self, key: &str) -> bool;
}

/// Preferences kept in memory for the life of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPreferences {
    values: BTreeMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw keys currently stored.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, raw: String) -> Result<()> {
        self.values.insert(key.to_string(), raw);
        Ok(())
    }

    fn delete_value(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }

    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// Preferences persisted as one flat JSON object, rewritten on every change.
#[derive(Debug)]
pub struct JsonPreferences {
    path: NormalizedPath,
    values: BTreeMap<String, String>,
    robustness: RobustnessConfig,
}

impl JsonPreferences {
    /// Open the preference file at `path`; a missing file is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object of strings.
    pub fn open(path: impl Into<NormalizedPath>) -> Result<Self> {
        let path = path.into();
        let values = match io::read_text_if_exists(&path)? {
            Some(text) if !text.trim().is_empty() => {
                serde_json::from_str(&text).map_err(|e| Error::Malformed {
                    message: format!("preference file {path}: {e}"),
                })?
            }
            _ => BTreeMap::new(),
        };

        Ok(Self {
            path,
            values,
            robustness: RobustnessConfig::default(),
        })
    }

    /// `<config dir>/settings-manager/preferences.json` for the current user.
    pub fn default_location() -> Option<NormalizedPath> {
        dirs::config_dir().map(|dir| {
            NormalizedPath::new(dir.join("settings-manager").join("preferences.json"))
        })
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let mut text = serde_json::to_string_pretty(&self.values)?;
        text.push('\n');
        io::write_atomic(&self.path, text.as_bytes(), self.robustness)?;
        Ok(())
    }
}

impl PreferenceStore for JsonPreferences {
    fn get_value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, raw: String) -> Result<()> {
        if self.values.get(key) == Some(&raw) {
            return Ok(());
        }
        self.values.insert(key.to_string(), raw);
        self.persist()
    }

    fn delete_value(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// A user-scoped repository writing straight through to a [`PreferenceStore`].
#[derive(Debug)]
pub struct PreferenceRepository {
    namespace: String,
    store: Box<dyn PreferenceStore>,
}

impl PreferenceRepository {
    /// Keys are stored as `"{namespace}::{type}::{key}"` so several
    /// packages can share one preference service.
    pub fn new(namespace: impl Into<String>, store: impl PreferenceStore + 'static) -> Self {
        Self {
            namespace: namespace.into(),
            store: Box::new(store),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn store(&self) -> &dyn PreferenceStore {
        &*self.store
    }

    fn preference_key(&self, key: &EntryKey) -> String {
        format!("{}::{}::{}", self.namespace, key.type_name, key.name)
    }
}

impl SettingsRepository for PreferenceRepository {
    fn scope(&self) -> SettingsScope {
        SettingsScope::User
    }

    fn name(&self) -> &str {
        PREFERENCES_REPOSITORY_NAME
    }

    fn path(&self) -> Option<&NormalizedPath> {
        None
    }

    fn set_value(&mut self, key: EntryKey, value: SettingValue) {
        let pref_key = self.preference_key(&key);
        if !value.is_storable() {
            tracing::warn!(key = %pref_key, "Refusing to store non-finite float {:?}", value);
            return;
        }
        let raw = value.to_json().to_string();
        if let Err(e) = self.store.set_value(&pref_key, raw) {
            tracing::warn!(key = %pref_key, "Failed to store preference: {}", e);
        }
    }

    fn get_value(&mut self, key: &EntryKey) -> Option<SettingValue> {
        let pref_key = self.preference_key(key);
        let raw = self.store.get_value(&pref_key)?;
        match serde_json::from_str(&raw) {
            Ok(json) => Some(SettingValue::infer(json)),
            Err(e) => {
                tracing::debug!(key = %pref_key, "Ignoring undecodable preference: {}", e);
                None
            }
        }
    }

    fn contains(&mut self, key: &EntryKey) -> bool {
        self.store.has_key(&self.preference_key(key))
    }

    fn remove_entry(&mut self, key: &EntryKey) -> bool {
        let pref_key = self.preference_key(key);
        if !self.store.has_key(&pref_key) {
            return false;
        }
        if let Err(e) = self.store.delete_value(&pref_key) {
            tracing::warn!(key = %pref_key, "Failed to delete preference: {}", e);
            return false;
        }
        true
    }

    fn save(&mut self) -> SaveOutcome {
        SaveOutcome::Unchanged
    }
}
