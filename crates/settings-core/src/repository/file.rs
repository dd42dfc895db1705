//! Settings stored in a JSON file
//!
//! The file is read on first access, not on construction. Saves compare a
//! SHA-256 fingerprint of the new text against the last text read or
//! written and skip the write when nothing changed.
//!
//! A file that exists but cannot be read is never overwritten. Invalid UTF-8
//! is replaced rather than discarding the whole document.

use std::fs;

use settings_fs::{
    DEFAULT_SETTINGS_NAME, NormalizedPath, RobustnessConfig, SettingsPath,
    compute_content_checksum, io,
};

use super::{SaveOutcome, SettingsRepository};
use crate::Result;
use crate::dictionary::{EntryKey, SettingsDictionary};
use crate::scope::SettingsScope;
use crate::value::SettingValue;
use crate::vcs::{EditGuard, NoVersionControl};

/// Dictionary contents plus the fingerprint of the text they came from
#[derive(Debug)]
struct Loaded {
    dictionary: SettingsDictionary,
    /// Fingerprint of the file text last read or written, `None` if the
    /// file did not exist
    fingerprint: Option<String>,
    /// The file exists but could not be read; saving would destroy it
    read_failed: bool,
}

impl Loaded {
    fn read(path: &NormalizedPath) -> Self {
        let bytes = match io::read_bytes_if_exists(path) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!(path = %path, "No settings file yet, starting empty");
                return Self::empty();
            }
            Err(e) => {
                if e.is_permission_denied() {
                    tracing::warn!(path = %path, "No permission to read settings file, saving disabled: {}", e);
                } else {
                    tracing::warn!(path = %path, "Failed to read settings file, saving disabled: {}", e);
                }
                return Self {
                    read_failed: true,
                    ..Self::empty()
                };
            }
        };

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %path, "Settings file is not valid UTF-8, replacing invalid bytes");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        let dictionary = SettingsDictionary::from_json_str(&text).unwrap_or_else(|e| {
            tracing::warn!(path = %path, "Settings file is corrupt, starting empty: {}", e);
            SettingsDictionary::default()
        });
        tracing::debug!(path = %path, entries = dictionary.len(), "Loaded settings file");

        Self {
            dictionary,
            fingerprint: Some(compute_content_checksum(&text)),
            read_failed: false,
        }
    }

    fn empty() -> Self {
        Self {
            dictionary: SettingsDictionary::default(),
            fingerprint: None,
            read_failed: false,
        }
    }
}

/// A repository backed by one settings file.
#[derive(Debug)]
pub struct FileRepository {
    scope: SettingsScope,
    name: String,
    path: NormalizedPath,
    robustness: RobustnessConfig,
    edit_guard: Box<dyn EditGuard>,
    /// `None` until the first access (uninitialized)
    loaded: Option<Loaded>,
}

impl FileRepository {
    /// Create a repository for the settings file at `path`.
    ///
    /// The repository name is the file name without its extension. No I/O
    /// happens until the first accessor call.
    pub fn new(scope: SettingsScope, path: impl Into<NormalizedPath>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .unwrap_or(DEFAULT_SETTINGS_NAME)
            .to_string();

        Self {
            scope,
            name,
            path,
            robustness: RobustnessConfig::default(),
            edit_guard: Box::new(NoVersionControl),
            loaded: None,
        }
    }

    /// Project-scoped settings at
    /// `<root>/ProjectSettings/Packages/<package>/<name>.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if `package` or `name` is not a valid file name.
    pub fn project(root: impl Into<NormalizedPath>, package: &str, name: &str) -> Result<Self> {
        let path = SettingsPath::ProjectSettings.settings_file(&root.into(), package, name)?;
        Ok(Self::new(SettingsScope::Project, path))
    }

    /// User-scoped settings at
    /// `<root>/UserSettings/Packages/<package>/<name>.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if `package` or `name` is not a valid file name.
    pub fn user(root: impl Into<NormalizedPath>, package: &str, name: &str) -> Result<Self> {
        let path = SettingsPath::UserSettings.settings_file(&root.into(), package, name)?;
        Ok(Self::new(SettingsScope::User, path))
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }

    pub fn with_edit_guard(mut self, guard: impl EditGuard + 'static) -> Self {
        self.edit_guard = Box::new(guard);
        self
    }

    /// Whether the settings file has been read yet.
    pub fn is_initialized(&self) -> bool {
        self.loaded.is_some()
    }

    /// Forget the loaded contents so the next access re-reads the file.
    ///
    /// Unsaved changes are discarded.
    pub fn reload(&mut self) {
        if self.loaded.take().is_some() {
            tracing::debug!(path = %self.path, "Settings marked for reload");
        }
    }

    /// The loaded dictionary, reading the file first if needed.
    pub fn dictionary(&mut self) -> &SettingsDictionary {
        &self.loaded_mut().dictionary
    }

    fn loaded_mut(&mut self) -> &mut Loaded {
        let path = &self.path;
        self.loaded.get_or_insert_with(|| Loaded::read(path))
    }
}

impl SettingsRepository for FileRepository {
    fn scope(&self) -> SettingsScope {
        self.scope
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> Option<&NormalizedPath> {
        Some(&self.path)
    }

    fn set_value(&mut self, key: EntryKey, value: SettingValue) {
        self.loaded_mut().dictionary.set_value(key, value);
    }

    fn get_value(&mut self, key: &EntryKey) -> Option<SettingValue> {
        self.loaded_mut().dictionary.get_value(key)
    }

    fn contains(&mut self, key: &EntryKey) -> bool {
        self.loaded_mut().dictionary.contains(key)
    }

    fn remove_entry(&mut self, key: &EntryKey) -> bool {
        self.loaded_mut().dictionary.remove_entry(key)
    }

    fn save(&mut self) -> SaveOutcome {
        let path = &self.path;
        let loaded = self.loaded.get_or_insert_with(|| Loaded::read(path));

        if loaded.read_failed {
            tracing::warn!(path = %path, "Settings file could not be read, not overwriting it");
            return SaveOutcome::Aborted;
        }

        let text = match loaded.dictionary.to_json_string() {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %path, "Failed to serialize settings: {}", e);
                return SaveOutcome::Aborted;
            }
        };
        let fingerprint = compute_content_checksum(&text);

        // A matching fingerprint alone is not trusted: the file must still
        // hold exactly this text.
        if loaded.fingerprint.as_deref() == Some(fingerprint.as_str())
            && io::read_text_if_exists(path).ok().flatten().as_deref() == Some(text.as_str())
        {
            tracing::debug!(path = %path, "Settings unchanged, skipping write");
            return SaveOutcome::Unchanged;
        }

        let Some(directory) = path.parent() else {
            tracing::warn!(path = %path, "Cannot determine settings directory, not saving");
            return SaveOutcome::Aborted;
        };
        if let Err(e) = fs::create_dir_all(directory.to_native()) {
            tracing::warn!(path = %path, "Failed to create settings directory: {}", e);
            return SaveOutcome::Aborted;
        }

        if path.is_file() && !self.edit_guard.is_editable(path) {
            if let Err(e) = self.edit_guard.make_editable(path) {
                tracing::warn!(path = %path, "Settings file is locked for editing, not saving: {}", e);
                return SaveOutcome::Aborted;
            }
        }

        match io::write_atomic(path, text.as_bytes(), self.robustness) {
            Ok(()) => {
                tracing::debug!(path = %path, entries = loaded.dictionary.len(), "Saved settings");
                loaded.fingerprint = Some(fingerprint);
                SaveOutcome::Written
            }
            Err(e) => {
                tracing::warn!(path = %path, "Failed to write settings: {}", e);
                SaveOutcome::Aborted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settings_test_utils::TestProject;

    #[test]
    fn name_is_file_stem() {
        let repo = FileRepository::new(SettingsScope::Project, "/tmp/x/Editor.json");
        assert_eq!(repo.name(), "Editor");
        assert_eq!(repo.scope(), SettingsScope::Project);
    }

    #[test]
    fn constructors_lay_out_scope_directories() {
        let project = FileRepository::project("/work", "com.example", "Settings").unwrap();
        let user = FileRepository::user("/work", "com.example", "Settings").unwrap();

        assert_eq!(
            project.path().unwrap().as_str(),
            "/work/ProjectSettings/Packages/com.example/Settings.json"
        );
        assert_eq!(user.scope(), SettingsScope::User);
        assert_eq!(
            user.path().unwrap().as_str(),
            "/work/UserSettings/Packages/com.example/Settings.json"
        );
    }

    #[test]
    fn constructors_reject_bad_identifiers() {
        assert!(FileRepository::project("/work", "../escape", "Settings").is_err());
        assert!(FileRepository::user("/work", "pkg", "").is_err());
    }

    #[test]
    fn construction_does_not_touch_the_file() {
        let project = TestProject::new();
        let repo = FileRepository::project(project.root(), "pkg", "Settings").unwrap();

        assert!(!repo.is_initialized());
        project.assert_file_not_exists("ProjectSettings");
    }

    #[test]
    fn reload_discards_unsaved_changes() {
        let project = TestProject::new();
        let mut repo = FileRepository::project(project.root(), "pkg", "Settings").unwrap();
        repo.set("draft", true).unwrap();

        repo.reload();

        assert!(!repo.is_initialized());
        assert!(!repo.contains_key::<bool>("draft"));
    }

    #[test]
    fn bare_file_name_cannot_be_saved() {
        let mut repo = FileRepository::new(SettingsScope::Project, "Settings.json");
        repo.set("x", 1i32).unwrap();

        assert_eq!(repo.save(), SaveOutcome::Aborted);
    }
}
