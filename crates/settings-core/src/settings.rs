//! The settings façade
//!
//! [`Settings`] owns a fixed, ordered list of repositories and routes typed
//! calls to them by scope and optional repository name. Ordinary misuse
//! (unknown scope, missing repository, missing key) never fails: it is
//! logged and answered with the fallback.

use settings_fs::{DEFAULT_SETTINGS_NAME, NormalizedPath};

use crate::Result;
use crate::dictionary::EntryKey;
use crate::hooks::{HostEvent, SaveEvent, SaveHooks};
use crate::repository::{
    FileRepository, PreferenceRepository, PreferenceStore, Repository, SaveOutcome,
    SettingsRepository,
};
use crate::scope::{RepositorySelector, SettingsScope};
use crate::value::SettingType;

/// Routes typed settings operations across a fixed set of repositories.
///
/// # Example
///
/// ```no_run
/// use settings_core::{MemoryPreferences, Settings, SettingsScope};
///
/// let mut settings = Settings::for_package("/work/game", "com.example.tools", MemoryPreferences::new())?;
/// settings.set("volume", 0.8f32, SettingsScope::Project)?;
/// settings.save();
///
/// let volume = settings.get("volume", SettingsScope::Project, 1.0f32);
/// assert_eq!(volume, 0.8);
/// # Ok::<(), settings_core::Error>(())
/// ```
#[derive(Debug)]
pub struct Settings {
    repositories: Vec<Repository>,
    hooks: SaveHooks,
    mirror_to_user: bool,
}

impl Settings {
    /// Create a façade over `repositories`, kept in the given order.
    pub fn new(repositories: impl IntoIterator<Item = Repository>) -> Self {
        Self {
            repositories: repositories.into_iter().collect(),
            hooks: SaveHooks::default(),
            mirror_to_user: false,
        }
    }

    /// The standard pair: project settings in
    /// `<root>/ProjectSettings/Packages/<package>/Settings.json` and user
    /// settings in `preferences`, namespaced by `package`.
    ///
    /// # Errors
    ///
    /// Returns an error if `package` is not a valid directory name.
    pub fn for_package(
        project_root: impl Into<NormalizedPath>,
        package: &str,
        preferences: impl PreferenceStore + 'static,
    ) -> Result<Self> {
        let project = FileRepository::project(project_root, package, DEFAULT_SETTINGS_NAME)?;
        let user = PreferenceRepository::new(package, preferences);
        Ok(Self::new([project.into(), user.into()]))
    }

    /// Also apply project-scope `set` and `delete_key` calls to user-scope
    /// repositories.
    ///
    /// Off by default. Enable only for data written by older releases that
    /// always mirrored project writes into user preferences.
    pub fn with_user_mirroring(mut self, enabled: bool) -> Self {
        self.mirror_to_user = enabled;
        self
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// First repository matching `scope` and, if given, `name`.
    pub fn get_repository(&self, scope: SettingsScope, name: Option<&str>) -> Option<&Repository> {
        let selector = RepositorySelector { scope, name };
        self.repositories
            .iter()
            .find(|repo| selector.matches(repo.scope(), repo.name()))
    }

    pub fn get_repository_mut(
        &mut self,
        scope: SettingsScope,
        name: Option<&str>,
    ) -> Option<&mut Repository> {
        let selector = RepositorySelector { scope, name };
        self.repositories
            .iter_mut()
            .find(|repo| selector.matches(repo.scope(), repo.name()))
    }

    /// Store `value` under `key` in every selected repository.
    ///
    /// A missing repository is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`](crate::Error::Serialization) if the
    /// value cannot be represented; no repository is modified then.
    pub fn set<'a, T: SettingType>(
        &mut self,
        key: &str,
        value: T,
        selector: impl Into<RepositorySelector<'a>>,
    ) -> Result<()> {
        let selector = selector.into();
        let entry = EntryKey::of::<T>(key);
        let value = value.into_value()?;

        let written = self.for_each_selected(selector, |repo| {
            repo.set_value(entry.clone(), value.clone());
        });
        if written == 0 {
            tracing::warn!(key, selector = %selector, "No repository to set value in");
        }

        if let Some(mirror) = self.user_mirror(selector) {
            self.for_each_selected(mirror, |repo| {
                repo.set_value(entry.clone(), value.clone());
            });
        }
        Ok(())
    }

    /// The value for `key` from the first selected repository, or `fallback`.
    ///
    /// Logs a warning only when no repository matches; a missing key is
    /// silent.
    pub fn get<'a, T: SettingType>(
        &mut self,
        key: &str,
        selector: impl Into<RepositorySelector<'a>>,
        fallback: T,
    ) -> T {
        self.try_get(key, selector).unwrap_or(fallback)
    }

    /// Like [`get`](Self::get) but tells a missing value apart.
    pub fn try_get<'a, T: SettingType>(
        &mut self,
        key: &str,
        selector: impl Into<RepositorySelector<'a>>,
    ) -> Option<T> {
        let selector = selector.into();
        let value = self.first_selected(selector)?.get_value(&EntryKey::of::<T>(key))?;
        T::from_value(&value)
    }

    /// Whether the first selected repository holds an entry for `(T, key)`.
    pub fn contains_key<'a, T: SettingType>(
        &mut self,
        key: &str,
        selector: impl Into<RepositorySelector<'a>>,
    ) -> bool {
        self.first_selected(selector.into())
            .is_some_and(|repo| repo.contains(&EntryKey::of::<T>(key)))
    }

    /// Delete `(T, key)` from every selected repository.
    ///
    /// Returns whether any entry was removed; absent keys are not an error.
    pub fn delete_key<'a, T: SettingType>(
        &mut self,
        key: &str,
        selector: impl Into<RepositorySelector<'a>>,
    ) -> bool {
        let selector = selector.into();
        let entry = EntryKey::of::<T>(key);

        let mut removed = false;
        let matched = self.for_each_selected(selector, |repo| {
            removed |= repo.remove_entry(&entry);
        });
        if matched == 0 {
            tracing::warn!(key, selector = %selector, "No repository to delete value from");
        }

        if let Some(mirror) = self.user_mirror(selector) {
            self.for_each_selected(mirror, |repo| {
                removed |= repo.remove_entry(&entry);
            });
        }
        removed
    }

    /// Save every repository in order, notifying subscribers before and
    /// after.
    ///
    /// Returns each repository's outcome in repository order.
    pub fn save(&mut self) -> Vec<SaveOutcome> {
        self.hooks.notify(SaveEvent::BeforeSave);
        let outcomes = self.repositories.iter_mut().map(|repo| repo.save()).collect();
        self.hooks.notify(SaveEvent::AfterSave);
        outcomes
    }

    /// Subscribe to a save notification.
    pub fn on_save(&mut self, event: SaveEvent, listener: impl FnMut(SaveEvent) + 'static) {
        self.hooks.subscribe(event, listener);
    }

    /// React to a lifecycle signal from the host application.
    ///
    /// Both events flush pending changes. Before a reload, file repositories
    /// are also reset so the reloaded host reads fresh file contents.
    pub fn handle_host_event(&mut self, event: HostEvent) -> Vec<SaveOutcome> {
        tracing::debug!(%event, "Flushing settings for host event");
        let outcomes = self.save();
        if event == HostEvent::BeforeReload {
            for repo in self.repositories.iter_mut().filter_map(Repository::as_file_mut) {
                repo.reload();
            }
        }
        outcomes
    }

    fn first_selected(&mut self, selector: RepositorySelector<'_>) -> Option<&mut Repository> {
        let repo = self.get_repository_mut(selector.scope, selector.name);
        if repo.is_none() {
            tracing::warn!(selector = %selector, "No matching settings repository");
        }
        repo
    }

    /// Run `f` on every selected repository; returns how many matched.
    fn for_each_selected(
        &mut self,
        selector: RepositorySelector<'_>,
        mut f: impl FnMut(&mut Repository),
    ) -> usize {
        let mut matched = 0;
        for repo in self
            .repositories
            .iter_mut()
            .filter(|repo| selector.matches(repo.scope(), repo.name()))
        {
            f(repo);
            matched += 1;
        }
        matched
    }

    /// Every user-scope repository, when project writes are mirrored.
    fn user_mirror(&self, selector: RepositorySelector<'_>) -> Option<RepositorySelector<'static>> {
        (self.mirror_to_user && selector.scope == SettingsScope::Project)
            .then_some(RepositorySelector::from(SettingsScope::User))
    }
}

impl From<Vec<Repository>> for Settings {
    fn from(repositories: Vec<Repository>) -> Self {
        Self::new(repositories)
    }
}
