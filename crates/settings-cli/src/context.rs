//! Settings context resolution
//!
//! Turns the global command-line options into the file and preference
//! locations a command operates on, and builds the [`Settings`] façade over
//! them.

use std::path::{Path, PathBuf};

use settings_core::{FileRepository, JsonPreferences, PreferenceRepository, Repository, Settings};
use settings_fs::NormalizedPath;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Where one invocation reads and writes settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsContext {
    pub project_root: PathBuf,
    pub package: String,
    pub name: String,
    pub preferences: PathBuf,
}

impl SettingsContext {
    /// Resolve the context from parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns a user error if no package was given or no preference file
    /// location can be determined.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let package = cli.package.clone().ok_or_else(|| {
            CliError::user("No package given. Pass --package or set SETTINGS_PACKAGE.")
        })?;
        let preferences = match &cli.preferences {
            Some(path) => path.clone(),
            None => JsonPreferences::default_location()
                .map(|path| path.to_native())
                .ok_or_else(|| {
                    CliError::user("No config directory on this platform. Pass --preferences.")
                })?,
        };

        Ok(Self {
            project_root: cli.project_root.clone(),
            package,
            name: cli.name.clone(),
            preferences,
        })
    }

    /// Repository over the project settings file.
    pub fn project_file(&self) -> Result<FileRepository> {
        Ok(FileRepository::project(
            self.project_root.as_path(),
            &self.package,
            &self.name,
        )?)
    }

    pub fn preferences_path(&self) -> &Path {
        &self.preferences
    }

    /// Build the façade: the project file first, then user preferences.
    pub fn open(&self) -> Result<Settings> {
        let project = self.project_file()?;
        let store = JsonPreferences::open(NormalizedPath::new(&self.preferences))?;
        let user = PreferenceRepository::new(&self.package, store);
        Ok(Settings::new([
            Repository::from(project),
            Repository::from(user),
        ]))
    }
}
