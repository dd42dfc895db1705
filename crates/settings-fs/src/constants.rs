//! Directory names and defaults for settings file locations.

use std::path::Path;

use crate::{NormalizedPath, Result, validate_path_identifier};

/// Settings name used when a caller does not pick one.
pub const DEFAULT_SETTINGS_NAME: &str = "Settings";

/// Extension of every settings file.
pub const SETTINGS_EXTENSION: &str = "json";

/// Standard settings directories below a project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsPath {
    /// Shared settings, committed alongside the project
    ProjectSettings,
    /// Per-user settings for this project, not committed
    UserSettings,
    /// Per-package subdirectory inside either settings root
    Packages,
}

impl SettingsPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectSettings => "ProjectSettings",
            Self::UserSettings => "UserSettings",
            Self::Packages => "Packages",
        }
    }

    /// Compute `<root>/<self>/Packages/<package>/<name>.json`.
    ///
    /// Both `package` and `name` must be single path components.
    pub fn settings_file(
        &self,
        root: &NormalizedPath,
        package: &str,
        name: &str,
    ) -> Result<NormalizedPath> {
        validate_path_identifier(package)?;
        validate_path_identifier(name)?;

        Ok(root
            .join(self.as_str())
            .join(Self::Packages.as_str())
            .join(package)
            .join(&format!("{name}.{SETTINGS_EXTENSION}")))
    }
}

impl AsRef<Path> for SettingsPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for SettingsPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for SettingsPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_settings_file_layout() {
        let root = NormalizedPath::new("/work/game");
        let path = SettingsPath::ProjectSettings
            .settings_file(&root, "com.example.tools", DEFAULT_SETTINGS_NAME)
            .unwrap();
        assert_eq!(
            path.as_str(),
            "/work/game/ProjectSettings/Packages/com.example.tools/Settings.json"
        );
    }

    #[test]
    fn user_settings_file_layout() {
        let root = NormalizedPath::new("/work/game");
        let path = SettingsPath::UserSettings
            .settings_file(&root, "com.example.tools", "Editor")
            .unwrap();
        assert_eq!(
            path.as_str(),
            "/work/game/UserSettings/Packages/com.example.tools/Editor.json"
        );
    }

    #[test]
    fn settings_file_rejects_traversal() {
        let root = NormalizedPath::new("/work/game");
        assert!(
            SettingsPath::ProjectSettings
                .settings_file(&root, "..", "Settings")
                .is_err()
        );
        assert!(
            SettingsPath::ProjectSettings
                .settings_file(&root, "pkg", "a/b")
                .is_err()
        );
    }
}
