//! Tests against hand-maintained settings files in `test-fixtures/`

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use settings_core::{
    FileRepository, Json, MemoryPreferences, SaveOutcome, Settings, SettingsRepository,
    SettingsScope,
};
use settings_test_utils::TestProject;

const PACKAGE: &str = "com.example.tools";

fn fixture_settings() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/projects/sample/ProjectSettings/Packages")
        .join(PACKAGE)
        .join("Settings.json")
}

/// Copy the sample project into a scratch directory so saves cannot touch
/// the fixture.
fn sample_project() -> TestProject {
    let project = TestProject::new();
    let text = fs::read_to_string(fixture_settings()).unwrap();
    project.write(
        &format!("ProjectSettings/Packages/{PACKAGE}/Settings.json"),
        &text,
    );
    project
}

#[test]
fn fixture_values_load_with_their_types() {
    let project = sample_project();
    let mut settings =
        Settings::for_package(project.root(), PACKAGE, MemoryPreferences::new()).unwrap();

    assert!(settings.get("autosave", SettingsScope::Project, false));
    assert_eq!(settings.get("volume", SettingsScope::Project, 1.0f32), 0.8);
    assert_eq!(settings.get("autosaveMinutes", SettingsScope::Project, 0i32), 5);
    assert_eq!(
        settings.get("theme", SettingsScope::Project, String::new()),
        "dark"
    );
    assert_eq!(
        settings
            .get(
                "recentScenes",
                SettingsScope::Project,
                Json(Vec::<String>::new())
            )
            .into_inner(),
        vec!["Assets/Main.scene", "Assets/Menu.scene"]
    );
}

#[test]
fn wrong_type_reads_the_fallback() {
    let project = sample_project();
    let mut repo = FileRepository::project(project.root(), PACKAGE, "Settings").unwrap();

    // Stored as f32, so an f64 lookup is a different entry
    assert_eq!(repo.get("volume", 1.0f64), 1.0);
    assert!(!repo.contains_key::<String>("autosave"));
}

#[test]
fn fixture_is_already_in_canonical_form() {
    let project = sample_project();
    let mut repo = FileRepository::project(project.root(), PACKAGE, "Settings").unwrap();

    assert_eq!(repo.dictionary().len(), 5);
    assert_eq!(repo.save(), SaveOutcome::Unchanged);
}

#[test]
fn editing_one_entry_keeps_the_others() {
    let project = sample_project();
    let mut repo = FileRepository::project(project.root(), PACKAGE, "Settings").unwrap();
    repo.set("theme", "light".to_string()).unwrap();
    assert_eq!(repo.save(), SaveOutcome::Written);

    let mut reloaded = FileRepository::project(project.root(), PACKAGE, "Settings").unwrap();
    assert_eq!(reloaded.get("theme", String::new()), "light");
    assert_eq!(reloaded.get("autosaveMinutes", 0i32), 5);
    assert_eq!(reloaded.dictionary().len(), 5);
}
