//! End-to-end scenarios across settings-fs and settings-core
//!
//! Each test builds a façade the way an application would, persists through
//! it, then checks what a fresh façade sees.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use settings_core::{
    FileRepository, HostEvent, JsonPreferences, MemoryPreferences, PreferenceRepository,
    Repository, SaveEvent, SaveOutcome, Settings, SettingsRepository, SettingsScope,
};
use settings_test_utils::TestProject;

const PACKAGE: &str = "com.example.tools";

fn facade(project: &TestProject) -> Settings {
    Settings::for_package(project.root(), PACKAGE, MemoryPreferences::new()).unwrap()
}

#[test]
fn volume_survives_a_new_facade() {
    let project = TestProject::new();

    let mut settings = facade(&project);
    settings.set("volume", 0.8f32, SettingsScope::Project).unwrap();
    settings.save();

    let mut reopened = facade(&project);
    assert_eq!(reopened.get("volume", SettingsScope::Project, 1.0f32), 0.8);
}

#[test]
fn file_is_written_in_readable_form() {
    let project = TestProject::new();

    let mut settings = facade(&project);
    settings.set("volume", 0.8f32, SettingsScope::Project).unwrap();
    settings.save();

    let text = project.read(&format!("ProjectSettings/Packages/{PACKAGE}/Settings.json"));
    assert!(text.contains("\"type\": \"f32\""), "{text}");
    assert!(text.contains("\"value\": 0.8"), "{text}");
    assert!(text.ends_with('\n'));
}

#[test]
fn repeated_saves_write_once() {
    let project = TestProject::new();
    let mut settings = facade(&project);
    settings.set("count", 1i32, SettingsScope::Project).unwrap();

    assert_eq!(settings.save()[0], SaveOutcome::Written);
    assert_eq!(settings.save()[0], SaveOutcome::Unchanged);

    settings.set("count", 2i32, SettingsScope::Project).unwrap();
    assert_eq!(settings.save()[0], SaveOutcome::Written);
}

#[test]
fn unsaved_changes_are_not_persisted() {
    let project = TestProject::new();

    let mut settings = facade(&project);
    settings.set("count", 1i32, SettingsScope::Project).unwrap();
    drop(settings);

    let mut reopened = facade(&project);
    assert!(!reopened.contains_key::<i32>("count", SettingsScope::Project));
}

#[test]
fn quitting_host_flushes_changes() {
    let project = TestProject::new();

    let mut settings = facade(&project);
    settings.set("theme", "dark".to_string(), SettingsScope::Project).unwrap();
    settings.handle_host_event(HostEvent::Quitting);

    let mut reopened = facade(&project);
    assert_eq!(
        reopened.get("theme", SettingsScope::Project, String::new()),
        "dark"
    );
}

#[test]
fn reload_picks_up_external_edits_after_flush() {
    let project = TestProject::new();
    let mut settings = facade(&project);
    settings.set("count", 1i32, SettingsScope::Project).unwrap();
    settings.handle_host_event(HostEvent::BeforeReload);

    // Another tool rewrites the file while the host reloads
    let mut other = FileRepository::project(project.root(), PACKAGE, "Settings").unwrap();
    other.set("count", 7i32).unwrap();
    other.save();

    assert_eq!(settings.get("count", SettingsScope::Project, 0i32), 7);
}

#[test]
fn save_hooks_wrap_each_flush() {
    let project = TestProject::new();
    let mut settings = facade(&project);
    let log = Rc::new(RefCell::new(Vec::new()));
    for event in [SaveEvent::BeforeSave, SaveEvent::AfterSave] {
        let log = Rc::clone(&log);
        settings.on_save(event, move |e| log.borrow_mut().push(e.to_string()));
    }

    settings.save();
    settings.handle_host_event(HostEvent::Quitting);

    assert_eq!(
        *log.borrow(),
        vec!["before-save", "after-save", "before-save", "after-save"]
    );
}

#[test]
fn user_preferences_persist_in_their_own_file() {
    let project = TestProject::new();
    let prefs = project.root().join("prefs.json");

    {
        let store = JsonPreferences::open(prefs.as_path()).unwrap();
        let mut settings = Settings::for_package(project.root(), PACKAGE, store).unwrap();
        settings.set("autosave", true, SettingsScope::User).unwrap();
        settings.set("autosave", false, SettingsScope::Project).unwrap();
        settings.save();
    }

    let store = JsonPreferences::open(prefs.as_path()).unwrap();
    let mut settings = Settings::for_package(project.root(), PACKAGE, store).unwrap();
    assert!(settings.get("autosave", SettingsScope::User, false));
    assert!(!settings.get("autosave", SettingsScope::Project, true));
}

#[test]
fn packages_sharing_a_preference_file_do_not_collide() {
    let project = TestProject::new();
    let prefs = project.root().join("prefs.json");

    let open = |namespace: &str| {
        PreferenceRepository::new(namespace, JsonPreferences::open(prefs.as_path()).unwrap())
    };

    open("com.first").set("zoom", 1i32).unwrap();
    open("com.second").set("zoom", 2i32).unwrap();

    assert_eq!(open("com.first").get("zoom", 0i32), 1);
    assert_eq!(open("com.second").get("zoom", 0i32), 2);
}

#[test]
fn legacy_mirroring_keeps_user_copy_in_sync() {
    let project = TestProject::new();
    let project_repo = FileRepository::project(project.root(), PACKAGE, "Settings").unwrap();
    let user_repo = FileRepository::user(project.root(), PACKAGE, "Settings").unwrap();
    let mut settings =
        Settings::new([Repository::from(project_repo), Repository::from(user_repo)])
            .with_user_mirroring(true);

    settings.set("count", 3i32, SettingsScope::Project).unwrap();
    settings.save();

    project.assert_file_contains(
        &format!("UserSettings/Packages/{PACKAGE}/Settings.json"),
        "\"count\"",
    );
}
