//! Command implementations for settings-cli

pub mod show;
pub mod value;

pub use show::{run_path, run_show};
pub use value::{run_delete, run_get, run_set};

use settings_core::{SaveOutcome, Settings};

use crate::error::{CliError, Result};

/// Save all repositories, failing if any save was abandoned.
fn save_all(settings: &mut Settings) -> Result<()> {
    if settings.save().contains(&SaveOutcome::Aborted) {
        return Err(CliError::user(
            "Failed to save settings (see warnings above)",
        ));
    }
    Ok(())
}
