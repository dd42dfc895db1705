//! CLI argument parsing using clap derive

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use settings_core::SettingsScope;
use settings_fs::DEFAULT_SETTINGS_NAME;

/// Settings Manager - Read and write typed project and user settings
#[derive(Parser, Debug)]
#[command(name = "settings")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root containing ProjectSettings/
    #[arg(long, global = true, env = "SETTINGS_PROJECT_ROOT", default_value = ".")]
    pub project_root: PathBuf,

    /// Package identifier the settings belong to
    #[arg(long, global = true, env = "SETTINGS_PACKAGE")]
    pub package: Option<String>,

    /// Name of the project settings file, without extension
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_NAME)]
    pub name: String,

    /// User preference file [default: <config dir>/settings-manager/preferences.json]
    #[arg(long, global = true, env = "SETTINGS_PREFERENCES")]
    pub preferences: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Print the value stored under a key
    ///
    /// Examples:
    ///   settings get volume --type float
    ///   settings get theme --scope user --default light
    Get {
        /// Key to read
        key: String,

        /// Value type the key was stored with
        #[arg(short = 't', long = "type", value_enum, default_value_t = ValueKind::String)]
        kind: ValueKind,

        /// Scope to read from (project or user)
        #[arg(short, long, default_value = "project")]
        scope: SettingsScope,

        /// Printed when the key has no value
        #[arg(long)]
        default: Option<String>,
    },

    /// Store a value under a key and save
    ///
    /// Examples:
    ///   settings set volume 0.8 --type float
    ///   settings set recent '["a.scene"]' --type json --scope user
    Set {
        /// Key to write
        key: String,

        /// Value, parsed according to --type
        value: String,

        /// Value type to store
        #[arg(short = 't', long = "type", value_enum, default_value_t = ValueKind::String)]
        kind: ValueKind,

        /// Scope to write to (project or user)
        #[arg(short, long, default_value = "project")]
        scope: SettingsScope,
    },

    /// Delete a key and save
    Delete {
        /// Key to delete
        key: String,

        /// Value type the key was stored with
        #[arg(short = 't', long = "type", value_enum, default_value_t = ValueKind::String)]
        kind: ValueKind,

        /// Scope to delete from (project or user)
        #[arg(short, long, default_value = "project")]
        scope: SettingsScope,
    },

    /// List repositories and the project settings entries
    Show {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print where settings for a scope are stored
    Path {
        /// Scope to locate (project or user)
        #[arg(short, long, default_value = "project")]
        scope: SettingsScope,
    },
}

/// Value types accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    /// Signed 64-bit integer
    Int,
    /// Unsigned 64-bit integer
    Uint,
    /// 64-bit float
    Float,
    String,
    /// Any JSON document
    Json,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::String => "string",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}
