pub mod cli;
pub mod toml_config;

use crate::core::export::DEFAULT_MAP_TITLE;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use toml_config::{LogFormat, TomlConfig};

#[cfg(feature = "cli")]
pub use args::{CatalogCommand, CliConfig, Command, ProfileCommand, TracksCommand};

pub const DEFAULT_DATA_DIR: &str = "./.learning-map";
pub const DEFAULT_OUTPUT_DIR: &str = "./exports";

/// Effective settings: command line flag, then config file, then default.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: String,
    pub output_dir: String,
    pub map_title: String,
    pub log_level: Option<String>,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn resolve(file: TomlConfig, data_dir: Option<String>, output_dir: Option<String>) -> Self {
        Self {
            data_dir: data_dir
                .or(file.storage.data_dir)
                .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
            output_dir: output_dir
                .or(file.export.output_dir)
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            map_title: file
                .export
                .title
                .unwrap_or_else(|| DEFAULT_MAP_TITLE.to_string()),
            log_level: file.logging.level,
            log_format: file.logging.format,
        }
    }
}

impl Settings {
    /// Reads and validates the config file, then applies the flags. Runs
    /// before logging is set up, so callers report failures directly.
    pub fn load(config_path: Option<&str>, data_dir: Option<String>) -> Result<Self> {
        let file = TomlConfig::discover(config_path)?;
        file.validate()?;
        let settings = Self::resolve(file, data_dir, None);
        settings.validate()?;
        Ok(settings)
    }
}

impl ConfigProvider for Settings {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn map_title(&self) -> &str {
        &self.map_title
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("data_dir", &self.data_dir)?;
        validate_path("output_dir", &self.output_dir)?;
        validate_non_empty_string("export.title", &self.map_title)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
mod args {
    use crate::core::export::ExportFormat;
    use crate::domain::levels::LevelId;
    use crate::domain::model::{CourseLevel, ItemKind, ItemStatus};
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "learning-map")]
    #[command(about = "Plan learning tracks on a leveled course grid")]
    pub struct CliConfig {
        /// Path to a TOML configuration file
        #[arg(long, global = true)]
        pub config: Option<String>,

        /// Directory holding saved profiles and the working grid
        #[arg(long, global = true)]
        pub data_dir: Option<String>,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Browse the course and certification catalog
        #[command(subcommand)]
        Catalog(CatalogCommand),

        /// List the grid rows
        Levels,

        /// Inspect and reset tracks
        #[command(subcommand)]
        Tracks(TracksCommand),

        /// Place a catalog item into a cell
        Place {
            #[arg(long)]
            title: String,
            #[arg(long)]
            track: String,
            #[arg(long)]
            level: LevelId,
        },

        /// Move a placed item to another cell
        Move {
            #[arg(long)]
            title: String,
            #[arg(long)]
            from: String,
            #[arg(long)]
            from_level: Option<LevelId>,
            #[arg(long)]
            to: String,
            #[arg(long)]
            level: LevelId,
        },

        /// Remove one placed item from a track
        Remove {
            #[arg(long)]
            track: String,
            #[arg(long)]
            title: String,
            #[arg(long)]
            level: Option<LevelId>,
        },

        /// Set or clear the progress status of a placed item
        Status {
            #[arg(long)]
            track: String,
            #[arg(long)]
            title: String,
            #[arg(long)]
            level: Option<LevelId>,
            #[arg(long, value_enum)]
            status: Option<ItemStatus>,
        },

        /// Manage saved profiles
        #[command(subcommand)]
        Profile(ProfileCommand),

        /// Export the grid or a single track
        Export {
            #[arg(long, value_enum, default_value = "json")]
            format: ExportFormat,
            #[arg(long)]
            track: Option<String>,
            #[arg(long)]
            output_dir: Option<String>,
        },

        /// Replace the grid with tracks from a JSON export
        Import { file: String },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum CatalogCommand {
        List {
            #[arg(long, value_enum)]
            kind: Option<ItemKind>,
            #[arg(long, value_enum)]
            level: Option<CourseLevel>,
            #[arg(long)]
            search: Option<String>,
        },
        Show { title: String },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum TracksCommand {
        List,
        Show { track: Option<String> },
        Add { name: String },
        LoadInitial,
        Empty,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum ProfileCommand {
        List,
        Create { name: String },
        Select { id: String },
        Delete { id: String },
        Save,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file_and_defaults() {
        let file = TomlConfig::from_toml_str(
            "[storage]\ndata_dir = \"/from/file\"\n[export]\noutput_dir = \"/file/out\"\n",
        )
        .unwrap();

        let settings = Settings::resolve(file.clone(), Some("/from/flag".into()), None);
        assert_eq!(settings.data_dir(), "/from/flag");
        assert_eq!(settings.output_dir(), "/file/out");
        assert_eq!(settings.map_title(), DEFAULT_MAP_TITLE);

        let settings = Settings::resolve(TomlConfig::default(), None, None);
        assert_eq!(settings.data_dir(), DEFAULT_DATA_DIR);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_reports_bad_config_files() {
        let dir = tempfile::TempDir::new().unwrap();

        let missing = dir.path().join("absent.toml");
        let err = Settings::load(missing.to_str(), None).unwrap_err();
        assert!(!err.recovery_suggestion().is_empty());

        let loud = dir.path().join("loud.toml");
        std::fs::write(&loud, "[logging]\nlevel = \"loud\"\n").unwrap();
        let err = Settings::load(loud.to_str(), None).unwrap_err();
        assert_eq!(err.category(), crate::utils::error::ErrorCategory::Configuration);

        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[export]\ntitle = \"Team Map\"\n").unwrap();
        let settings = Settings::load(good.to_str(), Some("/tmp/maps".into())).unwrap();
        assert_eq!(settings.map_title(), "Team Map");
        assert_eq!(settings.data_dir(), "/tmp/maps");
    }
}
