use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown track: {track_id}")]
    UnknownTrack { track_id: String },

    #[error("Unknown level: {level_id}")]
    UnknownLevel { level_id: String },

    #[error("No item titled '{title}' in track {track_id}")]
    ItemNotFound { track_id: String, title: String },

    #[error("No catalog item titled '{title}'")]
    UnknownCatalogItem { title: String },

    #[error("Unknown profile: {profile_id}")]
    UnknownProfile { profile_id: String },

    #[error("Import failed: {message}")]
    ImportError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Storage,
    Planning,
    Import,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl MapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MapError::ConfigError { .. }
            | MapError::ConfigValidationError { .. }
            | MapError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            MapError::IoError(_) => ErrorCategory::Storage,
            MapError::UnknownTrack { .. }
            | MapError::UnknownLevel { .. }
            | MapError::ItemNotFound { .. }
            | MapError::UnknownCatalogItem { .. }
            | MapError::UnknownProfile { .. }
            | MapError::ValidationError { .. } => ErrorCategory::Planning,
            MapError::ImportError { .. } | MapError::SerializationError(_) => {
                ErrorCategory::Import
            }
            MapError::ZipError(_) => ErrorCategory::Export,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MapError::UnknownTrack { .. }
            | MapError::UnknownLevel { .. }
            | MapError::ItemNotFound { .. }
            | MapError::UnknownCatalogItem { .. }
            | MapError::UnknownProfile { .. }
            | MapError::ValidationError { .. }
            | MapError::ImportError { .. } => ErrorSeverity::Medium,
            MapError::ConfigError { .. }
            | MapError::ConfigValidationError { .. }
            | MapError::InvalidConfigValueError { .. }
            | MapError::SerializationError(_)
            | MapError::ZipError(_) => ErrorSeverity::High,
            MapError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MapError::ConfigError { .. }
            | MapError::ConfigValidationError { .. }
            | MapError::InvalidConfigValueError { .. } => {
                "Check learning-map.toml and the command line flags"
            }
            MapError::IoError(_) => "Check that the data directory exists and is writable",
            MapError::UnknownTrack { .. } => "Run `learning-map tracks list` to see track ids",
            MapError::UnknownLevel { .. } => "Run `learning-map levels` to see level ids",
            MapError::ItemNotFound { .. } => {
                "Run `learning-map tracks show <track>` to see what is placed"
            }
            MapError::UnknownCatalogItem { .. } => {
                "Run `learning-map catalog list` to see available titles"
            }
            MapError::UnknownProfile { .. } => "Run `learning-map profile list` to see profile ids",
            MapError::ImportError { .. } | MapError::SerializationError(_) => {
                "Make sure the file is a track list exported by this tool"
            }
            MapError::ValidationError { .. } => "Check the values passed to the command",
            MapError::ZipError(_) => "Retry the export; check free disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MapError::IoError(e) => format!("Could not read or write planner data: {}", e),
            MapError::SerializationError(e) => format!("Stored data is not valid JSON: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planning_errors_are_recoverable() {
        let err = MapError::UnknownTrack {
            track_id: "track-9".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Planning);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("track-9"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err: MapError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
