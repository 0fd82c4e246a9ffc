//! Rendering the grid into files: JSON track lists, standalone HTML pages
//! and slide decks.

pub mod html;
pub mod json;
pub mod slides;

use crate::domain::model::Track;
use crate::utils::error::{MapError, Result};
use chrono::NaiveDate;
use std::fmt;

pub const DEFAULT_MAP_TITLE: &str = "AWS Learning Map";
const DEFAULT_FILE_STEM: &str = "aws-learning-map";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ExportFormat {
    Json,
    Html,
    Slides,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
            ExportFormat::Slides => "pptx",
        }
    }

    fn exporter(&self) -> Box<dyn Exporter> {
        match self {
            ExportFormat::Json => Box::new(json::JsonExporter),
            ExportFormat::Html => Box::new(html::HtmlExporter),
            ExportFormat::Slides => Box::new(slides::SlideExporter),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// What to export: every track, or a single selected one.
#[derive(Debug, Clone)]
pub struct ExportScope<'a> {
    tracks: &'a [Track],
    selected: Option<&'a Track>,
    map_title: &'a str,
}

impl<'a> ExportScope<'a> {
    pub fn new(tracks: &'a [Track], selected_track_id: Option<&str>, map_title: &'a str) -> Result<Self> {
        let selected = selected_track_id
            .map(|id| {
                tracks
                    .iter()
                    .find(|t| t.id == id)
                    .ok_or_else(|| MapError::UnknownTrack {
                        track_id: id.to_string(),
                    })
            })
            .transpose()?;

        Ok(Self {
            tracks,
            selected,
            map_title,
        })
    }

    pub fn all_tracks(&self) -> &'a [Track] {
        self.tracks
    }

    pub fn selected(&self) -> Option<&'a Track> {
        self.selected
    }

    /// Tracks that appear in the rendered document.
    pub fn tracks(&self) -> &'a [Track] {
        match self.selected {
            Some(track) => std::slice::from_ref(track),
            None => self.tracks,
        }
    }

    pub fn title(&self) -> String {
        match self.selected {
            Some(track) => format!("{} Learning Track", track.name),
            None => self.map_title.to_string(),
        }
    }

    pub fn file_name(&self, format: ExportFormat, date: NaiveDate) -> String {
        let stem = match self.selected {
            Some(track) => slugify(&track.name),
            None => DEFAULT_FILE_STEM.to_string(),
        };
        format!("{}-{}.{}", stem, date.format("%Y-%m-%d"), format.extension())
    }
}

#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub trait Exporter {
    fn render(&self, scope: &ExportScope<'_>) -> Result<Vec<u8>>;
}

pub fn export(format: ExportFormat, scope: &ExportScope<'_>, date: NaiveDate) -> Result<ExportArtifact> {
    let bytes = format.exporter().render(scope)?;
    let file_name = scope.file_name(format, date);
    tracing::info!("Rendered {} ({} bytes)", file_name, bytes.len());
    Ok(ExportArtifact {
        format,
        file_name,
        bytes,
    })
}

/// Lowercases and joins the alphanumeric words of `name` with `-`, so the
/// result is always a plain file name.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
