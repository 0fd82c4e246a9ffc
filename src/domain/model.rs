use crate::domain::levels::LevelId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Course,
    Certification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum CourseLevel {
    Fundamental,
    Associate,
    Professional,
}

impl CourseLevel {
    pub fn label(&self) -> &'static str {
        match self {
            CourseLevel::Fundamental => "Fundamental",
            CourseLevel::Associate => "Associate",
            CourseLevel::Professional => "Professional",
        }
    }

    /// Badge background used by the exports.
    pub fn badge_color(&self) -> &'static str {
        match self {
            CourseLevel::Fundamental => "#e3f2fd",
            CourseLevel::Associate => "#e8f5e9",
            CourseLevel::Professional => "#ffebee",
        }
    }
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CourseLevel::Fundamental => "fundamental",
            CourseLevel::Associate => "associate",
            CourseLevel::Professional => "professional",
        };
        f.write_str(s)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Course => f.write_str("course"),
            ItemKind::Certification => f.write_str("certification"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemStatus::NotStarted => f.write_str("not started"),
            ItemStatus::InProgress => f.write_str("in progress"),
            ItemStatus::Completed => f.write_str("completed"),
        }
    }
}

/// A course or certification from the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub title: String,
    pub url: String,
    pub duration: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub level: CourseLevel,
}

/// A catalog item dropped into a grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedItem {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub target_level: LevelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_track_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_level_id: Option<LevelId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

impl PlacedItem {
    pub fn new(item: CatalogItem, target_level: LevelId) -> Self {
        Self {
            item,
            target_level,
            source_track_id: None,
            source_level_id: None,
            status: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.item.title
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<PlacedItem>,
}

impl Track {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn items_at(&self, level: LevelId) -> impl Iterator<Item = &PlacedItem> {
        self.items.iter().filter(move |i| i.target_level == level)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Profile {
    pub fn new(id: String, name: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            created_at: now,
            updated_at: now,
            tracks: Vec::new(),
        }
    }

    /// Replaces the tracks; `updated_at` strictly advances even when the
    /// clock has not moved since the previous update.
    pub fn set_tracks(&mut self, tracks: Vec<Track>, now: DateTime<Utc>) {
        self.tracks = tracks;
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::milliseconds(1)
        };
    }
}

/// Persisted document holding every saved profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileState {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub active_profile_id: Option<String>,
}
