//! The fixed rows of the learning map grid.
//!
//! Rows are grouped into three bands (fundamental, associate, professional);
//! exports draw a separator after the last row of the first two bands.

use crate::domain::model::{CatalogItem, CourseLevel, ItemKind};
use crate::utils::error::MapError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LevelId {
    #[serde(rename = "level-1")]
    Level1,
    #[serde(rename = "exam-readiness-1")]
    ExamReadiness1,
    #[serde(rename = "exam-1")]
    Exam1,
    #[serde(rename = "level-2-core")]
    Level2Core,
    #[serde(rename = "exam-readiness-2")]
    ExamReadiness2,
    #[serde(rename = "exam-2")]
    Exam2,
    #[serde(rename = "level-2-additional")]
    Level2Additional,
    #[serde(rename = "level-3")]
    Level3,
    #[serde(rename = "exam-readiness-3")]
    ExamReadiness3,
    #[serde(rename = "exam-3")]
    Exam3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Fundamental,
    Associate,
    Professional,
}

impl Band {
    /// Row background used by the grid exports.
    pub fn background(&self) -> &'static str {
        match self {
            Band::Fundamental => "#f2f8fd",
            Band::Associate => "#f2f8f6",
            Band::Professional => "#f7f4fc",
        }
    }
}

const ALL_LEVELS: [LevelId; 10] = [
    LevelId::Level1,
    LevelId::ExamReadiness1,
    LevelId::Exam1,
    LevelId::Level2Core,
    LevelId::ExamReadiness2,
    LevelId::Exam2,
    LevelId::Level2Additional,
    LevelId::Level3,
    LevelId::ExamReadiness3,
    LevelId::Exam3,
];

impl LevelId {
    pub fn all() -> &'static [LevelId] {
        &ALL_LEVELS
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelId::Level1 => "level-1",
            LevelId::ExamReadiness1 => "exam-readiness-1",
            LevelId::Exam1 => "exam-1",
            LevelId::Level2Core => "level-2-core",
            LevelId::ExamReadiness2 => "exam-readiness-2",
            LevelId::Exam2 => "exam-2",
            LevelId::Level2Additional => "level-2-additional",
            LevelId::Level3 => "level-3",
            LevelId::ExamReadiness3 => "exam-readiness-3",
            LevelId::Exam3 => "exam-3",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LevelId::Level1 => "Level 1 (Fundamental)",
            LevelId::ExamReadiness1 => "L1 Exam Readiness",
            LevelId::Exam1 => "L1 Exam",
            LevelId::Level2Core => "Level 2 (Associate – Core Topics)",
            LevelId::ExamReadiness2 => "L2 Exam Readiness",
            LevelId::Exam2 => "L2 Exam",
            LevelId::Level2Additional => "Level 2 (Associate – Additional Topics)",
            LevelId::Level3 => "Level 3 (Specialty / Professional)",
            LevelId::ExamReadiness3 => "L3 Exam Readiness",
            LevelId::Exam3 => "L3 Exams",
        }
    }

    pub fn band(&self) -> Band {
        match self.index() {
            0..=2 => Band::Fundamental,
            3..=6 => Band::Associate,
            _ => Band::Professional,
        }
    }

    /// True for the last row of the fundamental and associate bands.
    pub fn ends_band(&self) -> bool {
        matches!(self, LevelId::Exam1 | LevelId::Level2Additional)
    }

    /// Header color as `#rrggbb`.
    pub fn header_color(&self) -> &'static str {
        match self {
            LevelId::Level1 => "#0972d3",
            LevelId::Level2Core | LevelId::Level2Additional => "#037f0c",
            LevelId::Level3 => "#5f1dc5",
            _ => "#414d5c",
        }
    }

    /// The row a catalog item lands in when no explicit row is chosen.
    pub fn default_for(item: &CatalogItem) -> LevelId {
        match (item.kind, item.level) {
            (ItemKind::Course, CourseLevel::Fundamental) => LevelId::Level1,
            (ItemKind::Course, CourseLevel::Associate) => LevelId::Level2Core,
            (ItemKind::Course, CourseLevel::Professional) => LevelId::Level3,
            (ItemKind::Certification, CourseLevel::Fundamental) => LevelId::Exam1,
            (ItemKind::Certification, CourseLevel::Associate) => LevelId::Exam2,
            (ItemKind::Certification, CourseLevel::Professional) => LevelId::Exam3,
        }
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LevelId {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_LEVELS
            .iter()
            .copied()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| MapError::UnknownLevel {
                level_id: s.to_string(),
            })
    }
}
