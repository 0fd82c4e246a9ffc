use crate::domain::model::{CatalogItem, CourseLevel, ItemKind, Track};
use crate::utils::error::{MapError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url};
use serde::{Deserialize, Serialize};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");
const INITIAL_TRACKS: &str = include_str!("../../data/initial_tracks.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Certifications,
    Courses,
    ExamPrep,
}

impl Section {
    pub fn heading(&self) -> &'static str {
        match self {
            Section::Certifications => "AWS Certifications",
            Section::Courses => "Training Courses",
            Section::ExamPrep => "Exam Preparation",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    certifications: Vec<CatalogItem>,
    #[serde(default)]
    courses: Vec<CatalogItem>,
    #[serde(default)]
    exam_prep: Vec<CatalogItem>,
}

/// Criteria for [`Catalog::filter`]; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub kind: Option<ItemKind>,
    pub level: Option<CourseLevel>,
    pub section: Option<Section>,
    pub text: Option<String>,
}

impl Catalog {
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(content)?;
        catalog.validate_items()?;
        tracing::debug!("Loaded catalog with {} items", catalog.len());
        Ok(catalog)
    }

    fn validate_items(&self) -> Result<()> {
        for item in self.items() {
            validate_non_empty_string("catalog.title", &item.title)?;
            validate_url("catalog.url", &item.url)?;
        }
        Ok(())
    }

    pub fn section(&self, section: Section) -> &[CatalogItem] {
        match section {
            Section::Certifications => &self.certifications,
            Section::Courses => &self.courses,
            Section::ExamPrep => &self.exam_prep,
        }
    }

    pub fn sections(&self) -> impl Iterator<Item = (Section, &[CatalogItem])> {
        [Section::Certifications, Section::Courses, Section::ExamPrep]
            .into_iter()
            .map(move |s| (s, self.section(s)))
    }

    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.certifications
            .iter()
            .chain(self.courses.iter())
            .chain(self.exam_prep.iter())
    }

    pub fn len(&self) -> usize {
        self.certifications.len() + self.courses.len() + self.exam_prep.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact title match first, then a case-insensitive one.
    pub fn find(&self, title: &str) -> Result<&CatalogItem> {
        self.items()
            .find(|i| i.title == title)
            .or_else(|| {
                let wanted = title.to_lowercase();
                self.items().find(|i| i.title.to_lowercase() == wanted)
            })
            .ok_or_else(|| MapError::UnknownCatalogItem {
                title: title.to_string(),
            })
    }

    pub fn filter<'a>(&'a self, query: &'a CatalogQuery) -> impl Iterator<Item = (Section, &'a CatalogItem)> + 'a {
        let text = query.text.as_ref().map(|t| t.to_lowercase());
        self.sections()
            .filter(move |(s, _)| query.section.map_or(true, |wanted| wanted == *s))
            .flat_map(|(s, items)| items.iter().map(move |i| (s, i)))
            .filter(move |(_, i)| query.kind.map_or(true, |k| k == i.kind))
            .filter(move |(_, i)| query.level.map_or(true, |l| l == i.level))
            .filter(move |(_, i)| {
                text.as_ref()
                    .map_or(true, |t| i.title.to_lowercase().contains(t.as_str()))
            })
    }
}

/// The starter tracks offered by "load initial tracks".
pub fn initial_tracks() -> Result<Vec<Track>> {
    let tracks: Vec<Track> = serde_json::from_str(INITIAL_TRACKS)?;
    Ok(tracks)
}
