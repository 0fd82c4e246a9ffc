//! In-memory track grid and the drop events that rearrange it.
//!
//! Columns are tracks, rows are [`LevelId`]s. Every mutation validates its
//! inputs before touching any track, so a failed call leaves the grid as it
//! was.

use crate::domain::levels::LevelId;
use crate::domain::model::{CatalogItem, ItemStatus, PlacedItem, Track};
use crate::utils::error::{MapError, Result};

/// What is being dragged: a catalog entry, or an item already in a cell.
#[derive(Debug, Clone)]
pub struct DragPayload {
    pub item: CatalogItem,
    pub source_track_id: Option<String>,
    pub source_level_id: Option<LevelId>,
}

impl DragPayload {
    pub fn from_catalog(item: CatalogItem) -> Self {
        Self {
            item,
            source_track_id: None,
            source_level_id: None,
        }
    }

    pub fn from_cell(item: CatalogItem, track_id: impl Into<String>, level: LevelId) -> Self {
        Self {
            item,
            source_track_id: Some(track_id.into()),
            source_level_id: Some(level),
        }
    }
}

/// The cell a payload was dropped on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub track_id: String,
    pub level_id: LevelId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackGrid {
    tracks: Vec<Track>,
}

impl TrackGrid {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, track_id: &str) -> Result<&Track> {
        self.tracks
            .iter()
            .find(|t| t.id == track_id)
            .ok_or_else(|| MapError::UnknownTrack {
                track_id: track_id.to_string(),
            })
    }

    fn track_index(&self, track_id: &str) -> Result<usize> {
        self.tracks
            .iter()
            .position(|t| t.id == track_id)
            .ok_or_else(|| MapError::UnknownTrack {
                track_id: track_id.to_string(),
            })
    }

    pub fn replace_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
    }

    /// Items of one cell, in placement order.
    pub fn cell(&self, track_id: &str, level: LevelId) -> Result<Vec<&PlacedItem>> {
        Ok(self.track(track_id)?.items_at(level).collect())
    }

    /// Levels of a track that hold at least one item, in row order.
    pub fn active_levels(&self, track_id: &str) -> Result<Vec<LevelId>> {
        let track = self.track(track_id)?;
        Ok(active_levels(track))
    }

    pub fn item_count(&self) -> usize {
        self.tracks.iter().map(|t| t.items.len()).sum()
    }

    /// Applies a finished drag gesture. A gesture released outside any cell
    /// has no target and changes nothing.
    pub fn apply_drop(&mut self, payload: DragPayload, target: Option<DropTarget>) -> Result<()> {
        let Some(target) = target else {
            tracing::debug!("Drop of '{}' outside the grid ignored", payload.item.title);
            return Ok(());
        };

        match payload.source_track_id {
            Some(source) => self.move_item(
                &payload.item.title,
                &source,
                payload.source_level_id,
                &target.track_id,
                target.level_id,
            ),
            None => self.place(payload.item, &target.track_id, target.level_id),
        }
    }

    /// Adds a catalog item to a cell.
    pub fn place(&mut self, item: CatalogItem, track_id: &str, level: LevelId) -> Result<()> {
        let idx = self.track_index(track_id)?;
        tracing::debug!("Placing '{}' in {}/{}", item.title, track_id, level);
        self.tracks[idx].items.push(PlacedItem::new(item, level));
        Ok(())
    }

    /// Moves one placed item to another cell, possibly in another track.
    ///
    /// When `from_level` is given the entry in that row is preferred; otherwise
    /// the first entry with a matching title is taken.
    pub fn move_item(
        &mut self,
        title: &str,
        from_track: &str,
        from_level: Option<LevelId>,
        to_track: &str,
        to_level: LevelId,
    ) -> Result<()> {
        let src = self.track_index(from_track)?;
        let dst = self.track_index(to_track)?;
        let pos = find_entry(&self.tracks[src], title, from_level).ok_or_else(|| {
            MapError::ItemNotFound {
                track_id: from_track.to_string(),
                title: title.to_string(),
            }
        })?;

        let mut moved = self.tracks[src].items.remove(pos);
        tracing::debug!(
            "Moving '{}' from {}/{} to {}/{}",
            title,
            from_track,
            moved.target_level,
            to_track,
            to_level
        );
        moved.source_track_id = Some(from_track.to_string());
        moved.source_level_id = Some(moved.target_level);
        moved.target_level = to_level;
        self.tracks[dst].items.push(moved);
        Ok(())
    }

    /// Deletes exactly one entry with the given title, returning it.
    pub fn remove_item(
        &mut self,
        track_id: &str,
        title: &str,
        level: Option<LevelId>,
    ) -> Result<PlacedItem> {
        let idx = self.track_index(track_id)?;
        let pos = find_entry(&self.tracks[idx], title, level).ok_or_else(|| {
            MapError::ItemNotFound {
                track_id: track_id.to_string(),
                title: title.to_string(),
            }
        })?;
        Ok(self.tracks[idx].items.remove(pos))
    }

    pub fn set_status(
        &mut self,
        track_id: &str,
        title: &str,
        level: Option<LevelId>,
        status: Option<ItemStatus>,
    ) -> Result<()> {
        let idx = self.track_index(track_id)?;
        let pos = find_entry(&self.tracks[idx], title, level).ok_or_else(|| {
            MapError::ItemNotFound {
                track_id: track_id.to_string(),
                title: title.to_string(),
            }
        })?;
        self.tracks[idx].items[pos].status = status;
        Ok(())
    }

    /// Clears every cell while keeping track ids and names.
    pub fn empty_tracks(&mut self) {
        for track in &mut self.tracks {
            track.items.clear();
        }
    }

    /// Appends a new empty column and returns its id.
    pub fn add_track(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MapError::ValidationError {
                message: "Track name cannot be empty".to_string(),
            });
        }

        let mut n = self.tracks.len();
        let id = loop {
            let candidate = format!("track-{}", n);
            if self.tracks.iter().all(|t| t.id != candidate) {
                break candidate;
            }
            n += 1;
        };

        self.tracks.push(Track::new(id.clone(), name));
        Ok(id)
    }
}

pub fn active_levels(track: &Track) -> Vec<LevelId> {
    LevelId::all()
        .iter()
        .copied()
        .filter(|level| track.items.iter().any(|i| i.target_level == *level))
        .collect()
}

fn find_entry(track: &Track, title: &str, level: Option<LevelId>) -> Option<usize> {
    let matches_title = |i: &PlacedItem| i.item.title == title;
    level
        .and_then(|l| {
            track
                .items
                .iter()
                .position(|i| matches_title(i) && i.target_level == l)
        })
        .or_else(|| track.items.iter().position(matches_title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CourseLevel, ItemKind};

    fn course(title: &str) -> CatalogItem {
        CatalogItem {
            title: title.to_string(),
            url: "https://aws.amazon.com/training/".to_string(),
            duration: "1D".to_string(),
            kind: ItemKind::Course,
            level: CourseLevel::Associate,
        }
    }

    fn grid() -> TrackGrid {
        TrackGrid::new(vec![
            Track::new("track-0", "ARCHITECTING"),
            Track::new("track-1", "DATA"),
        ])
    }

    #[test]
    fn test_drop_from_catalog_places_item() {
        let mut g = grid();
        g.apply_drop(
            DragPayload::from_catalog(course("Migrating to AWS")),
            Some(DropTarget {
                track_id: "track-1".into(),
                level_id: LevelId::Level2Core,
            }),
        )
        .unwrap();

        let cell = g.cell("track-1", LevelId::Level2Core).unwrap();
        assert_eq!(cell.len(), 1);
        assert_eq!(cell[0].title(), "Migrating to AWS");
        assert!(cell[0].source_track_id.is_none());
        assert!(g.track("track-0").unwrap().items.is_empty());
    }

    #[test]
    fn test_drop_without_target_is_noop() {
        let mut g = grid();
        let before = g.clone();
        g.apply_drop(DragPayload::from_catalog(course("Deep Learning")), None)
            .unwrap();
        assert_eq!(g, before);
    }

    #[test]
    fn test_move_between_tracks_retargets_level() {
        let mut g = grid();
        g.place(course("Deep Learning"), "track-0", LevelId::Level1).unwrap();
        g.apply_drop(
            DragPayload::from_cell(course("Deep Learning"), "track-0", LevelId::Level1),
            Some(DropTarget {
                track_id: "track-1".into(),
                level_id: LevelId::Level3,
            }),
        )
        .unwrap();

        assert!(g.track("track-0").unwrap().items.is_empty());
        let moved = &g.track("track-1").unwrap().items[0];
        assert_eq!(moved.target_level, LevelId::Level3);
        assert_eq!(moved.source_track_id.as_deref(), Some("track-0"));
        assert_eq!(moved.source_level_id, Some(LevelId::Level1));
    }

    #[test]
    fn test_move_within_track_changes_row() {
        let mut g = grid();
        g.place(course("Deep Learning"), "track-0", LevelId::Level1).unwrap();
        g.move_item("Deep Learning", "track-0", None, "track-0", LevelId::Exam1)
            .unwrap();
        let track = g.track("track-0").unwrap();
        assert_eq!(track.items.len(), 1);
        assert_eq!(track.items[0].target_level, LevelId::Exam1);
    }

    #[test]
    fn test_move_to_unknown_track_leaves_state() {
        let mut g = grid();
        g.place(course("Deep Learning"), "track-0", LevelId::Level1).unwrap();
        let before = g.clone();
        let err = g
            .move_item("Deep Learning", "track-0", None, "track-7", LevelId::Exam1)
            .unwrap_err();
        assert!(matches!(err, MapError::UnknownTrack { .. }));
        assert_eq!(g, before);
    }

    #[test]
    fn test_remove_deletes_exactly_one_entry() {
        let mut g = grid();
        g.place(course("Deep Learning"), "track-0", LevelId::Level1).unwrap();
        g.place(course("Deep Learning"), "track-0", LevelId::Level3).unwrap();
        g.place(course("Migrating to AWS"), "track-0", LevelId::Level3).unwrap();

        let removed = g
            .remove_item("track-0", "Deep Learning", Some(LevelId::Level3))
            .unwrap();
        assert_eq!(removed.target_level, LevelId::Level3);

        let track = g.track("track-0").unwrap();
        assert_eq!(track.items.len(), 2);
        assert_eq!(track.items[0].target_level, LevelId::Level1);
        assert!(g.remove_item("track-1", "Deep Learning", None).is_err());
    }

    #[test]
    fn test_empty_tracks_keeps_structure() {
        let mut g = grid();
        g.place(course("Deep Learning"), "track-0", LevelId::Level1).unwrap();
        g.empty_tracks();
        let ids: Vec<_> = g.tracks().iter().map(|t| (t.id.as_str(), t.name.as_str())).collect();
        assert_eq!(ids, vec![("track-0", "ARCHITECTING"), ("track-1", "DATA")]);
        assert_eq!(g.item_count(), 0);
    }

    #[test]
    fn test_active_levels_in_row_order() {
        let mut g = grid();
        g.place(course("B"), "track-0", LevelId::Exam3).unwrap();
        g.place(course("A"), "track-0", LevelId::Level1).unwrap();
        assert_eq!(
            g.active_levels("track-0").unwrap(),
            vec![LevelId::Level1, LevelId::Exam3]
        );
    }

    #[test]
    fn test_add_track_assigns_fresh_id() {
        let mut g = grid();
        let id = g.add_track("  SECURITY ").unwrap();
        assert_eq!(id, "track-2");
        assert_eq!(g.track("track-2").unwrap().name, "SECURITY");
        assert!(g.add_track("   ").is_err());
    }

    #[test]
    fn test_set_status() {
        let mut g = grid();
        g.place(course("Deep Learning"), "track-0", LevelId::Level1).unwrap();
        g.set_status("track-0", "Deep Learning", None, Some(ItemStatus::InProgress))
            .unwrap();
        assert_eq!(
            g.track("track-0").unwrap().items[0].status,
            Some(ItemStatus::InProgress)
        );
    }
}
