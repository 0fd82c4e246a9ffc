use crate::core::catalog::initial_tracks;
use crate::core::export::{self, json::import_tracks, ExportArtifact, ExportFormat, ExportScope};
use crate::core::grid::TrackGrid;
use crate::core::profiles::ProfileManager;
use crate::core::Storage;
use crate::domain::model::{Profile, Track};
use crate::utils::error::{MapError, Result};
use chrono::NaiveDate;

/// Storage key of the working grid.
pub const WORKSPACE_KEY: &str = "workspace.json";

/// The working grid plus saved profiles.
///
/// Grid changes go through [`PlannerSession::mutate`], which persists the
/// grid and mirrors it into the active profile.
pub struct PlannerSession<S: Storage> {
    grid: TrackGrid,
    profiles: ProfileManager<S>,
}

impl<S: Storage> PlannerSession<S> {
    pub async fn open(storage: S) -> Result<Self> {
        let grid = if storage.exists(WORKSPACE_KEY).await? {
            let data = storage.read_file(WORKSPACE_KEY).await?;
            let tracks: Vec<Track> =
                serde_json::from_slice(&data).map_err(|e| MapError::ImportError {
                    message: format!("{} is not a valid track list: {}", WORKSPACE_KEY, e),
                })?;
            TrackGrid::new(tracks)
        } else {
            tracing::debug!("No saved workspace, starting from the initial tracks");
            TrackGrid::new(initial_tracks()?)
        };

        let profiles = ProfileManager::load(storage).await?;
        Ok(Self { grid, profiles })
    }

    pub fn grid(&self) -> &TrackGrid {
        &self.grid
    }

    pub fn profiles(&self) -> &ProfileManager<S> {
        &self.profiles
    }

    /// Applies `change` to the grid and saves the result. A failed change
    /// is discarded.
    pub async fn mutate<T, F>(&mut self, change: F) -> Result<T>
    where
        F: FnOnce(&mut TrackGrid) -> Result<T>,
    {
        let mut next = self.grid.clone();
        let value = change(&mut next)?;
        self.grid = next;
        self.save_workspace().await?;
        if self.profiles.update_current(self.grid.tracks()).await? {
            tracing::debug!("Active profile updated");
        }
        Ok(value)
    }

    async fn save_workspace(&self) -> Result<()> {
        let data = serde_json::to_vec_pretty(self.grid.tracks())?;
        self.profiles.storage().write_file(WORKSPACE_KEY, &data).await
    }

    pub async fn load_initial_tracks(&mut self) -> Result<()> {
        let tracks = initial_tracks()?;
        self.mutate(|grid| {
            grid.replace_tracks(tracks);
            Ok(())
        })
        .await
    }

    pub async fn empty_tracks(&mut self) -> Result<()> {
        self.mutate(|grid| {
            grid.empty_tracks();
            Ok(())
        })
        .await
    }

    /// Replaces the grid with tracks from a JSON export. Malformed input
    /// leaves the grid untouched.
    pub async fn import_json(&mut self, data: &[u8]) -> Result<usize> {
        let tracks = import_tracks(data)?;
        let count = tracks.len();
        self.mutate(|grid| {
            grid.replace_tracks(tracks);
            Ok(count)
        })
        .await
    }

    pub async fn create_profile(&mut self, name: &str) -> Result<Profile> {
        let profile = self.profiles.create(name).await?;
        self.grid.replace_tracks(profile.tracks.clone());
        self.save_workspace().await?;
        Ok(profile)
    }

    pub async fn select_profile(&mut self, profile_id: &str) -> Result<()> {
        let tracks = self.profiles.select(profile_id).await?;
        self.grid.replace_tracks(tracks);
        self.save_workspace().await
    }

    pub async fn delete_profile(&mut self, profile_id: &str) -> Result<Profile> {
        self.profiles.delete(profile_id).await
    }

    /// Saves the current grid into the active profile.
    pub async fn save_profile(&mut self) -> Result<bool> {
        self.profiles.update_current(self.grid.tracks()).await
    }

    pub fn export(
        &self,
        format: ExportFormat,
        selected_track_id: Option<&str>,
        map_title: &str,
        date: NaiveDate,
    ) -> Result<ExportArtifact> {
        let scope = ExportScope::new(self.grid.tracks(), selected_track_id, map_title)?;
        export::export(format, &scope, date)
    }
}
