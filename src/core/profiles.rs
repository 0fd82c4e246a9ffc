use crate::core::Storage;
use crate::domain::model::{Profile, ProfileState, Track};
use crate::utils::error::{MapError, Result};
use crate::utils::validation::validate_non_empty_string;
use chrono::Utc;

/// Storage key of the saved profile document.
pub const PROFILES_KEY: &str = "awsLearningMapProfiles.json";

/// Saved profiles plus the active selection. Every change is written back
/// to storage before the call returns.
pub struct ProfileManager<S: Storage> {
    storage: S,
    state: ProfileState,
}

impl<S: Storage> ProfileManager<S> {
    /// Reads the profile document, starting empty when none was saved yet.
    pub async fn load(storage: S) -> Result<Self> {
        let state = if storage.exists(PROFILES_KEY).await? {
            let data = storage.read_file(PROFILES_KEY).await?;
            serde_json::from_slice(&data).map_err(|e| MapError::ImportError {
                message: format!("{} is not a valid profile document: {}", PROFILES_KEY, e),
            })?
        } else {
            tracing::debug!("No saved profiles, starting empty");
            ProfileState::default()
        };

        Ok(Self { storage, state })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.state.profiles
    }

    pub fn active(&self) -> Option<&Profile> {
        let id = self.state.active_profile_id.as_deref()?;
        self.state.profiles.iter().find(|p| p.id == id)
    }

    pub fn get(&self, profile_id: &str) -> Result<&Profile> {
        self.state
            .profiles
            .iter()
            .find(|p| p.id == profile_id)
            .ok_or_else(|| MapError::UnknownProfile {
                profile_id: profile_id.to_string(),
            })
    }

    /// Creates a profile with no tracks and makes it active.
    pub async fn create(&mut self, name: &str) -> Result<Profile> {
        validate_non_empty_string("profile.name", name)?;

        let now = Utc::now();
        let mut stamp = now.timestamp_millis();
        while self.state.profiles.iter().any(|p| p.id == format!("profile-{}", stamp)) {
            stamp += 1;
        }

        let profile = Profile::new(format!("profile-{}", stamp), name.trim().to_string(), now);
        self.state.profiles.push(profile.clone());
        self.state.active_profile_id = Some(profile.id.clone());
        self.save().await?;

        tracing::info!("Created profile '{}' ({})", profile.name, profile.id);
        Ok(profile)
    }

    /// Makes a profile active and returns its tracks.
    pub async fn select(&mut self, profile_id: &str) -> Result<Vec<Track>> {
        let tracks = self.get(profile_id)?.tracks.clone();
        self.state.active_profile_id = Some(profile_id.to_string());
        self.save().await?;
        tracing::info!("Selected profile {}", profile_id);
        Ok(tracks)
    }

    /// Stores `tracks` on the active profile. Returns `false` when no profile
    /// is active.
    pub async fn update_current(&mut self, tracks: &[Track]) -> Result<bool> {
        let Some(active_id) = self.state.active_profile_id.clone() else {
            return Ok(false);
        };

        let Some(profile) = self.state.profiles.iter_mut().find(|p| p.id == active_id) else {
            tracing::warn!("Active profile {} no longer exists", active_id);
            return Ok(false);
        };

        profile.set_tracks(tracks.to_vec(), Utc::now());
        self.save().await?;
        tracing::debug!("Saved {} tracks to profile {}", tracks.len(), active_id);
        Ok(true)
    }

    pub async fn delete(&mut self, profile_id: &str) -> Result<Profile> {
        let pos = self
            .state
            .profiles
            .iter()
            .position(|p| p.id == profile_id)
            .ok_or_else(|| MapError::UnknownProfile {
                profile_id: profile_id.to_string(),
            })?;

        let removed = self.state.profiles.remove(pos);
        if self.state.active_profile_id.as_deref() == Some(profile_id) {
            self.state.active_profile_id = None;
        }
        self.save().await?;

        tracing::info!("Deleted profile '{}' ({})", removed.name, removed.id);
        Ok(removed)
    }

    async fn save(&self) -> Result<()> {
        let data = serde_json::to_vec_pretty(&self.state)?;
        self.storage.write_file(PROFILES_KEY, &data).await
    }
}
