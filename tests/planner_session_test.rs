use anyhow::Result;
use learning_map::core::export::ExportFormat;
use learning_map::core::grid::{DragPayload, DropTarget};
use learning_map::core::profiles::PROFILES_KEY;
use learning_map::core::session::WORKSPACE_KEY;
use learning_map::domain::levels::LevelId;
use learning_map::domain::model::ProfileState;
use learning_map::{Catalog, LocalStorage, MapError, PlannerSession};
use chrono::NaiveDate;
use tempfile::TempDir;

async fn open(dir: &TempDir) -> Result<PlannerSession<LocalStorage>> {
    Ok(PlannerSession::open(LocalStorage::new(dir.path())).await?)
}

fn drop_into(title: &str, track: &str, level: LevelId) -> Result<(DragPayload, Option<DropTarget>)> {
    let item = Catalog::builtin()?.find(title)?.clone();
    Ok((
        DragPayload::from_catalog(item),
        Some(DropTarget {
            track_id: track.to_string(),
            level_id: level,
        }),
    ))
}

#[tokio::test]
async fn test_fresh_session_starts_from_initial_tracks() -> Result<()> {
    let dir = TempDir::new()?;
    let session = open(&dir).await?;

    let tracks = session.grid().tracks();
    assert_eq!(tracks.len(), 6);
    assert_eq!(tracks[0].id, "track-0");
    assert_eq!(tracks[0].name, "NON-TECHNICAL");
    assert!(session.profiles().profiles().is_empty());
    assert!(session.profiles().active().is_none());
    Ok(())
}

#[tokio::test]
async fn test_drop_places_item_at_target_level() -> Result<()> {
    let dir = TempDir::new()?;
    let mut session = open(&dir).await?;
    session.empty_tracks().await?;

    let (payload, target) = drop_into("AWS Technical Essentials", "track-2", LevelId::Level1)?;
    session.mutate(|grid| grid.apply_drop(payload, target)).await?;

    let cell = session.grid().cell("track-2", LevelId::Level1)?;
    assert_eq!(cell.len(), 1);
    assert_eq!(cell[0].title(), "AWS Technical Essentials");
    assert_eq!(cell[0].target_level, LevelId::Level1);
    assert_eq!(session.grid().item_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_move_between_tracks_changes_target_level() -> Result<()> {
    let dir = TempDir::new()?;
    let mut session = open(&dir).await?;
    session.empty_tracks().await?;

    let (payload, target) = drop_into("AWS Technical Essentials", "track-1", LevelId::Level1)?;
    session.mutate(|grid| grid.apply_drop(payload, target)).await?;
    session
        .mutate(|grid| {
            grid.move_item(
                "AWS Technical Essentials",
                "track-1",
                None,
                "track-4",
                LevelId::Level2Core,
            )
        })
        .await?;

    assert!(session.grid().track("track-1")?.items.is_empty());
    let moved = &session.grid().track("track-4")?.items[0];
    assert_eq!(moved.target_level, LevelId::Level2Core);
    assert_eq!(moved.source_track_id.as_deref(), Some("track-1"));
    assert_eq!(moved.source_level_id, Some(LevelId::Level1));
    Ok(())
}

#[tokio::test]
async fn test_remove_deletes_exactly_one_duplicate() -> Result<()> {
    let dir = TempDir::new()?;
    let mut session = open(&dir).await?;
    session.empty_tracks().await?;

    for level in [LevelId::Level1, LevelId::Level2Core] {
        let (payload, target) = drop_into("AWS Technical Essentials", "track-3", level)?;
        session.mutate(|grid| grid.apply_drop(payload, target)).await?;
    }
    session
        .mutate(|grid| grid.remove_item("track-3", "AWS Technical Essentials", Some(LevelId::Level2Core)))
        .await?;

    let items = &session.grid().track("track-3")?.items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].target_level, LevelId::Level1);
    Ok(())
}

#[tokio::test]
async fn test_failed_change_leaves_grid_and_disk_untouched() -> Result<()> {
    let dir = TempDir::new()?;
    let mut session = open(&dir).await?;
    let before = session.grid().tracks().to_vec();

    let err = session
        .mutate(|grid| grid.move_item("Deep Learning", "track-4", None, "track-99", LevelId::Level1))
        .await
        .unwrap_err();
    assert!(matches!(err, MapError::UnknownTrack { .. }));
    assert_eq!(session.grid().tracks(), before.as_slice());
    assert!(!dir.path().join(WORKSPACE_KEY).exists());
    Ok(())
}

#[tokio::test]
async fn test_profile_save_and_reload_round_trip() -> Result<()> {
    let dir = TempDir::new()?;
    let mut session = open(&dir).await?;

    let profile = session.create_profile("Alice").await?;
    assert!(session.grid().tracks().is_empty());
    let created_at = profile.created_at;

    session.load_initial_tracks().await?;
    let (payload, target) = drop_into("Amazon SageMaker Studio for Data Scientists", "track-4", LevelId::Level3)?;
    session.mutate(|grid| grid.apply_drop(payload, target)).await?;
    let expected = session.grid().tracks().to_vec();

    let saved = session.profiles().active().expect("active profile").clone();
    assert_eq!(saved.tracks, expected);
    assert!(saved.updated_at > created_at);

    // A new process sees the same profile and grid.
    let reopened = open(&dir).await?;
    let active = reopened.profiles().active().expect("active profile");
    assert_eq!(active.id, profile.id);
    assert_eq!(active.tracks, expected);
    assert_eq!(reopened.grid().tracks(), expected.as_slice());

    assert!(dir.path().join("awsLearningMapProfiles.json").exists());
    let raw = std::fs::read(dir.path().join(PROFILES_KEY))?;
    let state: ProfileState = serde_json::from_slice(&raw)?;
    assert_eq!(state.active_profile_id.as_deref(), Some(profile.id.as_str()));
    Ok(())
}

#[tokio::test]
async fn test_switching_profiles_restores_their_tracks() -> Result<()> {
    let dir = TempDir::new()?;
    let mut session = open(&dir).await?;

    let first = session.create_profile("First").await?;
    session.load_initial_tracks().await?;
    let second = session.create_profile("Second").await?;
    assert!(session.grid().tracks().is_empty());

    session.select_profile(&first.id).await?;
    assert_eq!(session.grid().tracks().len(), 6);
    session.select_profile(&second.id).await?;
    assert!(session.grid().tracks().is_empty());

    let removed = session.delete_profile(&second.id).await?;
    assert_eq!(removed.name, "Second");
    assert!(session.profiles().active().is_none());
    assert!(matches!(
        session.select_profile(&second.id).await,
        Err(MapError::UnknownProfile { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_json_export_then_import_restores_tracks() -> Result<()> {
    let dir = TempDir::new()?;
    let mut session = open(&dir).await?;
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

    let artifact = session.export(ExportFormat::Json, None, "AWS Learning Map", date)?;
    assert_eq!(artifact.file_name, "aws-learning-map-2024-05-01.json");
    let exported = session.grid().tracks().to_vec();

    session.empty_tracks().await?;
    let count = session.import_json(&artifact.bytes).await?;
    assert_eq!(count, exported.len());
    assert_eq!(session.grid().tracks(), exported.as_slice());
    Ok(())
}

#[tokio::test]
async fn test_malformed_import_keeps_current_grid() -> Result<()> {
    let dir = TempDir::new()?;
    let mut session = open(&dir).await?;
    let before = session.grid().tracks().to_vec();

    let err = session.import_json(b"{ not json").await.unwrap_err();
    assert!(matches!(err, MapError::ImportError { .. }));
    assert_eq!(session.grid().tracks(), before.as_slice());
    Ok(())
}

#[tokio::test]
async fn test_corrupt_workspace_is_reported() -> Result<()> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join(WORKSPACE_KEY), b"[{\"id\": 1}]")?;

    let result = PlannerSession::open(LocalStorage::new(dir.path())).await;
    assert!(matches!(result, Err(MapError::ImportError { .. })));
    Ok(())
}

#[tokio::test]
async fn test_import_with_script_link_keeps_grid_and_html_clean() -> Result<()> {
    let dir = TempDir::new()?;
    let mut session = open(&dir).await?;
    let before = session.grid().tracks().to_vec();

    let data = br#"[{"id":"track-0","name":"A","items":[
        {"title":"Sneaky","url":"javascript:alert(document.cookie)","duration":"1D",
         "type":"course","level":"fundamental","targetLevel":"level-1"}]}]"#;
    assert!(matches!(
        session.import_json(data).await,
        Err(MapError::ImportError { .. })
    ));
    assert_eq!(session.grid().tracks(), before.as_slice());

    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let html = session.export(ExportFormat::Html, None, "AWS Learning Map", date)?;
    assert!(!String::from_utf8(html.bytes)?.contains("javascript:"));
    Ok(())
}
