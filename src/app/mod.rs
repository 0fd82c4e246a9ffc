//! Command handlers behind the `learning-map` binary.

use crate::config::{CatalogCommand, Command, ProfileCommand, Settings, TracksCommand};
use crate::core::catalog::{Catalog, CatalogQuery};
use crate::core::export::ExportFormat;
use crate::core::grid::DragPayload;
use crate::core::grid::DropTarget;
use crate::core::session::PlannerSession;
use crate::core::{ConfigProvider, Storage};
use crate::domain::levels::LevelId;
use crate::domain::model::Track;
use crate::utils::error::Result;
use crate::utils::validation::validate_file_extension;
use std::path::Path;

pub async fn run<S: Storage>(command: Command, session: &mut PlannerSession<S>, settings: &Settings) -> Result<()> {
    match command {
        Command::Catalog(cmd) => catalog(cmd),
        Command::Levels => {
            for level in LevelId::all() {
                let separator = if level.ends_band() { "  ──" } else { "" };
                println!("{:<20} {}{}", level.as_str(), level.name(), separator);
            }
            Ok(())
        }
        Command::Tracks(cmd) => tracks(cmd, session).await,
        Command::Place { title, track, level } => {
            let item = Catalog::builtin()?.find(&title)?.clone();
            let target = DropTarget {
                track_id: track.clone(),
                level_id: level,
            };
            session
                .mutate(|grid| grid.apply_drop(DragPayload::from_catalog(item), Some(target)))
                .await?;
            println!("✅ Placed '{}' in {} / {}", title, track, level.name());
            Ok(())
        }
        Command::Move {
            title,
            from,
            from_level,
            to,
            level,
        } => {
            session
                .mutate(|grid| grid.move_item(&title, &from, from_level, &to, level))
                .await?;
            println!("✅ Moved '{}' to {} / {}", title, to, level.name());
            Ok(())
        }
        Command::Remove { track, title, level } => {
            let removed = session
                .mutate(|grid| grid.remove_item(&track, &title, level))
                .await?;
            println!(
                "🗑  Removed '{}' from {} / {}",
                removed.title(),
                track,
                removed.target_level.name()
            );
            Ok(())
        }
        Command::Status {
            track,
            title,
            level,
            status,
        } => {
            session
                .mutate(|grid| grid.set_status(&track, &title, level, status))
                .await?;
            match status {
                Some(status) => println!("✅ '{}' is now {}", title, status),
                None => println!("✅ Cleared status of '{}'", title),
            }
            Ok(())
        }
        Command::Profile(cmd) => profile(cmd, session).await,
        Command::Export {
            format,
            track,
            output_dir,
        } => {
            let output_dir = output_dir.unwrap_or_else(|| settings.output_dir().to_string());
            export(session, settings, format, track.as_deref(), &output_dir).await
        }
        Command::Import { file } => {
            validate_file_extension("import", &file, &["json"])?;
            let data = tokio::fs::read(&file).await?;
            match session.import_json(&data).await {
                Ok(count) => {
                    println!("✅ Imported {} tracks from {}", count, file);
                    Ok(())
                }
                Err(e) => {
                    // A bad file is reported and the grid is kept as it was.
                    tracing::error!("Error importing {}: {}", file, e);
                    eprintln!("❌ {}", e.user_friendly_message());
                    Ok(())
                }
            }
        }
    }
}

fn catalog(cmd: CatalogCommand) -> Result<()> {
    let catalog = Catalog::builtin()?;
    match cmd {
        CatalogCommand::List {
            kind,
            level,
            search,
        } => {
            let query = CatalogQuery {
                kind,
                level,
                section: None,
                text: search,
            };
            let mut current = None;
            for (section, item) in catalog.filter(&query) {
                if current != Some(section) {
                    println!("\n{}", section.heading());
                    current = Some(section);
                }
                println!("  {:<12} {:<13} {}", item.duration, item.level, item.title);
            }
        }
        CatalogCommand::Show { title } => {
            let item = catalog.find(&title)?;
            println!("{}", item.title);
            println!("  Duration: {}", item.duration);
            println!("  Type:     {}", item.kind);
            println!("  Level:    {}", item.level);
            println!("  Default:  {}", LevelId::default_for(item).name());
            println!("  URL:      {}", item.url);
        }
    }
    Ok(())
}

async fn tracks<S: Storage>(cmd: TracksCommand, session: &mut PlannerSession<S>) -> Result<()> {
    match cmd {
        TracksCommand::List => {
            let grid = session.grid();
            for track in grid.tracks() {
                println!("{:<10} {:<40} {} items", track.id, track.name, track.items.len());
            }
            println!("{} tracks loaded", grid.tracks().len());
        }
        TracksCommand::Show { track } => match track {
            Some(id) => print_track(session.grid().track(&id)?),
            None => session.grid().tracks().iter().for_each(print_track),
        },
        TracksCommand::Add { name } => {
            let id = session.mutate(|grid| grid.add_track(&name)).await?;
            println!("✅ Added track {} ({})", name.trim(), id);
        }
        TracksCommand::LoadInitial => {
            session.load_initial_tracks().await?;
            println!("✅ Loaded {} initial tracks", session.grid().tracks().len());
        }
        TracksCommand::Empty => {
            session.empty_tracks().await?;
            println!("✅ Emptied {} tracks", session.grid().tracks().len());
        }
    }
    Ok(())
}

fn print_track(track: &Track) {
    println!("\n{} ({})", track.name, track.id);
    for level in LevelId::all() {
        let items: Vec<_> = track.items_at(*level).collect();
        if items.is_empty() {
            continue;
        }
        println!("  {}", level.name());
        for item in items {
            let status = item.status.map(|s| format!(" [{}]", s)).unwrap_or_default();
            println!("    - {} ({}){}", item.title(), item.item.duration, status);
        }
    }
}

async fn profile<S: Storage>(cmd: ProfileCommand, session: &mut PlannerSession<S>) -> Result<()> {
    match cmd {
        ProfileCommand::List => {
            let active = session.profiles().active().map(|p| p.id.clone());
            for p in session.profiles().profiles() {
                let marker = if Some(&p.id) == active.as_ref() { "*" } else { " " };
                println!(
                    "{} {:<22} {:<30} updated {}",
                    marker,
                    p.id,
                    p.name,
                    p.updated_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        ProfileCommand::Create { name } => {
            let profile = session.create_profile(&name).await?;
            println!("✅ Created profile {} ({})", profile.name, profile.id);
        }
        ProfileCommand::Select { id } => {
            session.select_profile(&id).await?;
            println!("✅ Selected profile {}", id);
        }
        ProfileCommand::Delete { id } => {
            let removed = session.delete_profile(&id).await?;
            println!("🗑  Deleted profile {} ({})", removed.name, removed.id);
        }
        ProfileCommand::Save => {
            if session.save_profile().await? {
                println!("✅ Saved grid to the active profile");
            } else {
                println!("No active profile; create or select one first");
            }
        }
    }
    Ok(())
}

async fn export<S: Storage>(
    session: &PlannerSession<S>,
    settings: &Settings,
    format: ExportFormat,
    track: Option<&str>,
    output_dir: &str,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let artifact = session.export(format, track, settings.map_title(), today)?;

    tokio::fs::create_dir_all(output_dir).await?;
    let path = Path::new(output_dir).join(&artifact.file_name);
    tokio::fs::write(&path, &artifact.bytes).await?;

    tracing::info!("Exported {} to {}", artifact.format, path.display());
    println!("📁 Output saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::LocalStorage;
    use crate::config::toml_config::TomlConfig;
    use crate::core::session::WORKSPACE_KEY;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_bad_import_file_is_reported_and_grid_kept() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");
        let settings = Settings::resolve(
            TomlConfig::default(),
            Some(data_dir.to_string_lossy().into_owned()),
            None,
        );
        let mut session = PlannerSession::open(LocalStorage::new(&data_dir)).await.unwrap();
        session.empty_tracks().await.unwrap();
        let before = session.grid().tracks().to_vec();
        let saved = std::fs::read(data_dir.join(WORKSPACE_KEY)).unwrap();

        let file = dir.path().join("broken.json");
        std::fs::write(&file, b"[{\"id\": \"track-0\", \"name\": ").unwrap();
        let command = Command::Import {
            file: file.to_string_lossy().into_owned(),
        };

        run(command, &mut session, &settings).await.unwrap();
        assert_eq!(session.grid().tracks(), before.as_slice());
        assert_eq!(std::fs::read(data_dir.join(WORKSPACE_KEY)).unwrap(), saved);
    }

    #[tokio::test]
    async fn test_import_requires_json_extension() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::resolve(TomlConfig::default(), None, None);
        let mut session = PlannerSession::open(LocalStorage::new(dir.path())).await.unwrap();

        let command = Command::Import {
            file: dir.path().join("tracks.csv").to_string_lossy().into_owned(),
        };
        assert!(run(command, &mut session, &settings).await.is_err());
    }
}
