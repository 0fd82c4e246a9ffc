use super::{ExportScope, Exporter};
use crate::domain::model::Track;
use crate::utils::error::{MapError, Result};
use crate::utils::validation::validate_url;

/// Writes the full track list, whatever track is selected.
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn render(&self, scope: &ExportScope<'_>) -> Result<Vec<u8>> {
        let data = serde_json::to_vec_pretty(scope.all_tracks())?;
        Ok(data)
    }
}

/// Parses a track list previously written by [`JsonExporter`].
pub fn import_tracks(data: &[u8]) -> Result<Vec<Track>> {
    let tracks: Vec<Track> = serde_json::from_slice(data).map_err(|e| MapError::ImportError {
        message: format!("not a track list: {}", e),
    })?;

    let mut seen = std::collections::HashSet::new();
    for track in &tracks {
        if !seen.insert(track.id.as_str()) {
            return Err(MapError::ImportError {
                message: format!("duplicate track id {}", track.id),
            });
        }
        // Links end up in HTML hrefs and slide hyperlinks.
        for item in &track.items {
            validate_url("import.url", &item.item.url).map_err(|e| MapError::ImportError {
                message: format!("'{}' in track {}: {}", item.title(), track.id, e),
            })?;
        }
    }

    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::DEFAULT_MAP_TITLE;

    #[test]
    fn test_selected_track_still_exports_everything() {
        let tracks = vec![Track::new("track-0", "A"), Track::new("track-1", "B")];
        let scope = ExportScope::new(&tracks, Some("track-1"), DEFAULT_MAP_TITLE).unwrap();
        let data = JsonExporter.render(&scope).unwrap();
        assert_eq!(import_tracks(&data).unwrap(), tracks);
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(import_tracks(b"[{\"id\": 3}]").is_err());
        assert!(import_tracks(b"not json").is_err());
        let dup = br#"[{"id":"track-0","name":"A","items":[]},{"id":"track-0","name":"B","items":[]}]"#;
        assert!(import_tracks(dup).is_err());
    }

    #[test]
    fn test_import_accepts_original_export_format() {
        let data = br#"[{"id":"track-3","name":"DEV / DEVOPS","items":[
            {"title":"AWS Certified Cloud Practitioner",
             "url":"https://aws.amazon.com/certification/certified-cloud-practitioner/",
             "duration":"Exam","type":"certification","level":"fundamental",
             "targetLevel":"exam-1","sourceTrackId":"track-0"}]}]"#;
        let tracks = import_tracks(data).unwrap();
        assert_eq!(tracks[0].items.len(), 1);
        assert_eq!(tracks[0].items[0].source_track_id.as_deref(), Some("track-0"));
    }

    #[test]
    fn test_import_rejects_script_urls() {
        let data = br#"[{"id":"track-0","name":"A","items":[
            {"title":"Sneaky","url":"javascript:alert(document.cookie)",
             "duration":"1D","type":"course","level":"fundamental",
             "targetLevel":"level-1"}]}]"#;
        let err = import_tracks(data).unwrap_err();
        assert!(matches!(err, MapError::ImportError { .. }));
        assert!(err.to_string().contains("Sneaky"));
    }
}
