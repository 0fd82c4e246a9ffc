use super::{ExportScope, Exporter};
use crate::core::grid::active_levels;
use crate::domain::levels::LevelId;
use crate::domain::model::{PlacedItem, Track};
use crate::utils::error::Result;

const BORDER: &str = "1px solid #e9ebed";

const STYLE: &str = r#"
    body {
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
      padding: 20px;
      max-width: 1800px;
      margin: 0 auto;
      color: #000716;
      background-color: #ffffff;
    }
    table {
      box-shadow: 0 1px 4px 0 rgba(0, 28, 36, 0.15);
      border-radius: 8px;
      overflow: hidden;
    }
    .title {
      color: #000716;
      margin-bottom: 24px;
      font-size: 24px;
      font-weight: bold;
      line-height: 1.25;
    }
    th { font-weight: bold; }
    a { color: #0972d3; text-decoration: none; }
    a:hover { text-decoration: underline; }
"#;

/// Standalone HTML page with inline styles.
pub struct HtmlExporter;

impl Exporter for HtmlExporter {
    fn render(&self, scope: &ExportScope<'_>) -> Result<Vec<u8>> {
        let title = escape(&scope.title());
        let table = match scope.selected() {
            Some(track) => track_table(track),
            None => grid_table(scope.tracks()),
        };

        let page = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"UTF-8\">\n  <title>{title}</title>\n  <style>{STYLE}  </style>\n</head>\n<body>\n  <h1 class=\"title\">{title}</h1>\n{table}</body>\n</html>\n"
        );
        Ok(page.into_bytes())
    }
}

/// Full grid: one column per track, one row per level.
fn grid_table(tracks: &[Track]) -> String {
    let mut out = String::from("  <table style=\"width: 100%; border-collapse: collapse;\">\n    <thead>\n      <tr>\n");
    out.push_str(&format!(
        "        <th style=\"padding: 16px; background: #0f1b2a; border: {BORDER}; color: white; text-align: left; width: 150px;\">Levels</th>\n"
    ));
    for track in tracks {
        out.push_str(&format!(
            "        <th style=\"padding: 16px; background: #0f1b2a; border: {BORDER}; color: white; text-align: center;\">{}</th>\n",
            escape(&track.name)
        ));
    }
    out.push_str("      </tr>\n    </thead>\n    <tbody>\n");

    for level in LevelId::all() {
        out.push_str("      <tr>\n");
        out.push_str(&level_header("td", *level, ""));
        for track in tracks {
            out.push_str(&cell("td", track, *level, ""));
        }
        out.push_str("      </tr>\n");

        if level.ends_band() {
            out.push_str(&format!(
                "      <tr><td colspan=\"{}\" style=\"height: 32px; background: #f4f4f4; border: {BORDER};\"></td></tr>\n",
                tracks.len() + 1
            ));
        }
    }

    out.push_str("    </tbody>\n  </table>\n");
    out
}

/// Single track laid out sideways, showing only levels that hold items.
fn track_table(track: &Track) -> String {
    let levels = active_levels(track);
    let mut out = String::from("  <table style=\"width: 100%; border-collapse: collapse;\">\n    <thead>\n      <tr>\n");
    for level in &levels {
        out.push_str(&level_header("th", *level, " text-align: center; width: 250px;"));
    }
    out.push_str("      </tr>\n    </thead>\n    <tbody>\n      <tr>\n");
    for level in &levels {
        out.push_str(&cell("td", track, *level, " width: 250px;"));
    }
    out.push_str("      </tr>\n    </tbody>\n  </table>\n");
    out
}

fn level_header(tag: &str, level: LevelId, extra_style: &str) -> String {
    format!(
        "        <{tag} style=\"padding: 16px; border: {BORDER}; background-color: {};{extra_style}\"><div style=\"color: white; font-weight: 600;\">{}</div></{tag}>\n",
        level.header_color(),
        escape(level.name())
    )
}

fn cell(tag: &str, track: &Track, level: LevelId, extra_style: &str) -> String {
    let items: String = track.items_at(level).map(item_card).collect();
    format!(
        "        <{tag} style=\"border: {BORDER}; padding: 16px; vertical-align: top; background-color: {};{extra_style}\">{items}</{tag}>\n",
        level.band().background()
    )
}

fn item_card(item: &PlacedItem) -> String {
    let status = item
        .status
        .map(|s| {
            format!(
                "<span style=\"background: #f2f3f3; padding: 4px 8px; border-radius: 4px; font-size: 12px;\">{}</span>",
                s
            )
        })
        .unwrap_or_default();

    format!(
        "<div style=\"background: white; padding: 12px; margin-bottom: 12px; border-radius: 8px; border: {BORDER};\">\
<a href=\"{}\" target=\"_blank\" style=\"display: block; margin-bottom: 8px;\">{}</a>\
<div style=\"display: flex; gap: 8px; flex-wrap: wrap;\">\
<span style=\"background: #e9ebed; padding: 4px 8px; border-radius: 4px; font-size: 12px;\">{}</span>\
<span style=\"background: {}; padding: 4px 8px; border-radius: 4px; font-size: 12px;\">{}</span>{}\
</div></div>",
        escape(&item.item.url),
        escape(&item.item.title),
        escape(&item.item.duration),
        item.item.level.badge_color(),
        item.item.level.label(),
        status
    )
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::DEFAULT_MAP_TITLE;
    use crate::domain::model::{CatalogItem, CourseLevel, ItemKind};

    fn placed(title: &str, level: LevelId) -> PlacedItem {
        PlacedItem::new(
            CatalogItem {
                title: title.to_string(),
                url: "https://aws.amazon.com/training/".to_string(),
                duration: "3D".to_string(),
                kind: ItemKind::Course,
                level: CourseLevel::Professional,
            },
            level,
        )
    }

    fn render(tracks: &[Track], selected: Option<&str>) -> String {
        let scope = ExportScope::new(tracks, selected, DEFAULT_MAP_TITLE).unwrap();
        String::from_utf8(HtmlExporter.render(&scope).unwrap()).unwrap()
    }

    #[test]
    fn test_full_grid_has_every_level_and_separators() {
        let mut track = Track::new("track-0", "DATA ANALYTICS");
        track.items.push(placed("Data Warehousing on AWS", LevelId::Level3));
        let html = render(&[track], None);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>AWS Learning Map</title>"));
        for level in LevelId::all() {
            assert!(html.contains(&escape(level.name())));
        }
        assert_eq!(html.matches("colspan=\"2\"").count(), 2);
        assert!(html.contains("Data Warehousing on AWS"));
        assert!(html.contains("Professional"));
    }

    #[test]
    fn test_single_track_shows_only_active_levels() {
        let mut track = Track::new("track-0", "ML");
        track.items.push(placed("Deep Learning", LevelId::Level3));
        let other = Track::new("track-1", "OTHER");
        let html = render(&[track, other], Some("track-0"));

        assert!(html.contains("ML Learning Track"));
        assert!(html.contains(LevelId::Level3.name()));
        assert!(!html.contains(LevelId::Level1.name()));
        assert!(!html.contains("OTHER"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut track = Track::new("track-0", "R&D <lab>");
        track.items.push(placed("<script>alert(1)</script>", LevelId::Level1));
        let html = render(&[track], None);
        assert!(html.contains("R&amp;D &lt;lab&gt;"));
        assert!(!html.contains("<script>"));
    }
}
