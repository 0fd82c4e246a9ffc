//! Slide deck export as an Office Open XML presentation (`.pptx`).
//!
//! The package carries the minimum parts a presentation needs: one master,
//! one blank layout, one theme, and a slide part per slide. Geometry is
//! computed in inches on a 10 x 5.625 canvas and converted to EMUs.

use super::html::escape;
use super::{ExportScope, Exporter};
use crate::core::grid::active_levels;
use crate::domain::levels::LevelId;
use crate::domain::model::Track;
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

const EMU_PER_INCH: f64 = 914_400.0;
const SLIDE_WIDTH: f64 = 10.0;
const SLIDE_HEIGHT: f64 = 5.625;
const FONT: &str = "Calibri";
const LEVEL_ROWS_PER_SLIDE: usize = 5;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub struct SlideExporter;

impl Exporter for SlideExporter {
    fn render(&self, scope: &ExportScope<'_>) -> Result<Vec<u8>> {
        let title = scope.title();
        let mut deck = Deck::new(&title);

        let mut cover = Slide::default();
        cover.text_box(
            Frame::new(0.5, 1.0, 9.0, 0.8),
            BoxStyle::plain().centered(),
            vec![Run::new(&title, 20).bold().color("000716")],
        );
        deck.push(cover);

        match scope.selected() {
            Some(track) => deck.push(track_slide(track)),
            None => {
                for slide in grid_slides(scope.tracks()) {
                    deck.push(slide);
                }
            }
        }

        deck.write()
    }
}

fn track_slide(track: &Track) -> Slide {
    let mut slide = Slide::default();
    let levels = active_levels(track);

    if levels.is_empty() {
        slide.text_box(
            Frame::new(0.5, 2.0, 9.0, 1.0),
            BoxStyle::plain().centered(),
            vec![Run::new("No courses placed in this track yet", 14).color("5F6B7A")],
        );
        return slide;
    }

    slide.text_box(
        Frame::new(0.5, 0.3, 9.0, 0.4),
        BoxStyle::plain().centered(),
        vec![Run::new(&track.name, 14).bold().color("000716")],
    );

    let start_y = 0.8;
    let level_width = f64::min(2.2, 9.0 / levels.len() as f64);
    let start_x = (SLIDE_WIDTH - level_width * levels.len() as f64) / 2.0;
    let item_height = 0.5;

    for (index, level) in levels.iter().enumerate() {
        let x = start_x + index as f64 * level_width;
        slide.text_box(
            Frame::new(x, start_y, level_width - 0.1, 0.4),
            BoxStyle::filled(ppt_color(level.header_color())).centered(),
            vec![Run::new(level.name(), 9).bold().color("FFFFFF")],
        );

        for (row, item) in track.items_at(*level).enumerate() {
            let y = start_y + 0.45 + row as f64 * item_height;
            let link = slide.link(&item.item.url);
            slide.text_box(
                Frame::new(x, y, level_width - 0.1, item_height - 0.05),
                BoxStyle::filled("FFFFFF").outlined("E9EBED"),
                vec![
                    Run::new(&item.item.title, 7).color("0972D3").link(link),
                    Run::new(&format!("{} | {}", item.item.duration, item.item.level), 6)
                        .color("5F6B7A"),
                ],
            );
        }
    }

    slide
}

/// Levels x tracks table, split across slides by level rows.
fn grid_slides(tracks: &[Track]) -> Vec<Slide> {
    let track_width = if tracks.is_empty() {
        7.0
    } else {
        7.0 / tracks.len() as f64
    };
    let mut columns = vec![2.0];
    columns.extend(std::iter::repeat(track_width).take(tracks.len()));

    let header: Vec<Vec<Run>> = std::iter::once(vec![Run::new("Levels", 7).bold().color("FFFFFF")])
        .chain(
            tracks
                .iter()
                .map(|t| vec![Run::new(&t.name, 7).bold().color("FFFFFF")]),
        )
        .collect();

    LevelId::all()
        .chunks(LEVEL_ROWS_PER_SLIDE)
        .map(|levels| {
            let mut rows = vec![TableRow {
                height: 0.4,
                fill: "0F1B2A".to_string(),
                cells: header.clone(),
            }];

            for level in levels {
                let mut cells = vec![vec![Run::new(level.name(), 7).bold().color("FFFFFF")]];
                for track in tracks {
                    let mut runs = Vec::new();
                    for (i, item) in track.items_at(*level).enumerate() {
                        if i > 0 {
                            runs.push(Run::new("", 7));
                        }
                        runs.push(Run::new(&item.item.title, 7).color("000716"));
                        runs.push(Run::new(&format!("({})", item.item.duration), 7).color("5F6B7A"));
                    }
                    cells.push(runs);
                }
                rows.push(TableRow {
                    height: 0.8,
                    fill: ppt_color(level.band().background()).to_string(),
                    cells,
                });
            }

            let mut slide = Slide::default();
            slide.table(0.5, 0.5, &columns, &rows, |row, col| {
                if row > 0 && col == 0 {
                    Some(ppt_color(levels[row - 1].header_color()))
                } else {
                    None
                }
            });
            slide
        })
        .collect()
}

fn ppt_color(css: &str) -> &str {
    css.trim_start_matches('#')
}

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Frame {
    fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    fn xfrm(&self, prefix: &str) -> String {
        format!(
            "<{prefix}:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></{prefix}:xfrm>",
            emu(self.x),
            emu(self.y),
            emu(self.w),
            emu(self.h)
        )
    }
}

#[derive(Debug, Clone)]
struct BoxStyle {
    fill: Option<String>,
    line: Option<String>,
    centered: bool,
}

impl BoxStyle {
    fn plain() -> Self {
        Self {
            fill: None,
            line: None,
            centered: false,
        }
    }

    fn filled(color: &str) -> Self {
        Self {
            fill: Some(color.to_string()),
            ..Self::plain()
        }
    }

    fn outlined(mut self, color: &str) -> Self {
        self.line = Some(color.to_string());
        self
    }

    fn centered(mut self) -> Self {
        self.centered = true;
        self
    }
}

/// One paragraph of text with uniform formatting.
#[derive(Debug, Clone)]
struct Run {
    text: String,
    size: u32,
    bold: bool,
    color: Option<String>,
    link: Option<String>,
}

impl Run {
    fn new(text: &str, size: u32) -> Self {
        Self {
            text: text.to_string(),
            size,
            bold: false,
            color: None,
            link: None,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    fn link(mut self, rel_id: String) -> Self {
        self.link = Some(rel_id);
        self
    }

    fn paragraph(&self, centered: bool) -> String {
        let align = if centered { "<a:pPr algn=\"ctr\"/>" } else { "" };
        let size = self.size * 100;
        if self.text.is_empty() {
            return format!("<a:p>{align}<a:endParaRPr lang=\"en-US\" sz=\"{size}\"/></a:p>");
        }

        let bold = if self.bold { " b=\"1\"" } else { "" };
        let fill = self
            .color
            .as_ref()
            .map(|c| format!("<a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>", c))
            .unwrap_or_default();
        let link = self
            .link
            .as_ref()
            .map(|id| format!("<a:hlinkClick r:id=\"{}\"/>", id))
            .unwrap_or_default();

        format!(
            "<a:p>{align}<a:r><a:rPr lang=\"en-US\" sz=\"{size}\"{bold} dirty=\"0\">{fill}<a:latin typeface=\"{FONT}\"/>{link}</a:rPr><a:t>{}</a:t></a:r></a:p>",
            escape(&self.text)
        )
    }
}

#[derive(Debug, Clone)]
struct TableRow {
    height: f64,
    fill: String,
    cells: Vec<Vec<Run>>,
}

#[derive(Debug, Default)]
struct Slide {
    shapes: Vec<String>,
    links: Vec<String>,
    next_shape_id: u32,
}

impl Slide {
    fn shape_id(&mut self) -> u32 {
        // id 1 belongs to the slide's group shape
        self.next_shape_id = self.next_shape_id.max(1) + 1;
        self.next_shape_id
    }

    /// Registers an external hyperlink and returns its relationship id.
    fn link(&mut self, url: &str) -> String {
        self.links.push(url.to_string());
        // rId1 is the layout relationship
        format!("rId{}", self.links.len() + 1)
    }

    fn text_box(&mut self, frame: Frame, style: BoxStyle, runs: Vec<Run>) {
        let id = self.shape_id();
        let fill = match &style.fill {
            Some(c) => format!("<a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>", c),
            None => "<a:noFill/>".to_string(),
        };
        let line = style
            .line
            .as_ref()
            .map(|c| format!("<a:ln w=\"6350\"><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill></a:ln>", c))
            .unwrap_or_default();
        let paragraphs: String = runs.iter().map(|r| r.paragraph(style.centered)).collect();

        self.shapes.push(format!(
            "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"Text {id}\"/><p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
<p:spPr>{}<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom>{fill}{line}</p:spPr>\
<p:txBody><a:bodyPr wrap=\"square\" lIns=\"38100\" tIns=\"38100\" rIns=\"38100\" bIns=\"38100\" anchor=\"ctr\"><a:normAutofit/></a:bodyPr><a:lstStyle/>{paragraphs}</p:txBody></p:sp>",
            frame.xfrm("a")
        ));
    }

    fn table<F>(&mut self, x: f64, y: f64, columns: &[f64], rows: &[TableRow], cell_fill: F)
    where
        F: Fn(usize, usize) -> Option<&'static str>,
    {
        let id = self.shape_id();
        let width: f64 = columns.iter().sum();
        let height: f64 = rows.iter().map(|r| r.height).sum();
        let grid: String = columns
            .iter()
            .map(|w| format!("<a:gridCol w=\"{}\"/>", emu(*w)))
            .collect();

        let border = |side: &str| {
            format!("<a:{side} w=\"6350\"><a:solidFill><a:srgbClr val=\"E9EBED\"/></a:solidFill></a:{side}>")
        };
        let borders = ["lnL", "lnR", "lnT", "lnB"].map(border).concat();

        let mut body = String::new();
        for (r, row) in rows.iter().enumerate() {
            body.push_str(&format!("<a:tr h=\"{}\">", emu(row.height)));
            for (c, runs) in row.cells.iter().enumerate() {
                let fill: &str = match cell_fill(r, c) {
                    Some(color) => color,
                    None => &row.fill,
                };
                let paragraphs: String = if runs.is_empty() {
                    Run::new("", 7).paragraph(false)
                } else {
                    runs.iter().map(|run| run.paragraph(false)).collect()
                };
                body.push_str(&format!(
                    "<a:tc><a:txBody><a:bodyPr/><a:lstStyle/>{paragraphs}</a:txBody>\
<a:tcPr anchor=\"ctr\">{borders}<a:solidFill><a:srgbClr val=\"{fill}\"/></a:solidFill></a:tcPr></a:tc>"
                ));
            }
            body.push_str("</a:tr>");
        }

        self.shapes.push(format!(
            "<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id=\"{id}\" name=\"Table {id}\"/>\
<p:cNvGraphicFramePr><a:graphicFrameLocks noGrp=\"1\"/></p:cNvGraphicFramePr><p:nvPr/></p:nvGraphicFramePr>{}\
<a:graphic><a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/table\">\
<a:tbl><a:tblPr firstRow=\"1\"/><a:tblGrid>{grid}</a:tblGrid>{body}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>",
            Frame::new(x, y, width, height).xfrm("p")
        ));
    }

    fn xml(&self) -> String {
        format!(
            "{XML_DECL}<p:sld {NS}><p:cSld><p:spTree>\
<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
<p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/><a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>\
{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>",
            self.shapes.concat()
        )
    }

    fn rels_xml(&self) -> String {
        let mut rels = format!(
            "<Relationship Id=\"rId1\" Type=\"{REL_TYPE}/slideLayout\" Target=\"../slideLayouts/slideLayout1.xml\"/>"
        );
        for (i, url) in self.links.iter().enumerate() {
            rels.push_str(&format!(
                "<Relationship Id=\"rId{}\" Type=\"{REL_TYPE}/hyperlink\" Target=\"{}\" TargetMode=\"External\"/>",
                i + 2,
                escape(url)
            ));
        }
        format!("{XML_DECL}<Relationships xmlns=\"{REL_NS}\">{rels}</Relationships>")
    }
}

struct Deck {
    title: String,
    slides: Vec<Slide>,
}

impl Deck {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            slides: Vec::new(),
        }
    }

    fn push(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    fn write(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        let mut parts: Vec<(String, String)> = vec![
            ("[Content_Types].xml".into(), self.content_types()),
            ("_rels/.rels".into(), package_rels()),
            ("docProps/core.xml".into(), self.core_props()),
            ("ppt/presentation.xml".into(), self.presentation()),
            ("ppt/_rels/presentation.xml.rels".into(), self.presentation_rels()),
            ("ppt/slideMasters/slideMaster1.xml".into(), slide_master()),
            (
                "ppt/slideMasters/_rels/slideMaster1.xml.rels".into(),
                slide_master_rels(),
            ),
            ("ppt/slideLayouts/slideLayout1.xml".into(), slide_layout()),
            (
                "ppt/slideLayouts/_rels/slideLayout1.xml.rels".into(),
                slide_layout_rels(),
            ),
            ("ppt/theme/theme1.xml".into(), theme()),
        ];
        for (i, slide) in self.slides.iter().enumerate() {
            let n = i + 1;
            parts.push((format!("ppt/slides/slide{n}.xml"), slide.xml()));
            parts.push((format!("ppt/slides/_rels/slide{n}.xml.rels"), slide.rels_xml()));
        }

        for (name, content) in parts {
            zip.start_file(name, options)?;
            zip.write_all(content.as_bytes())?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn content_types(&self) -> String {
        let ct = "application/vnd.openxmlformats-officedocument";
        let mut overrides = format!(
            "<Override PartName=\"/ppt/presentation.xml\" ContentType=\"{ct}.presentationml.presentation.main+xml\"/>\
<Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" ContentType=\"{ct}.presentationml.slideMaster+xml\"/>\
<Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" ContentType=\"{ct}.presentationml.slideLayout+xml\"/>\
<Override PartName=\"/ppt/theme/theme1.xml\" ContentType=\"{ct}.theme+xml\"/>\
<Override PartName=\"/docProps/core.xml\" ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>"
        );
        for n in 1..=self.slides.len() {
            overrides.push_str(&format!(
                "<Override PartName=\"/ppt/slides/slide{n}.xml\" ContentType=\"{ct}.presentationml.slide+xml\"/>"
            ));
        }
        format!(
            "{XML_DECL}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>{overrides}</Types>"
        )
    }

    fn core_props(&self) -> String {
        format!(
            "{XML_DECL}<cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\
<dc:title>{}</dc:title><dc:creator>learning-map</dc:creator></cp:coreProperties>",
            escape(&self.title)
        )
    }

    fn presentation(&self) -> String {
        let slide_ids: String = (0..self.slides.len())
            .map(|i| format!("<p:sldId id=\"{}\" r:id=\"rId{}\"/>", 256 + i, i + 3))
            .collect();
        format!(
            "{XML_DECL}<p:presentation {NS}>\
<p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
<p:sldIdLst>{slide_ids}</p:sldIdLst>\
<p:sldSz cx=\"{}\" cy=\"{}\"/><p:notesSz cx=\"6858000\" cy=\"9144000\"/></p:presentation>",
            emu(SLIDE_WIDTH),
            emu(SLIDE_HEIGHT)
        )
    }

    fn presentation_rels(&self) -> String {
        let mut rels = format!(
            "<Relationship Id=\"rId1\" Type=\"{REL_TYPE}/slideMaster\" Target=\"slideMasters/slideMaster1.xml\"/>\
<Relationship Id=\"rId2\" Type=\"{REL_TYPE}/theme\" Target=\"theme/theme1.xml\"/>"
        );
        for i in 0..self.slides.len() {
            rels.push_str(&format!(
                "<Relationship Id=\"rId{}\" Type=\"{REL_TYPE}/slide\" Target=\"slides/slide{}.xml\"/>",
                i + 3,
                i + 1
            ));
        }
        format!("{XML_DECL}<Relationships xmlns=\"{REL_NS}\">{rels}</Relationships>")
    }
}

fn package_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"{REL_NS}\">\
<Relationship Id=\"rId1\" Type=\"{REL_TYPE}/officeDocument\" Target=\"ppt/presentation.xml\"/>\
<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" Target=\"docProps/core.xml\"/>\
</Relationships>"
    )
}

fn empty_tree() -> &'static str {
    "<p:spTree><p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree>"
}

fn slide_master() -> String {
    format!(
        "{XML_DECL}<p:sldMaster {NS}><p:cSld>{}</p:cSld>\
<p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" accent2=\"accent2\" accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>\
<p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst></p:sldMaster>",
        empty_tree()
    )
}

fn slide_master_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"{REL_NS}\">\
<Relationship Id=\"rId1\" Type=\"{REL_TYPE}/slideLayout\" Target=\"../slideLayouts/slideLayout1.xml\"/>\
<Relationship Id=\"rId2\" Type=\"{REL_TYPE}/theme\" Target=\"../theme/theme1.xml\"/>\
</Relationships>"
    )
}

fn slide_layout() -> String {
    format!(
        "{XML_DECL}<p:sldLayout {NS} type=\"blank\" preserve=\"1\"><p:cSld name=\"Blank\">{}</p:cSld>\
<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>",
        empty_tree()
    )
}

fn slide_layout_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"{REL_NS}\">\
<Relationship Id=\"rId1\" Type=\"{REL_TYPE}/slideMaster\" Target=\"../slideMasters/slideMaster1.xml\"/>\
</Relationships>"
    )
}

fn theme() -> String {
    let colors = [
        ("dk1", "000000"),
        ("lt1", "FFFFFF"),
        ("dk2", "0F1B2A"),
        ("lt2", "E9EBED"),
        ("accent1", "0972D3"),
        ("accent2", "037F0C"),
        ("accent3", "5F1DC5"),
        ("accent4", "414D5C"),
        ("accent5", "5F6B7A"),
        ("accent6", "FF9900"),
        ("hlink", "0972D3"),
        ("folHlink", "5F1DC5"),
    ]
    .iter()
    .map(|(name, val)| format!("<a:{name}><a:srgbClr val=\"{val}\"/></a:{name}>"))
    .collect::<String>();

    let font = format!("<a:latin typeface=\"{FONT}\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/>");
    let solid = "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>";
    let line = format!("<a:ln w=\"6350\">{solid}</a:ln>");
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";

    format!(
        "{XML_DECL}<a:theme xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" name=\"Learning Map\"><a:themeElements>\
<a:clrScheme name=\"Learning Map\">{colors}</a:clrScheme>\
<a:fontScheme name=\"Learning Map\"><a:majorFont>{font}</a:majorFont><a:minorFont>{font}</a:minorFont></a:fontScheme>\
<a:fmtScheme name=\"Learning Map\">\
<a:fillStyleLst>{solid}{solid}{solid}</a:fillStyleLst>\
<a:lnStyleLst>{line}{line}{line}</a:lnStyleLst>\
<a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst>\
<a:bgFillStyleLst>{solid}{solid}{solid}</a:bgFillStyleLst>\
</a:fmtScheme></a:themeElements></a:theme>"
    )
}
