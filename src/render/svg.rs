//! SVG drainage maps
//!
//! One file per group: equal-aspect drainage circles, well markers and
//! labels. Estimated, fallback and overlap-flagged circles are styled
//! apart from known ones.

use super::{GroupMap, MapRenderer, MapWell, RenderError, WellStyle};
use crate::config::RenderConfig;
use std::path::{Path, PathBuf};

/// Vertical room reserved for the title (px).
const TITLE_BAND_PX: f64 = 36.0;

/// Writes `<output_dir>/<group><suffix>.svg` per group.
pub struct SvgMapRenderer {
    output_dir: PathBuf,
    width_px: u32,
    padding: f64,
    suffix: String,
    written: Vec<PathBuf>,
}

impl SvgMapRenderer {
    pub fn new(output_dir: impl AsRef<Path>, config: &RenderConfig) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            width_px: config.width_px,
            padding: config.padding,
            suffix: String::new(),
            written: Vec::new(),
        }
    }

    /// Append `_<suffix>` to every file name (e.g. "before").
    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = format!("_{suffix}");
        self
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn file_name(&self, map: &GroupMap) -> String {
        let stem: String = map
            .key
            .to_string()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("{stem}{}.svg", self.suffix)
    }
}

impl MapRenderer for SvgMapRenderer {
    fn render_group(&mut self, map: &GroupMap) -> Result<(), RenderError> {
        let svg = render_svg(map, self.width_px, self.padding)?;

        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| RenderError::Io { path, source }
        };
        std::fs::create_dir_all(&self.output_dir).map_err(io_err(&self.output_dir))?;
        let path = self.output_dir.join(self.file_name(map));
        std::fs::write(&path, svg).map_err(io_err(&path))?;

        tracing::debug!(group = %map.key, path = %path.display(), "Drainage map written");
        self.written.push(path);
        Ok(())
    }

    fn renderer_name(&self) -> &str {
        "SVG"
    }
}

/// Render one group as a standalone SVG document.
pub fn render_svg(map: &GroupMap, width_px: u32, padding: f64) -> Result<String, RenderError> {
    if map.wells.is_empty() {
        return Err(RenderError::EmptyGroup(map.key.to_string()));
    }

    // data bounds including circles
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for w in &map.wells {
        let r = w.radius.unwrap_or(0.0);
        min_x = min_x.min(w.position.x - r);
        max_x = max_x.max(w.position.x + r);
        min_y = min_y.min(w.position.y - r);
        max_y = max_y.max(w.position.y + r);
    }
    let span = (max_x - min_x).max(max_y - min_y).max(1.0);
    let pad = span * padding;
    min_x -= pad;
    max_y += pad;
    let data_w = (max_x - min_x + pad).max(1.0);
    let data_h = (max_y - min_y + pad).max(1.0);

    let scale = f64::from(width_px) / data_w;
    let height_px = (data_h * scale).ceil() + TITLE_BAND_PX;
    let to_screen = |x: f64, y: f64| ((x - min_x) * scale, (max_y - y) * scale + TITLE_BAND_PX);

    let mut parts = vec![
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width_px}" height="{height_px:.0}" viewBox="0 0 {width_px} {height_px:.0}">"#
        ),
        r#"<rect width="100%" height="100%" fill="white"/>"#.to_string(),
        format!(
            r#"<text x="{:.1}" y="24" font-family="sans-serif" font-size="18" text-anchor="middle">Drainage Plot for {}</text>"#,
            f64::from(width_px) / 2.0,
            xml_escape(&map.key.to_string())
        ),
    ];

    // circles first so markers and labels stay on top
    for w in &map.wells {
        if let Some(r) = w.radius {
            let (cx, cy) = to_screen(w.position.x, w.position.y);
            parts.push(circle_element(w, cx, cy, r * scale));
        }
    }
    for w in &map.wells {
        let (cx, cy) = to_screen(w.position.x, w.position.y);
        parts.push(format!(r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="4" fill="red"/>"#));
        parts.push(format!(
            r#"<text x="{cx:.2}" y="{:.2}" font-family="sans-serif" font-size="11" text-anchor="middle">{}</text>"#,
            cy - 7.0,
            xml_escape(&w.name)
        ));
    }
    parts.push("</svg>".to_string());

    Ok(parts.join("\n"))
}

fn circle_element(well: &MapWell, cx: f64, cy: f64, r: f64) -> String {
    let (fill, stroke, dash) = match well.style {
        WellStyle::Known | WellStyle::Missing => ("lightblue", "blue", ""),
        WellStyle::Estimated => ("lightgreen", "green", ""),
        WellStyle::Fallback => ("lightgray", "gray", r#" stroke-dasharray="2 4""#),
        WellStyle::Overlap => ("moccasin", "darkorange", r#" stroke-dasharray="8 4""#),
    };
    format!(
        r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{fill}" fill-opacity="0.3" stroke="{stroke}" stroke-width="2"{dash}/>"#
    )
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
