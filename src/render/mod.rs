//! Drainage map rendering collaborator
//!
//! Turns a (filled or unfilled) well table into one map per group.
//! Rendering is a side-effect-only consumer: nothing here feeds back into
//! estimation.

mod svg;

pub use svg::{render_svg, SvgMapRenderer};

use crate::estimation::{partition_groups, FillOutcome};
use crate::types::{GroupKey, Point, WellTable};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Group '{0}' has no wells to draw")]
    EmptyGroup(String),
}

/// How a well is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellStyle {
    /// Radius from the input
    Known,
    /// Radius estimated from neighbors
    Estimated,
    /// Default radius, no neighbor data
    Fallback,
    /// Packing radius clamped to the floor, may overlap
    Overlap,
    /// No radius; marker only
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapWell {
    pub name: String,
    pub position: Point,
    pub radius: Option<f64>,
    pub style: WellStyle,
}

/// Everything needed to draw one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMap {
    pub key: GroupKey,
    pub wells: Vec<MapWell>,
}

/// Where rendered maps go.
pub trait MapRenderer {
    fn render_group(&mut self, map: &GroupMap) -> Result<(), RenderError>;

    /// Human-readable name for logging.
    fn renderer_name(&self) -> &str;
}

/// Build one [`GroupMap`] per non-empty group.
///
/// With `outcome`, estimated radii are drawn and styled by their diagnostic;
/// without it, wells missing a radius are drawn as markers only.
pub fn build_group_maps(table: &WellTable, outcome: Option<&FillOutcome>) -> Vec<GroupMap> {
    partition_groups(table)
        .into_iter()
        .map(|group| {
            let wells = group
                .wells
                .iter()
                .map(|w| {
                    let diagnostic = outcome.and_then(|o| o.diagnostic(w.row));
                    let (radius, style) = match (w.radius, diagnostic) {
                        (Some(r), _) => (Some(r), WellStyle::Known),
                        (None, Some(d)) if d.outcome.is_overlap() => {
                            (Some(d.radius), WellStyle::Overlap)
                        }
                        (None, Some(d)) if d.outcome.is_fallback() => {
                            (Some(d.radius), WellStyle::Fallback)
                        }
                        (None, Some(d)) => (Some(d.radius), WellStyle::Estimated),
                        (None, None) => (None, WellStyle::Missing),
                    };
                    MapWell {
                        name: w.name.clone(),
                        position: w.position,
                        radius,
                        style,
                    }
                })
                .collect();
            GroupMap {
                key: group.key,
                wells,
            }
        })
        .collect()
}

/// Render every group of `table`, returning how many maps were drawn.
pub fn render_all(
    renderer: &mut dyn MapRenderer,
    table: &WellTable,
    outcome: Option<&FillOutcome>,
) -> Result<usize, RenderError> {
    let maps = build_group_maps(table, outcome);
    for map in &maps {
        renderer.render_group(map)?;
    }
    tracing::info!(
        renderer = renderer.renderer_name(),
        maps = maps.len(),
        "Drainage maps rendered"
    );
    Ok(maps.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::{fill, Estimator, EstimatorParams};
    use crate::types::Well;

    #[test]
    fn test_styles_follow_diagnostics() {
        let key = GroupKey::new("R", "1");
        let table = WellTable::new(vec![
            Well::new(0, "K", 0.0, 0.0, Some(100.0), key.clone()),
            Well::new(1, "Tight", 110.0, 0.0, None, key),
            Well::new(2, "Solo", 0.0, 0.0, None, GroupKey::new("S", "1")),
        ]);
        let outcome = fill(&table, Estimator::Packing, &EstimatorParams::default()).unwrap();

        let maps = build_group_maps(&table, Some(&outcome));
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0].wells[0].style, WellStyle::Known);
        assert_eq!(maps[0].wells[1].style, WellStyle::Overlap);
        assert_eq!(maps[0].wells[1].radius, Some(50.0));
        assert_eq!(maps[1].wells[0].style, WellStyle::Fallback);

        let before = build_group_maps(&table, None);
        assert_eq!(before[0].wells[1].style, WellStyle::Missing);
        assert_eq!(before[0].wells[1].radius, None);
    }
}
