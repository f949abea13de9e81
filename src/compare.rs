//! Summary statistics and chart projections over a selected set of objects.

use serde::Serialize;

use crate::derive::{average_diameter, closest_approach};
use crate::model::Neo;

/// Display names longer than this are cut and suffixed with `...`.
pub const LABEL_MAX_CHARS: usize = 15;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Summary {
    pub total: usize,
    pub hazardous: usize,
    /// `NaN` for an empty selection.
    pub mean_diameter_km: f64,
}

impl Summary {
    /// `false` when the mean is meaningless and callers should show an empty state.
    pub fn has_selection(&self) -> bool {
        self.total > 0
    }
}

/// One bar/table row per selected object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub label: String,
    pub full_name: String,
    pub diameter_km: f64,
    pub hazardous: bool,
    /// `0.0` when the object has no approach data.
    pub distance_km: f64,
    /// `0.0` when the object has no approach data.
    pub velocity_kmh: f64,
    /// Unrounded average diameter, used for plot point sizes.
    #[serde(skip)]
    pub exact_diameter_km: f64,
}

/// Distance-versus-velocity point; distance in millions of kilometres.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub name: String,
    pub distance_mkm: f64,
    pub velocity_kmh: f64,
    pub diameter_km: f64,
    pub hazardous: bool,
}

impl ScatterPoint {
    /// Splits points into the `(non_hazardous, hazardous)` series.
    pub fn split_by_hazard(points: &[ScatterPoint]) -> (Vec<&ScatterPoint>, Vec<&ScatterPoint>) {
        let (hazardous, safe): (Vec<_>, Vec<_>) = points.iter().partition(|p| p.hazardous);
        (safe, hazardous)
    }
}

pub fn summarize(selected: &[Neo]) -> Summary {
    let total = selected.len();
    let hazardous = selected
        .iter()
        .filter(|n| n.is_potentially_hazardous)
        .count();
    let sum: f64 = selected.iter().map(average_diameter).sum();

    Summary {
        total,
        hazardous,
        // 0.0 / 0.0 is NaN for the empty case
        mean_diameter_km: sum / total as f64,
    }
}

pub fn project_for_chart(selected: &[Neo]) -> Vec<ChartRow> {
    selected
        .iter()
        .map(|neo| {
            let approach = closest_approach(neo);
            let diameter = average_diameter(neo);
            ChartRow {
                label: truncate_label(&neo.name),
                full_name: neo.name.clone(),
                diameter_km: round_to(diameter, 3),
                hazardous: neo.is_potentially_hazardous,
                distance_km: approach.map_or(0.0, |a| a.miss_distance_km()),
                velocity_kmh: approach.map_or(0.0, |a| a.velocity_kmh()),
                exact_diameter_km: diameter,
            }
        })
        .collect()
}

/// Rows without a positive distance and velocity are not plottable.
pub fn plot_points(rows: &[ChartRow]) -> Vec<ScatterPoint> {
    rows.iter()
        .filter(|r| r.distance_km > 0.0 && r.velocity_kmh > 0.0)
        .map(|r| ScatterPoint {
            name: r.full_name.clone(),
            distance_mkm: r.distance_km / 1_000_000.0,
            velocity_kmh: r.velocity_kmh,
            diameter_km: r.exact_diameter_km,
            hazardous: r.hazardous,
        })
        .collect()
}

pub fn truncate_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX_CHARS {
        let head: String = name.chars().take(LABEL_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
