//! Values computed from a single [`Neo`].

use chrono::NaiveDate;

use crate::model::{CloseApproach, Neo};

/// Arithmetic mean of the kilometre diameter bounds.
pub fn average_diameter(neo: &Neo) -> f64 {
    let range = &neo.estimated_diameter.kilometers;
    (range.estimated_diameter_min + range.estimated_diameter_max) / 2.0
}

/// The earliest-dated approach, not the one with the smallest miss distance.
///
/// Sorts a vector of references, so the record's own sequence keeps its
/// order. Equal dates keep input order; unparseable dates sort last.
pub fn closest_approach(neo: &Neo) -> Option<&CloseApproach> {
    let mut sorted: Vec<&CloseApproach> = neo.close_approaches.iter().collect();
    sorted.sort_by_key(|a| a.approach_date().unwrap_or(NaiveDate::MAX));
    sorted.first().copied()
}
