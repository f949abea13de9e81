//! Hazard filtering and ordering of the displayed object list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::derive::{average_diameter, closest_approach};
use crate::model::Neo;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Date,
    Name,
    Diameter,
    Distance,
}

/// Unrecognised keys fall back to [`SortBy::Date`].
impl FromStr for SortBy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "name" => SortBy::Name,
            "diameter" => SortBy::Diameter,
            "distance" => SortBy::Distance,
            _ => SortBy::Date,
        })
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortBy::Date => "date",
            SortBy::Name => "name",
            SortBy::Diameter => "diameter",
            SortBy::Distance => "distance",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub hazardous_only: bool,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

/// Returns a filtered, ordered copy of `neos`.
pub fn apply_filter_and_sort(neos: &[Neo], config: &FilterConfig) -> Vec<Neo> {
    let mut view: Vec<Neo> = neos
        .iter()
        .filter(|neo| !config.hazardous_only || neo.is_potentially_hazardous)
        .cloned()
        .collect();

    let compare = comparator(config.sort_by);
    stable_sort_by(&mut view, |a, b| match config.sort_order {
        SortOrder::Asc => compare(a, b),
        SortOrder::Desc => compare(a, b).reverse(),
    });

    view
}

fn comparator(sort_by: SortBy) -> fn(&Neo, &Neo) -> Ordering {
    match sort_by {
        SortBy::Name => compare_names,
        SortBy::Diameter => compare_diameters,
        SortBy::Distance => compare_distances,
        SortBy::Date => compare_dates,
    }
}

/// Case-insensitive first; names equal up to case put lowercase first, as
/// locale collation does.
fn compare_names(a: &Neo, b: &Neo) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| b.name.cmp(&a.name))
}

fn compare_diameters(a: &Neo, b: &Neo) -> Ordering {
    compare_f64(average_diameter(a), average_diameter(b))
}

fn compare_distances(a: &Neo, b: &Neo) -> Ordering {
    compare_f64(approach_distance(a), approach_distance(b))
}

fn approach_distance(neo: &Neo) -> f64 {
    closest_approach(neo)
        .map(|a| a.miss_distance_km())
        .unwrap_or(f64::INFINITY)
}

/// Objects without a dated approach compare equal to everything.
fn compare_dates(a: &Neo, b: &Neo) -> Ordering {
    let date_a = closest_approach(a).and_then(|c| c.timestamp_millis());
    let date_b = closest_approach(b).and_then(|c| c.timestamp_millis());
    match (date_a, date_b) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => Ordering::Equal,
    }
}

/// NaN compares equal, as a NaN difference would.
fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Insertion sort: stable and well defined when `compare` is not a total
/// order (see [`compare_dates`]). Afterwards no adjacent pair compares
/// `Greater`, so sorting again is a no-op.
fn stable_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::tests::{approach, neo};

    fn ids(neos: &[Neo]) -> Vec<&str> {
        neos.iter().map(|n| n.id.as_str()).collect()
    }

    fn sample() -> Vec<Neo> {
        vec![
            neo("a", "Bravo", true, (0.4, 0.6), vec![approach("2024-03-02", "5000", "100")]),
            neo("b", "alpha", false, (0.1, 0.1), vec![approach("2024-03-01", "90000", "100")]),
            neo("c", "Charlie", true, (0.2, 0.2), vec![]),
            neo("d", "delta", false, (0.9, 1.1), vec![approach("2024-03-04", "100", "100")]),
        ]
    }

    fn config(sort_by: SortBy, sort_order: SortOrder) -> FilterConfig {
        FilterConfig {
            hazardous_only: false,
            sort_by,
            sort_order,
        }
    }

    #[test]
    fn test_default_config() {
        let c = FilterConfig::default();
        assert!(!c.hazardous_only);
        assert_eq!(c.sort_by, SortBy::Date);
        assert_eq!(c.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_empty_input() {
        assert!(apply_filter_and_sort(&[], &FilterConfig::default()).is_empty());
    }

    #[test]
    fn test_hazardous_only_is_subset() {
        let neos = sample();
        let mut c = FilterConfig::default();
        let all = apply_filter_and_sort(&neos, &c);
        c.hazardous_only = true;
        let hazardous = apply_filter_and_sort(&neos, &c);

        assert!(hazardous.iter().all(|n| n.is_potentially_hazardous));
        assert!(hazardous.iter().all(|h| all.iter().any(|n| n.id == h.id)));
        assert_eq!(hazardous.len(), 2);
    }

    #[test]
    fn test_input_not_mutated() {
        let neos = sample();
        let before = neos.clone();
        let _ = apply_filter_and_sort(&neos, &config(SortBy::Name, SortOrder::Desc));
        assert_eq!(neos, before);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let out = apply_filter_and_sort(&sample(), &config(SortBy::Name, SortOrder::Asc));
        assert_eq!(ids(&out), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_sort_by_name_lowercase_first_on_case_tie() {
        let neos = vec![
            neo("upper", "Ceres", false, (0.1, 0.1), vec![]),
            neo("lower", "ceres", false, (0.1, 0.1), vec![]),
        ];
        let out = apply_filter_and_sort(&neos, &config(SortBy::Name, SortOrder::Asc));
        assert_eq!(ids(&out), vec!["lower", "upper"]);
    }

    #[test]
    fn test_sort_by_diameter_desc() {
        let out = apply_filter_and_sort(&sample(), &config(SortBy::Diameter, SortOrder::Desc));
        assert_eq!(ids(&out), vec!["d", "a", "c", "b"]);
    }

    #[test]
    fn test_sort_by_distance_missing_approach_last() {
        let out = apply_filter_and_sort(&sample(), &config(SortBy::Distance, SortOrder::Asc));
        assert_eq!(ids(&out), vec!["d", "a", "b", "c"]);

        let mut neos = sample();
        neos.rotate_left(2);
        let out = apply_filter_and_sort(&neos, &config(SortBy::Distance, SortOrder::Asc));
        assert_eq!(out.last().unwrap().id, "c");
    }

    #[test]
    fn test_sort_by_distance_desc_puts_missing_first() {
        let out = apply_filter_and_sort(&sample(), &config(SortBy::Distance, SortOrder::Desc));
        assert_eq!(ids(&out), vec!["c", "b", "a", "d"]);
    }

    #[test]
    fn test_sort_by_date_with_dated_objects() {
        let neos: Vec<Neo> = sample().into_iter().filter(|n| n.id != "c").collect();
        let out = apply_filter_and_sort(&neos, &FilterConfig::default());
        assert_eq!(ids(&out), vec!["b", "a", "d"]);
    }

    #[test]
    fn test_sort_by_date_undated_keeps_place() {
        let neos = vec![
            neo("x", "x", false, (0.1, 0.1), vec![]),
            neo("y", "y", false, (0.1, 0.1), vec![]),
        ];
        let out = apply_filter_and_sort(&neos, &config(SortBy::Date, SortOrder::Desc));
        assert_eq!(ids(&out), vec!["x", "y"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let neos = vec![
            neo("1", "same", false, (0.2, 0.2), vec![]),
            neo("2", "same", false, (0.2, 0.2), vec![]),
            neo("3", "same", false, (0.2, 0.2), vec![]),
        ];
        for sort_by in [SortBy::Name, SortBy::Diameter, SortBy::Distance, SortBy::Date] {
            let out = apply_filter_and_sort(&neos, &config(sort_by, SortOrder::Asc));
            assert_eq!(ids(&out), vec!["1", "2", "3"]);
        }
    }

    #[test]
    fn test_sort_is_idempotent() {
        for sort_by in [SortBy::Name, SortBy::Diameter, SortBy::Distance, SortBy::Date] {
            for sort_order in [SortOrder::Asc, SortOrder::Desc] {
                let c = config(sort_by, sort_order);
                let once = apply_filter_and_sort(&sample(), &c);
                let twice = apply_filter_and_sort(&once, &c);
                assert_eq!(ids(&once), ids(&twice), "{sort_by} {sort_order:?}");
            }
        }
    }

    #[test]
    fn test_unknown_sort_key_falls_back_to_date() {
        assert_eq!("velocity".parse::<SortBy>().unwrap(), SortBy::Date);
        assert_eq!("Distance".parse::<SortBy>().unwrap(), SortBy::Distance);
    }
}
