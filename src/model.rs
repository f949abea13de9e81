//! Near-Earth-Object records as served by the NeoWs feed.
//!
//! Field names follow the upstream JSON through `serde(rename)`. Numeric
//! measurements stay as the strings upstream sends and are parsed on use.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One catalogued near-Earth object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neo {
    pub id: String,
    pub neo_reference_id: String,
    pub name: String,
    #[serde(rename = "is_potentially_hazardous_asteroid")]
    pub is_potentially_hazardous: bool,
    #[serde(default)]
    pub is_sentry_object: bool,
    #[serde(rename = "absolute_magnitude_h")]
    pub absolute_magnitude: f64,
    pub estimated_diameter: EstimatedDiameter,
    #[serde(rename = "close_approach_data", default)]
    pub close_approaches: Vec<CloseApproach>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbital_data: Option<OrbitalData>,
    #[serde(rename = "nasa_jpl_url", default)]
    pub external_reference_url: String,
}

/// Diameter bounds, only the kilometre unit system is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatedDiameter {
    pub kilometers: DiameterRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiameterRange {
    pub estimated_diameter_min: f64,
    pub estimated_diameter_max: f64,
}

/// A single predicted or observed passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseApproach {
    #[serde(rename = "close_approach_date")]
    pub date: String,
    #[serde(
        rename = "close_approach_date_full",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub full_date: Option<String>,
    pub relative_velocity: RelativeVelocity,
    pub miss_distance: MissDistance,
    pub orbiting_body: String,
}

impl CloseApproach {
    /// Calendar date of the approach, `None` when upstream sent something
    /// that is not `YYYY-MM-DD`.
    pub fn approach_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// Milliseconds since the Unix epoch at midnight UTC of the approach date.
    pub fn timestamp_millis(&self) -> Option<i64> {
        self.approach_date()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp_millis())
    }

    pub fn miss_distance_km(&self) -> f64 {
        parse_numeric(&self.miss_distance.kilometers)
    }

    pub fn velocity_kmh(&self) -> f64 {
        parse_numeric(&self.relative_velocity.kilometers_per_hour)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeVelocity {
    pub kilometers_per_second: String,
    pub kilometers_per_hour: String,
    pub miles_per_hour: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissDistance {
    pub astronomical: String,
    pub lunar: String,
    pub kilometers: String,
    pub miles: String,
}

/// Orbit parameters, only supplied by the single-object endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalData {
    pub orbit_id: String,
    pub orbital_period: String,
    pub eccentricity: String,
    pub inclination: String,
}

/// Body of the `/feed` endpoint: objects grouped by calendar date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub element_count: usize,
    pub near_earth_objects: BTreeMap<String, Vec<Neo>>,
}

impl FeedResponse {
    /// All objects in date-key order, each date keeping upstream order.
    pub fn flatten(self) -> Vec<Neo> {
        self.near_earth_objects.into_values().flatten().collect()
    }
}

/// Body of the `/neo/browse` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseResponse {
    pub near_earth_objects: Vec<Neo>,
}

/// Parses an upstream numeric string, yielding `NaN` when it is not a number.
pub fn parse_numeric(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "2465633",
        "neo_reference_id": "2465633",
        "name": "465633 (2009 JR5)",
        "nasa_jpl_url": "https://ssd.jpl.nasa.gov/tools/sbdb_lookup.html#/?sstr=2465633",
        "absolute_magnitude_h": 20.44,
        "estimated_diameter": {
            "kilometers": { "estimated_diameter_min": 0.2170475943, "estimated_diameter_max": 0.4853331752 },
            "meters": { "estimated_diameter_min": 217.0475943071, "estimated_diameter_max": 485.3331752235 }
        },
        "is_potentially_hazardous_asteroid": true,
        "close_approach_data": [{
            "close_approach_date": "2015-09-08",
            "close_approach_date_full": "2015-Sep-08 20:28",
            "epoch_date_close_approach": 1441744080000,
            "relative_velocity": {
                "kilometers_per_second": "18.1279360862",
                "kilometers_per_hour": "65260.5699103704",
                "miles_per_hour": "40550.3802312521"
            },
            "miss_distance": {
                "astronomical": "0.3027469457",
                "lunar": "117.7685618773",
                "kilometers": "45290298.225725659",
                "miles": "28142086.3515817342"
            },
            "orbiting_body": "Earth"
        }],
        "is_sentry_object": false
    }"#;

    #[test]
    fn test_deserialize_feed_object() {
        let neo: Neo = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(neo.id, "2465633");
        assert!(neo.is_potentially_hazardous);
        assert!(!neo.is_sentry_object);
        assert!(neo.orbital_data.is_none());
        assert_eq!(neo.close_approaches.len(), 1);
        let approach = &neo.close_approaches[0];
        assert_eq!(approach.full_date.as_deref(), Some("2015-Sep-08 20:28"));
        assert_eq!(approach.orbiting_body, "Earth");
        assert!((approach.velocity_kmh() - 65260.5699103704).abs() < 1e-6);
    }

    #[test]
    fn test_missing_close_approach_data_is_empty() {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        value.as_object_mut().unwrap().remove("close_approach_data");
        let neo: Neo = serde_json::from_value(value).unwrap();
        assert!(neo.close_approaches.is_empty());
    }

    #[test]
    fn test_timestamp_from_date() {
        let neo: Neo = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(
            neo.close_approaches[0].timestamp_millis(),
            Some(1_441_670_400_000)
        );
    }

    #[test]
    fn test_parse_numeric_non_numeric_is_nan() {
        assert!(parse_numeric("abc").is_nan());
        assert_eq!(parse_numeric(" 12.5 "), 12.5);
    }

    #[test]
    fn test_flatten_keeps_date_order() {
        let neo: Neo = serde_json::from_str(SAMPLE).unwrap();
        let mut second = neo.clone();
        second.id = "2".into();
        let mut response = FeedResponse::default();
        response
            .near_earth_objects
            .insert("2015-09-09".into(), vec![second]);
        response
            .near_earth_objects
            .insert("2015-09-08".into(), vec![neo]);

        let ids: Vec<_> = response.flatten().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["2465633", "2"]);
    }
}
