use neo_tracker::compare::{plot_points, project_for_chart, summarize};
use neo_tracker::derive::closest_approach;
use neo_tracker::filter::{FilterConfig, SortBy, SortOrder, apply_filter_and_sort};
use neo_tracker::format::{format_distance, format_velocity};
use neo_tracker::model::{FeedResponse, Neo};

fn fixture_feed() -> FeedResponse {
    let bytes = include_bytes!("fixtures/feed.json");
    serde_json::from_slice(bytes).expect("Failed to parse feed fixture")
}

fn ids(neos: &[Neo]) -> Vec<&str> {
    neos.iter().map(|n| n.id.as_str()).collect()
}

#[test]
fn test_full_pipeline() {
    let feed = fixture_feed();
    assert_eq!(feed.element_count, 4);
    assert_eq!(feed.near_earth_objects.len(), 2);

    let neos = feed.flatten();
    assert_eq!(ids(&neos), vec!["3542519", "3727181", "2465633", "3726710"]);

    let view = apply_filter_and_sort(
        &neos,
        &FilterConfig {
            hazardous_only: true,
            ..Default::default()
        },
    );
    assert_eq!(ids(&view), vec!["3542519", "2465633"]);

    let summary = summarize(&neos);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.hazardous, 2);
    assert!((summary.mean_diameter_km - 0.17188).abs() < 1e-4);

    let rows = project_for_chart(&view);
    assert_eq!(rows[1].label, "465633 (2009 JR...");
    assert_eq!(plot_points(&rows).len(), 2);
}

#[test]
fn test_sort_keys_on_fixture() {
    let neos = fixture_feed().flatten();
    let by = |sort_by, sort_order| {
        let view = apply_filter_and_sort(
            &neos,
            &FilterConfig {
                hazardous_only: false,
                sort_by,
                sort_order,
            },
        );
        view.into_iter().map(|n| n.id).collect::<Vec<_>>()
    };

    assert_eq!(
        by(SortBy::Date, SortOrder::Asc),
        vec!["3542519", "3727181", "2465633", "3726710"]
    );
    assert_eq!(
        by(SortBy::Name, SortOrder::Asc),
        vec!["3542519", "3726710", "3727181", "2465633"]
    );
    assert_eq!(
        by(SortBy::Diameter, SortOrder::Desc),
        vec!["2465633", "3542519", "3727181", "3726710"]
    );
    assert_eq!(
        by(SortBy::Distance, SortOrder::Asc),
        vec!["3726710", "3727181", "3542519", "2465633"]
    );
}

#[test]
fn test_formatting_fixture_fields() {
    let neos = fixture_feed().flatten();
    let jr5 = neos.iter().find(|n| n.id == "2465633").unwrap();
    let approach = closest_approach(jr5).unwrap();

    assert_eq!(format_distance(&approach.miss_distance.kilometers), "45.29M km");
    assert_eq!(
        format_velocity(&approach.relative_velocity.kilometers_per_hour),
        "65260.57 km/h"
    );
}

#[test]
fn test_detail_fixture_closest_is_earliest() {
    let neo: Neo = serde_json::from_slice(include_bytes!("fixtures/neo_detail.json")).unwrap();
    let orbit = neo.orbital_data.as_ref().expect("detail carries orbital data");
    assert_eq!(orbit.orbit_id, "659");

    let approach = closest_approach(&neo).unwrap();
    assert_eq!(approach.date, "1997-04-20");
    assert_eq!(neo.close_approaches[0].date, "2031-05-01");
}
