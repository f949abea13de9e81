//! Rendering and export of object lists and comparison rows.
//!
//! Supports pretty-printing, JSON serialization, one-line summaries and CSV
//! append.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::compare::ChartRow;
use crate::derive::{average_diameter, closest_approach};
use crate::format::{format_diameter, format_distance, format_velocity};
use crate::model::Neo;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One list line: name, hazard marker, size and closest approach.
pub fn render_row(neo: &Neo) -> String {
    let hazard = if neo.is_potentially_hazardous {
        "HAZARDOUS"
    } else {
        "-"
    };
    let diameter = format_diameter(average_diameter(neo), 2);
    match closest_approach(neo) {
        Some(a) => format!(
            "{} | {} | {} | {} | {} | {}",
            neo.name,
            hazard,
            diameter,
            a.date,
            format_distance(&a.miss_distance.kilometers),
            format_velocity(&a.relative_velocity.kilometers_per_hour),
        ),
        None => format!("{} | {} | {} | no approach data", neo.name, hazard, diameter),
    }
}

/// Appends comparison rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_rows(path: &Path, rows: &[ChartRow]) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, rows = rows.len(), "Appending CSV rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
