//! Administrative seeding of reference data.
//!
//! Runs from the `seed` CLI subcommand, never from the request path.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use tracing::info;

use crate::decision::types::{Color, Disposition, Shape, StickerReference};
use crate::store::sqlite::SqliteRuleStore;

/// Row counts inserted by a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub airlines: usize,
    pub rules: usize,
    pub stickers: usize,
    pub flights: usize,
}

/// Inserts the default reference set: four airlines with their rule rows,
/// the full shape×color sticker grid, and the known flight numbers.
pub fn seed_defaults(store: &SqliteRuleStore) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    let airlines: &[(&str, [Disposition; 3], &[&str])] = &[
        (
            "Aeroméxico",
            [Disposition::Discard, Disposition::Keep, Disposition::Keep],
            &["AM123", "AM234"],
        ),
        (
            "Volaris",
            [Disposition::Discard, Disposition::Discard, Disposition::Keep],
            &["VR123", "VR234"],
        ),
        (
            "VivaAerobus",
            [Disposition::Discard, Disposition::Keep, Disposition::Keep],
            &["VA123", "VA456"],
        ),
        (
            "American Airlines",
            [Disposition::Discard, Disposition::Discard, Disposition::Keep],
            &["AA123", "AA456"],
        ),
    ];

    for (name, [empty, partial, full], flights) in airlines {
        let airline_id = store.insert_airline(name)?;
        store.insert_bottle_rule(airline_id, *empty, *partial, *full)?;
        summary.airlines += 1;
        summary.rules += 1;

        for flight in *flights {
            store.insert_flight(airline_id, flight)?;
            summary.flights += 1;
        }
    }

    let shapes = [
        (Shape::Circle, 2025),
        (Shape::Square, 2024),
        (Shape::Triangle, 2026),
        (Shape::Hexagon, 2027),
    ];
    let colors = [
        (Color::Red, 1),
        (Color::Green, 4),
        (Color::Yellow, 7),
        (Color::Blue, 10),
    ];

    for (shape, year) in shapes {
        for (color, month) in colors {
            let expires_on = NaiveDate::from_ymd_opt(year, month, 1)
                .context("invalid seed expiry date")?;
            store.insert_sticker_reference(&StickerReference { shape, color, expires_on })?;
            summary.stickers += 1;
        }
    }

    info!(
        airlines = summary.airlines,
        rules = summary.rules,
        stickers = summary.stickers,
        flights = summary.flights,
        "Default reference data inserted"
    );
    Ok(summary)
}

#[derive(Debug, Deserialize)]
struct StickerCsvRow {
    shape: String,
    color: String,
    expires_on: NaiveDate,
}

/// Imports sticker reference rows from a CSV file with `shape,color,expires_on`
/// columns, appending to whatever is already stored. Returns the row count.
pub fn import_sticker_csv(store: &SqliteRuleStore, path: &str) -> Result<usize> {
    let file = File::open(path).with_context(|| format!("cannot open '{path}'"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut imported = 0;
    for result in reader.deserialize() {
        let row: StickerCsvRow = result?;
        let reference = StickerReference {
            shape: Shape::from_label(&row.shape)
                .with_context(|| format!("unknown shape '{}' in {path}", row.shape))?,
            color: Color::from_label(&row.color)
                .with_context(|| format!("unknown color '{}' in {path}", row.color))?,
            expires_on: row.expires_on,
        };
        store.insert_sticker_reference(&reference)?;
        imported += 1;
    }

    info!(imported, path, "Sticker references imported from CSV");
    Ok(imported)
}
