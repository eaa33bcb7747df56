//! Parser for a service's detail page.
//!
//! Everything is scoped to `div#main_content`. Each subsection is looked up
//! on its own, so a missing contact block does not affect the venue or
//! schedule blocks.

use std::sync::LazyLock;

use lincsfsd_core::{DetailRecord, OpeningTimes, TimeDate};
use scraper::{ElementRef, Html, Selector};

use crate::dom::{
    element_text, first, first_text, label_value_pairs, pair_labels_and_values, selector,
    DEFINITION_DESCRIPTION, DEFINITION_TERM,
};

static MAIN_CONTENT: LazyLock<Selector> = LazyLock::new(|| selector("div#main_content"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static DESCRIPTION_SECTION: LazyLock<Selector> =
    LazyLock::new(|| selector("section.field_section.service_description"));
static DESCRIPTION_TEXT: LazyLock<Selector> = LazyLock::new(|| selector("div.description_text"));
static CONTACT_SECTION: LazyLock<Selector> =
    LazyLock::new(|| selector("section.field_section.service_contact"));
static VENUE_SECTION: LazyLock<Selector> =
    LazyLock::new(|| selector("section.field_section.service_venue"));
static EVENT_SECTION: LazyLock<Selector> =
    LazyLock::new(|| selector("section.field_section.service_event"));
static OTHER_SECTION: LazyLock<Selector> =
    LazyLock::new(|| selector("section.field_section.service_other"));
static SCHEDULE_TABLE: LazyLock<Selector> =
    LazyLock::new(|| selector("table.table.table-condensed"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

/// Builds a [`DetailRecord`] from a detail page body.
///
/// Never fails: a page without a main-content container yields an empty
/// record, and missing subsections leave their fields `None`. With the
/// container present the title is always set, to `Some(None)` when there is
/// no heading; a description section without a text block does the same.
#[must_use]
pub fn parse_detail(html: &str) -> DetailRecord {
    let document = Html::parse_document(html);
    let Some(main) = document.select(&MAIN_CONTENT).next() else {
        tracing::debug!("detail page has no main content container");
        return DetailRecord::default();
    };

    DetailRecord {
        title: Some(first_text(main, &TITLE)),
        description: first(main, &DESCRIPTION_SECTION)
            .map(|section| first_text(section, &DESCRIPTION_TEXT)),
        contact: first(main, &CONTACT_SECTION).map(pair_labels_and_values),
        venue: first(main, &VENUE_SECTION).map(pair_labels_and_values),
        time_date: first(main, &EVENT_SECTION).map(schedule),
        other_details: first(main, &OTHER_SECTION).map(pair_labels_and_values),
    }
}

/// A schedule table wins over the definition-list fallback when both exist.
fn schedule(section: ElementRef<'_>) -> TimeDate {
    match first(section, &SCHEDULE_TABLE) {
        Some(table) => TimeDate::Table(opening_times(table)),
        None => TimeDate::Flattened(flatten(
            label_value_pairs(section, &DEFINITION_TERM, &DEFINITION_DESCRIPTION),
        )),
    }
}

fn opening_times(table: ElementRef<'_>) -> OpeningTimes {
    let mut times = OpeningTimes::default();

    // First row is the column header.
    for (row_index, row) in table.select(&ROW).enumerate().skip(1) {
        let cells: Vec<String> = row.select(&CELL).take(3).map(element_text).collect();
        match <[String; 3]>::try_from(cells) {
            Ok([day, opens, closes]) => times.push_row(day, opens, closes),
            Err(cells) => {
                tracing::warn!(
                    row_index,
                    cells = cells.len(),
                    "schedule row has fewer than three cells; skipping"
                );
            }
        }
    }

    times
}

fn flatten(pairs: Vec<(String, String)>) -> String {
    pairs
        .into_iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[path = "detail_test.rs"]
mod tests;
