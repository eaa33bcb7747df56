//! Output records produced by a directory search.
//!
//! JSON keys keep the directory's display names (`"Service Name"`,
//! `"Time/Date"`, ...), which existing consumers of the payload rely on.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// One matched service from the search results page, with its detail page
/// embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultRecord {
    #[serde(rename = "Service Name")]
    pub service_name: String,
    #[serde(rename = "Main Description")]
    pub main_description: Option<String>,
    #[serde(rename = "Telephone")]
    pub telephone: Option<String>,
    /// Address with any `mailto:` prefix removed.
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Website")]
    pub website: Option<String>,
    #[serde(rename = "Details")]
    pub details: DetailRecord,
}

/// Extended information scraped from a service's detail page.
///
/// A page with no main-content container serializes as `{}`. Once the
/// container exists, `Title` is always written (`null` without a heading),
/// and `Description` is written whenever its section exists (`null` without
/// a text block). The remaining fields are left out when their section is
/// missing.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    #[serde(
        rename = "Title",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub title: Option<Option<String>>,
    #[serde(
        rename = "Description",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub description: Option<Option<String>>,
    #[serde(rename = "Contact", default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<LabelledFields>,
    #[serde(rename = "Venue", default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<LabelledFields>,
    #[serde(rename = "Time/Date", default, skip_serializing_if = "Option::is_none")]
    pub time_date: Option<TimeDate>,
    #[serde(
        rename = "Other Details",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub other_details: Option<LabelledFields>,
}

impl DetailRecord {
    /// Returns `true` when no field was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Heading text, if the page had one.
    #[must_use]
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_ref()?.as_deref()
    }

    /// Description text, if the description section had a text block.
    #[must_use]
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_ref()?.as_deref()
    }
}

/// A key that is present in the JSON (even as `null`) becomes `Some`.
#[allow(clippy::option_option)]
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Opening hours in one of the two shapes the directory publishes.
///
/// Which variant is produced depends only on the markup: a schedule table
/// yields [`TimeDate::Table`], a definition list yields [`TimeDate::Flattened`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeDate {
    Table(OpeningTimes),
    /// `"label: value"` pairs joined with `"; "`.
    Flattened(String),
}

/// Parallel day/open/close columns read from a schedule table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningTimes {
    #[serde(rename = "Days")]
    pub days: Vec<String>,
    #[serde(rename = "Opening Times")]
    pub opening_times: Vec<String>,
    #[serde(rename = "Closing Times")]
    pub closing_times: Vec<String>,
}

impl OpeningTimes {
    pub fn push_row(&mut self, day: String, opens: String, closes: String) {
        self.days.push(day);
        self.opening_times.push(opens);
        self.closing_times.push(closes);
    }
}

/// Label → value pairs in document order.
///
/// A repeated label keeps the position of its first occurrence and takes the
/// value of its last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelledFields(IndexMap<String, String>);

impl LabelledFields {
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.0.get(label).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for LabelledFields {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = IndexMap::new();
        for (label, value) in iter {
            map.insert(label, value);
        }
        Self(map)
    }
}
