//! Small structural queries over a parsed `scraper::Html` tree.
//!
//! Every extraction in [`crate::listing`] and [`crate::detail`] is composed
//! from these helpers so that a missing element always surfaces as `None`
//! instead of a panic.

use std::sync::LazyLock;

use lincsfsd_core::LabelledFields;
use scraper::{ElementRef, Selector};

pub(crate) static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
pub(crate) static ANCHOR_WITH_HREF: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
pub(crate) static DEFINITION_TERM: LazyLock<Selector> = LazyLock::new(|| selector("dt"));
pub(crate) static DEFINITION_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| selector("dd"));

/// Compiles a selector literal. Only called with constant CSS, so a parse
/// failure is a programming error.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

/// Text content of `element` with whitespace runs collapsed and ends trimmed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First descendant of `scope` matching `selector`, in document order.
pub(crate) fn first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// Normalized text of the first descendant matching `selector`.
pub(crate) fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    first(scope, selector).map(element_text)
}

pub(crate) fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element.value().attr(name).map(|v| v.trim().to_owned())
}

/// Pairs label elements with value elements by position: first label with
/// first value, second with second, and so on. Extra labels or values on
/// either side are dropped.
pub(crate) fn label_value_pairs(
    scope: ElementRef<'_>,
    label: &Selector,
    value: &Selector,
) -> Vec<(String, String)> {
    scope
        .select(label)
        .zip(scope.select(value))
        .map(|(l, v)| (element_text(l), element_text(v)))
        .collect()
}

/// `dt`/`dd` pairs of `scope` collected into an ordered mapping.
pub(crate) fn pair_labels_and_values(scope: ElementRef<'_>) -> LabelledFields {
    label_value_pairs(scope, &DEFINITION_TERM, &DEFINITION_DESCRIPTION)
        .into_iter()
        .collect()
}
