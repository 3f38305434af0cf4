//! Feed item normalizer.
//!
//! Converts a [`RawItem`] into the canonical headline record. Every field has
//! a documented fallback, so a single ragged item never escalates beyond
//! itself:
//!
//! - missing title → literal `"No title"`
//! - missing description → literal `"No description"`; markup is stripped to
//!   plain text and the result truncated to exactly 500 characters
//! - missing link → guid, then empty string (an unidentifiable item; it will
//!   collide on dedup, which is the documented behavior rather than a special
//!   case)
//! - missing media image → first `<img src>` embedded in the description
//!   markup, then none
//! - missing/unparseable publish date → the scrape wall-clock time

use chrono::{DateTime, Utc};
use scraper::{Html, Selector};

use super::fetch::RawItem;

/// Descriptions are truncated to this many characters, counted per `char`,
/// not at word boundaries.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Canonical headline record, ready for classification and persistence.
#[derive(Debug, Clone)]
pub struct NormalizedItem {
    pub title: String,
    /// Plain text, at most [`MAX_DESCRIPTION_CHARS`] characters.
    pub description: String,
    /// Dedup key. Empty when the item carried neither link nor guid.
    pub url: String,
    pub image_url: Option<String>,
    pub publish_date: DateTime<Utc>,
}

/// Normalize one raw feed item.
///
/// `now` is the scrape wall-clock instant, injected by the caller so the
/// date fallback is testable.
pub fn normalize(raw: RawItem, now: DateTime<Utc>) -> NormalizedItem {
    let title = raw.title.unwrap_or_else(|| "No title".to_string());

    let description_html = raw
        .description_html
        .unwrap_or_else(|| "No description".to_string());

    let description: String = strip_markup(&description_html)
        .chars()
        .take(MAX_DESCRIPTION_CHARS)
        .collect();

    let image_url = raw
        .media_image_url
        .or_else(|| first_image_src(&description_html));

    let url = raw.link.or(raw.guid).unwrap_or_default();

    NormalizedItem {
        title,
        description,
        url,
        image_url,
        publish_date: raw.published.unwrap_or(now),
    }
}

/// Strip HTML markup, keeping text content only.
fn strip_markup(html: &str) -> String {
    Html::parse_fragment(html).root_element().text().collect()
}

/// Find the first embedded image reference in description markup.
fn first_image_src(html: &str) -> Option<String> {
    // Static selector, cannot fail to parse.
    let selector = Selector::parse("img[src]").unwrap();
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&selector)
        .find_map(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
        .map(str::to_string)
}

// ============================================================================
// Tests
// ============================================================================
