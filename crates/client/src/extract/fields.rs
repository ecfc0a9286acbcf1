//! Ordered selector strategies for each article field.
//!
//! Every strategy is a pure `fn(&Html) -> Option<String>`; the first one
//! returning a non-empty value wins.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use scraper::{Html, Selector};

use super::text::{squash, visible_text};

/// One way of locating a field in a parsed page.
pub type FieldStrategy = fn(&Html) -> Option<String>;

pub const TITLE_STRATEGIES: &[FieldStrategy] =
    &[title_rich_media, title_activity_name, title_og_meta, title_document_title];

pub const AUTHOR_STRATEGIES: &[FieldStrategy] =
    &[author_js_name, author_profile_nickname, author_meta_nickname, author_meta_tag];

pub const PUBLISH_TIME_STRATEGIES: &[FieldStrategy] =
    &[publish_time_element, publish_time_meta_text, publish_time_meta_tag, publish_time_script_ct];

pub const CONTENT_STRATEGIES: &[FieldStrategy] = &[content_js_content, content_rich_media, content_body];

pub const DESCRIPTION_STRATEGIES: &[FieldStrategy] = &[description_og_meta, description_meta_tag];

/// Run `strategies` in order and return the first non-empty result.
pub fn first_match(doc: &Html, strategies: &[FieldStrategy]) -> Option<String> {
    strategies
        .iter()
        .filter_map(|strategy| strategy(doc))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("invalid selector")
}

/// Squashed text of the first element matching `css` that has any.
fn select_text(doc: &Html, css: &str) -> Option<String> {
    doc.select(&selector(css))
        .map(|el| squash(&el.text().collect::<String>()))
        .find(|text| !text.is_empty())
}

fn select_attr(doc: &Html, css: &str, attr: &str) -> Option<String> {
    doc.select(&selector(css))
        .filter_map(|el| el.value().attr(attr))
        .map(squash)
        .find(|value| !value.is_empty())
}

fn select_visible_text(doc: &Html, css: &str) -> Option<String> {
    doc.select(&selector(css))
        .map(visible_text)
        .find(|text| !text.is_empty())
}

fn title_rich_media(doc: &Html) -> Option<String> {
    select_text(doc, "h1.rich_media_title")
}

fn title_activity_name(doc: &Html) -> Option<String> {
    select_text(doc, "#activity-name")
}

fn title_og_meta(doc: &Html) -> Option<String> {
    select_attr(doc, r#"meta[property="og:title"]"#, "content")
}

fn title_document_title(doc: &Html) -> Option<String> {
    select_text(doc, "title").map(|title| strip_title_suffix(&title))
}

/// Drop a trailing site name such as ` - 微信公众平台` or ` | Site`.
pub fn strip_title_suffix(title: &str) -> String {
    [" - ", " | ", " _ ", " — "]
        .iter()
        .filter_map(|sep| title.rfind(sep))
        .max()
        .map(|idx| title[..idx].trim())
        .filter(|head| !head.is_empty())
        .unwrap_or(title.trim())
        .to_string()
}

fn author_js_name(doc: &Html) -> Option<String> {
    select_text(doc, "#js_name")
}

fn author_profile_nickname(doc: &Html) -> Option<String> {
    select_text(doc, ".profile_nickname")
}

fn author_meta_nickname(doc: &Html) -> Option<String> {
    select_text(doc, ".rich_media_meta_nickname")
}

fn author_meta_tag(doc: &Html) -> Option<String> {
    select_attr(doc, r#"meta[name="author"]"#, "content")
}

static DATE_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}\s*[-/.年]\s*\d{1,2}|\d{1,2}:\d{2}").expect("invalid date regex")
});

/// Whether `text` carries a date or a clock time; bylines share markup with the date.
pub fn looks_like_date(text: &str) -> bool {
    DATE_LIKE.is_match(text)
}

/// First element matching `css` whose text reads as a date.
fn select_date_text(doc: &Html, css: &str) -> Option<String> {
    doc.select(&selector(css))
        .map(|el| squash(&el.text().collect::<String>()))
        .find(|text| looks_like_date(text))
}

fn publish_time_element(doc: &Html) -> Option<String> {
    select_date_text(doc, "#publish_time")
}

fn publish_time_meta_text(doc: &Html) -> Option<String> {
    select_date_text(doc, "em.rich_media_meta_text")
}

fn publish_time_meta_tag(doc: &Html) -> Option<String> {
    select_attr(doc, r#"meta[property="article:published_time"]"#, "content")
}

static SCRIPT_CT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"var\s+ct\s*=\s*["']?(\d{9,11})["']?"#).expect("invalid ct regex"));

/// The article page fills `#publish_time` from an inline `var ct = "<unix seconds>"`.
fn publish_time_script_ct(doc: &Html) -> Option<String> {
    doc.select(&selector("script"))
        .find_map(|script| {
            let source = script.text().collect::<String>();
            SCRIPT_CT.captures(&source).and_then(|caps| caps[1].parse::<i64>().ok())
        })
        .and_then(format_unix_beijing)
}

/// Render unix seconds as `YYYY-MM-DD HH:MM` in UTC+8.
pub fn format_unix_beijing(secs: i64) -> Option<String> {
    let offset = FixedOffset::east_opt(8 * 3600)?;
    let time = DateTime::from_timestamp(secs, 0)?.with_timezone(&offset);
    Some(time.format("%Y-%m-%d %H:%M").to_string())
}

fn content_js_content(doc: &Html) -> Option<String> {
    select_visible_text(doc, "#js_content")
}

fn content_rich_media(doc: &Html) -> Option<String> {
    select_visible_text(doc, ".rich_media_content")
}

fn content_body(doc: &Html) -> Option<String> {
    select_visible_text(doc, "body")
}

fn description_og_meta(doc: &Html) -> Option<String> {
    select_attr(doc, r#"meta[property="og:description"]"#, "content")
}

fn description_meta_tag(doc: &Html) -> Option<String> {
    select_attr(doc, r#"meta[name="description"]"#, "content")
}
