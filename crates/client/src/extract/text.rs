//! Visible-text flattening for article bodies.

use scraper::{ElementRef, Node};

/// Elements whose text never reaches the reader.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "iframe", "svg"];

/// Elements that start a new line in the flattened text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure", "footer", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td",
    "th", "tr", "ul",
];

/// Flatten the visible text under `root`.
///
/// Block elements become line breaks; each line is trimmed with internal
/// whitespace collapsed, and empty lines are dropped.
pub fn visible_text(root: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect(root, &mut raw);
    normalize_lines(&raw)
}

fn collect(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                let name = element.name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = BLOCK_TAGS.contains(&name);
                if block || name == "br" {
                    out.push('\n');
                }
                collect(child_el, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Trim every line, collapse whitespace runs to one space, drop empty lines.
pub fn normalize_lines(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse all whitespace, including newlines, to single spaces.
pub fn squash(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
