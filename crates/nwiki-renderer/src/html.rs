//! HTML emission helpers.
//!
//! Pure functions building well-formed elements from already-processed
//! pieces. Callers are responsible for escaping or protecting content and
//! attribute values before emission; nothing here escapes twice.

use std::borrow::Cow;
use std::fmt::Write;

use crate::rules::table::CellKind;

/// Escape `& < > "` into HTML entities.
///
/// This is the baseline escaping policy: it is applied exactly once, to the
/// whole source text, before any rule pass runs.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Horizontal alignment for attached images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Align {
    #[default]
    Left,
    Right,
    Center,
}

impl Align {
    /// Parse an alignment keyword; anything unrecognized is `Left`.
    pub(crate) fn parse(keyword: &str) -> Self {
        match keyword.to_ascii_lowercase().as_str() {
            "right" => Self::Right,
            "center" => Self::Center,
            _ => Self::Left,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
        }
    }
}

/// Build an element with the given attributes around `content`.
pub(crate) fn element(tag: &str, content: &str, attrs: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(content.len() + tag.len() * 2 + 16);
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        write!(out, r#" {name}="{value}""#).unwrap();
    }
    out.push('>');
    out.push_str(content);
    write!(out, "</{tag}>").unwrap();
    out
}

/// Build a header element at the given level (1-6).
pub(crate) fn header(level: usize, title: &str) -> String {
    format!("<h{level}>{title}</h{level}>\n")
}

/// Build a table from a row-major grid of typed cells.
pub(crate) fn table(rows: &[Vec<(CellKind, String)>]) -> String {
    let mut out = String::from(r#"<table class="nwiki-table"><tbody>"#);
    for row in rows {
        out.push_str("<tr>");
        for (kind, text) in row {
            let tag = match kind {
                CellKind::Header => "th",
                CellKind::Normal => "td",
            };
            write!(out, "<{tag}>{text}</{tag}>").unwrap();
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>\n");
    out
}

/// Build an image element; the alignment class is emitted only for attached
/// images, which always carry one.
pub(crate) fn image(src: &str, alt: &str, align: Option<Align>) -> String {
    match align {
        Some(align) => format!(
            r#"<img src="{src}" alt="{alt}" class="nwiki-image-{}" />"#,
            align.as_str()
        ),
        None => format!(r#"<img src="{src}" alt="{alt}" />"#),
    }
}

/// Build an anchor; display text falls back to the target when empty.
pub(crate) fn anchor(href: &str, text: &str, class: Option<&str>) -> String {
    let text = if text.is_empty() { href } else { text };
    match class {
        Some(class) => element("a", text, &[("href", href), ("class", class)]),
        None => element("a", text, &[("href", href)]),
    }
}
