//! Nested bullet and numbered list assembly.
//!
//! A list block is a run of consecutive lines whose markers are `*`
//! (bullet) or `#` (numbered), up to five deep. The marker run length is
//! the nesting depth; the marker character at each depth decides the list
//! type opened at that level.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::html;

static ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?P<markers>[*#]{1,5})[ \t]*(?P<text>.+)$").unwrap()
});

/// Assemble the lines of a matched list block into nested `<ul>`/`<ol>`.
pub(crate) fn build_list(block: &str) -> String {
    let mut out = String::with_capacity(block.len() + 32);
    let mut open: Vec<&'static str> = Vec::new();

    for line in block.lines() {
        let Some(caps) = ITEM_RE.captures(line) else {
            continue;
        };
        let markers = caps.name("markers").map_or("", |m| m.as_str());
        let text = caps.name("text").map_or("", |m| m.as_str()).trim();
        let depth = markers.len();

        while open.len() > depth {
            close_list(&mut out, &mut open);
        }
        // Same depth but the marker switched type: close and reopen.
        if open.len() == depth && open.last() != Some(&list_tag(markers, depth - 1)) {
            close_list(&mut out, &mut open);
        }
        while open.len() < depth {
            let tag = list_tag(markers, open.len());
            write!(out, "<{tag}>").unwrap();
            open.push(tag);
        }
        out.push_str(&html::element("li", text, &[]));
    }

    while !open.is_empty() {
        close_list(&mut out, &mut open);
    }
    out.push('\n');
    out
}

/// List type for the level at `index`, decided by the marker character.
fn list_tag(markers: &str, index: usize) -> &'static str {
    if markers.as_bytes().get(index) == Some(&b'#') {
        "ol"
    } else {
        "ul"
    }
}

fn close_list(out: &mut String, open: &mut Vec<&'static str>) {
    if let Some(tag) = open.pop() {
        write!(out, "</{tag}>").unwrap();
    }
}
