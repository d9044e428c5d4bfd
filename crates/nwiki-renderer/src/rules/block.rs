//! Block pass: top-to-bottom expansion of block-level constructs.
//!
//! For each rule in priority order, the pass repeatedly finds the leftmost
//! match in the remaining text, splices in the handler's replacement, and
//! continues scanning after it — a rule never re-scans its own output, which
//! bounds the total work. A handler may decline a malformed construct, which
//! leaves the matched text verbatim.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::html;
use crate::renderer::Pass;
use crate::rules::inline::tag_pass;
use crate::rules::{BLOCK_RULES, BlockRule, BlockRuleName, RuleFilter, list, table};

static DESC_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?P<term>[^\n]+?):(?P<desc>[^\n]+?);$").unwrap());

// Block-level elements emitted by earlier rules; a paragraph starting with
// one of these is left alone so generated blocks are never re-wrapped.
static BLOCK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^</?(?:h[1-6]|pre|table|tbody|thead|tr|th|td|ul|li|ol|hr|p|dl|dt|dd)[\s/>]")
        .unwrap()
});

/// Run every block rule, in order, over `text`.
pub(crate) fn block_pass(pass: &mut Pass<'_>, text: &str) -> String {
    let mut work = text.to_owned();
    for rule in BLOCK_RULES {
        work = apply_block_rule(pass, rule, &work);
    }
    work
}

fn apply_block_rule(pass: &mut Pass<'_>, rule: &BlockRule, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(caps) = rule.pattern.captures(rest) {
        let Some(full) = caps.get(0) else { break };
        out.push_str(&rest[..full.start()]);
        match dispatch_block(pass, rule, &caps) {
            Some(replacement) => {
                out.push_str(&replacement);
                rest = &rest[full.end()..];
            }
            None => {
                tracing::debug!(rule = ?rule.name, "malformed construct left as literal text");
                // Only the offending first line is final; a multi-line
                // match is rescanned from its second line so trailing
                // content is not swallowed with it.
                let source = full.as_str();
                let line_end = source.find('\n').map_or(source.len(), |pos| pos + 1);
                out.push_str(&source[..line_end]);
                rest = &rest[full.start() + line_end..];
            }
        }
        if full.is_empty() {
            // A zero-width match cannot advance the cursor; bail out
            // rather than loop. No declared pattern matches empty text.
            break;
        }
    }

    out.push_str(rest);
    out
}

fn dispatch_block(pass: &mut Pass<'_>, rule: &BlockRule, caps: &Captures<'_>) -> Option<String> {
    match rule.name {
        BlockRuleName::Nowiki => Some(nowiki_block(pass, caps)),
        BlockRuleName::Header => header_block(caps),
        BlockRuleName::LineBreak => Some("<hr />\n".to_owned()),
        BlockRuleName::DescList => Some(desc_list_block(pass, caps)),
        BlockRuleName::Table => Some(table_block(caps)),
        BlockRuleName::TabParagraph => Some(tab_paragraph_block(caps)),
        BlockRuleName::List => Some(list_block(caps)),
        BlockRuleName::Paragraph => paragraph_block(rule, caps),
    }
}

fn capture<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}

/// Captured groups of a header match.
struct HeaderMatch<'t> {
    marker_open: &'t str,
    title: &'t str,
    marker_close: &'t str,
}

impl<'t> HeaderMatch<'t> {
    fn new(caps: &Captures<'t>) -> Self {
        Self {
            marker_open: capture(caps, "open"),
            title: capture(caps, "title"),
            marker_close: capture(caps, "close"),
        }
    }
}

fn nowiki_block(pass: &mut Pass<'_>, caps: &Captures<'_>) -> String {
    let content = pass.protected.protect(capture(caps, "content"));
    let mut pre = html::element("pre", &content, &[]);
    pre.push('\n');
    pre
}

/// Opening and closing marker runs must match in length, otherwise the
/// construct is rejected. The run length is the header level.
fn header_block(caps: &Captures<'_>) -> Option<String> {
    let m = HeaderMatch::new(caps);
    if m.marker_open.len() != m.marker_close.len() {
        return None;
    }
    Some(html::header(m.marker_open.len(), m.title.trim()))
}

/// Collect consecutive `term:description;` lines into one `<dl>`.
///
/// Term and description are each re-run through the full inline grammar
/// before wrapping.
fn desc_list_block(pass: &mut Pass<'_>, caps: &Captures<'_>) -> String {
    let Some(block) = caps.get(0) else {
        return String::new();
    };
    let mut items = String::new();
    for item in DESC_ITEM_RE.captures_iter(block.as_str()) {
        let term = tag_pass(pass, capture(&item, "term"), RuleFilter::All, 1);
        let desc = tag_pass(pass, capture(&item, "desc"), RuleFilter::All, 1);
        items.push_str(&html::element("dt", &term, &[]));
        items.push_str(&html::element("dd", &desc, &[]));
    }
    let mut dl = html::element("dl", &items, &[]);
    dl.push('\n');
    dl
}

fn table_block(caps: &Captures<'_>) -> String {
    let rows = table::split_rows(capture(caps, "body"));
    html::table(&rows)
}

/// The colon-run length nominally nests the paragraph, but only the
/// innermost wrap is observable, so a single wrap is emitted for any depth.
fn tab_paragraph_block(caps: &Captures<'_>) -> String {
    let mut p = html::element(
        "p",
        capture(caps, "text"),
        &[("class", "nwiki-tab-paragraph")],
    );
    p.push('\n');
    p
}

fn list_block(caps: &Captures<'_>) -> String {
    list::build_list(capture(caps, "items"))
}

fn paragraph_block(rule: &BlockRule, caps: &Captures<'_>) -> Option<String> {
    let text = capture(caps, "text");
    if BLOCK_TAG_RE.is_match(text) {
        return None;
    }
    let tag = rule.tag.unwrap_or("p");
    let mut p = html::element(tag, text, &[]);
    p.push('\n');
    Some(p)
}
