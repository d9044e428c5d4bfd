//! Inline ("tag") pass: expansion of constructs within linearized text.
//!
//! The pass is invoked on the whole block-pass output, and recursively by
//! handlers that re-process their own captures — the description-list
//! handler re-runs the full grammar over terms and descriptions, and the
//! italic handler re-runs only the bold rule over its inner text. An
//! explicit [`RuleFilter`] scopes each invocation; a depth counter bounds
//! recursion defensively even though the declared grammar only recurses
//! one level.

use regex::Captures;

use crate::html::{self, Align};
use crate::renderer::Pass;
use crate::rules::{RuleFilter, TAG_RULES, TagRule, TagRuleName};

/// Hard bound on inline-pass recursion.
pub(crate) const MAX_TAG_DEPTH: usize = 8;

/// File extensions rendered as images by the attach rule.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tif"];

/// Result of one tag-rule handler.
enum TagOutput {
    /// Final HTML, spliced verbatim.
    Html(String),
    /// Text and attributes to be wrapped in the rule's declared tag.
    Fragment(String, Vec<(&'static str, String)>),
    /// Handler declined; the source text stays literal.
    Skip,
}

/// Apply every eligible tag rule, in order, to `text`.
pub(crate) fn tag_pass(pass: &mut Pass<'_>, text: &str, filter: RuleFilter, depth: usize) -> String {
    if depth > MAX_TAG_DEPTH {
        tracing::warn!(depth, "inline rule recursion bound reached");
        pass.warn(format!(
            "inline rule recursion bound ({MAX_TAG_DEPTH}) reached; text left unprocessed"
        ));
        return text.to_owned();
    }

    let mut work = text.to_owned();
    for rule in TAG_RULES {
        if !filter.allows(rule.name) {
            continue;
        }
        work = apply_tag_rule(pass, rule, &work, depth);
    }
    work
}

fn apply_tag_rule(pass: &mut Pass<'_>, rule: &TagRule, text: &str, depth: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(caps) = rule.pattern.captures(rest) {
        let Some(full) = caps.get(0) else { break };
        out.push_str(&rest[..full.start()]);
        match dispatch_tag(pass, rule, &caps, depth) {
            TagOutput::Html(html) => out.push_str(&html),
            TagOutput::Fragment(content, attrs) => {
                let attrs: Vec<(&str, &str)> =
                    attrs.iter().map(|(k, v)| (*k, v.as_str())).collect();
                match rule.tag {
                    Some(tag) => out.push_str(&html::element(tag, &content, &attrs)),
                    None => out.push_str(&content),
                }
            }
            TagOutput::Skip => {
                tracing::debug!(rule = ?rule.name, "tag rule declined, leaving literal text");
                // The declined source is protected so no later rule can
                // reinterpret pieces of it (a declined `[[x]]` would
                // otherwise still match the bracketed-url rule).
                out.push_str(&pass.protected.protect(full.as_str()));
            }
        }
        rest = &rest[full.end()..];
        if full.is_empty() {
            break;
        }
    }

    out.push_str(rest);
    out
}

fn dispatch_tag(
    pass: &mut Pass<'_>,
    rule: &TagRule,
    caps: &Captures<'_>,
    depth: usize,
) -> TagOutput {
    match rule.name {
        TagRuleName::Nowiki => TagOutput::Html(pass.protected.protect(capture(caps, "content"))),
        TagRuleName::Image => image_tag(pass, caps),
        TagRuleName::Attach => attach_tag(pass, capture(caps, "args")),
        TagRuleName::Link => link_tag(pass, capture(caps, "target")),
        TagRuleName::UrlTag => url_tag_tag(pass, capture(caps, "body")),
        TagRuleName::Url => url_tag(pass, capture(caps, "url")),
        TagRuleName::Italic => italic_tag(pass, caps, depth),
        // Default handler: wrap the capture in the rule's declared tag.
        TagRuleName::Bold => TagOutput::Fragment(capture(caps, "text").to_owned(), Vec::new()),
    }
}

fn capture<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}

fn image_tag(pass: &mut Pass<'_>, caps: &Captures<'_>) -> TagOutput {
    let src = pass.protected.protect(capture(caps, "src"));
    let alt = pass.protected.protect(capture(caps, "alt"));
    TagOutput::Html(html::image(&src, &alt, None))
}

/// `[[attach:PATH|LABEL]]`, optionally `[[attach:PATH|ALIGN|LABEL]]`.
///
/// Image extensions render as an image with an alignment class; anything
/// else resolves the path and renders as an attachment anchor.
fn attach_tag(pass: &mut Pass<'_>, args: &str) -> TagOutput {
    let mut parts = args.split('|');
    let path = parts.next().unwrap_or_default();
    let label = parts.next().filter(|l| !l.is_empty());
    let third = parts.next();

    let extension = path
        .rfind('.')
        .map(|dot| path[dot + 1..].to_ascii_lowercase());
    let is_image = extension.is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));

    if is_image {
        // With three segments the middle one is the alignment keyword.
        let (align, label) = match third {
            Some(third) => (Align::parse(label.unwrap_or_default()), third),
            None => (Align::default(), label.unwrap_or(path)),
        };
        let src = pass.protected.protect(path);
        let alt = pass.protected.protect(label);
        return TagOutput::Html(html::image(&src, &alt, Some(align)));
    }

    match pass.resolver.attachment_path(path) {
        Ok(resolved) => {
            let href = pass.protected.protect(resolved);
            let text = pass.protected.protect(label.unwrap_or(path));
            TagOutput::Html(html::anchor(&href, &text, Some("nwiki-attachment")))
        }
        Err(error) => {
            tracing::debug!(path = %path, error = %error, "attachment path unresolved");
            pass.warn(format!("unresolved attachment path: {path}"));
            TagOutput::Skip
        }
    }
}

/// `[[TARGET]]` or `[[TARGET|LABEL]]`: resolve a wiki page link.
fn link_tag(pass: &mut Pass<'_>, target: &str) -> TagOutput {
    let (page, label) = match target.split_once('|') {
        Some((page, label)) => (page, label),
        None => (target, target),
    };
    match pass.resolver.resolve_page(page.trim()) {
        Ok(link) => {
            let class = if link.exists { None } else { Some("nwiki-new") };
            let href = pass.protected.protect(link.url);
            let text = pass.protected.protect(label);
            TagOutput::Html(html::anchor(&href, &text, class))
        }
        Err(error) => {
            tracing::debug!(target = %page, error = %error, "link target unresolved");
            pass.warn(format!("unresolved link target: {page}"));
            TagOutput::Skip
        }
    }
}

/// `[TARGET|TEXT]`, `[TARGET TEXT]` or `[TARGET]`; the pipe split takes
/// precedence over the whitespace split.
fn url_tag_tag(pass: &mut Pass<'_>, body: &str) -> TagOutput {
    let body = body.trim();
    let (link, text) = body
        .split_once('|')
        .or_else(|| body.split_once(' '))
        .unwrap_or((body, body));
    let href = pass.protected.protect(link);
    let text = pass.protected.protect(text);
    TagOutput::Fragment(text, vec![("href", href)])
}

/// Bare `scheme://` autolink; the URL doubles as the display text.
fn url_tag(pass: &mut Pass<'_>, url: &str) -> TagOutput {
    let token = pass.protected.protect(url);
    TagOutput::Fragment(token.clone(), vec![("href", token)])
}

/// Captured groups of an italic match.
struct ItalicMatch<'t> {
    text: &'t str,
    closer: &'t str,
}

/// `'''text'''`, or `'''''text'''''` for italic plus bold.
///
/// A five-quote closer means the trailing `''` belongs to the content. The
/// inner text is re-run with only the bold rule eligible, and any residual
/// `''` is protected so a later pass cannot mistake it for a bold marker.
fn italic_tag(pass: &mut Pass<'_>, caps: &Captures<'_>, depth: usize) -> TagOutput {
    let m = ItalicMatch {
        text: capture(caps, "text"),
        closer: capture(caps, "close"),
    };
    let mut text = m.text.to_owned();
    if m.closer.len() == 5 {
        // The extra two quotes belong to the content as a bold opener;
        // re-emit them with the bold rule's source token.
        text.push_str(bold_source_token());
    }

    let mut inner = tag_pass(
        pass,
        &text,
        RuleFilter::Only(&[TagRuleName::Bold]),
        depth + 1,
    );
    let marker = bold_source_token();
    if inner.contains(marker) {
        let token = pass.protected.protect(marker);
        inner = inner.replace(marker, &token);
    }
    TagOutput::Fragment(inner, Vec::new())
}

/// Source-syntax marker for bold, taken from the rule table.
fn bold_source_token() -> &'static str {
    TAG_RULES
        .iter()
        .find(|r| r.name == TagRuleName::Bold)
        .and_then(|r| r.token)
        .map_or("''", |(open, _)| open)
}
