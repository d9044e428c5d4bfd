//! The rendering pipeline.
//!
//! `render` is deterministic and total: malformed markup degrades to
//! literal text, never an error. The pipeline is normalize → baseline
//! escape → block pass → inline pass → placeholder restore.

use crate::html::escape_html;
use crate::protect::{PLACEHOLDER_DELIM, ProtectedSpans};
use crate::resolve::{LinkResolver, NullResolver};
use crate::rules::RuleFilter;
use crate::rules::block::block_pass;
use crate::rules::inline::tag_pass;

/// Result of rendering a page.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Warnings generated during rendering (unresolved links, recursion
    /// bound hits). The output is still complete; the offending constructs
    /// were left as literal text.
    pub warnings: Vec<String>,
}

/// Wiki-markup renderer.
///
/// Holds the link-resolution collaborator; the rule tables are process-wide
/// and shared read-only, so a renderer is cheap and can be used for any
/// number of pages.
///
/// # Example
///
/// ```
/// use nwiki_renderer::WikiRenderer;
///
/// let renderer = WikiRenderer::new();
/// let result = renderer.render("= Title =\n\n''bold'' text");
/// assert!(result.html.contains("<h1>Title</h1>"));
/// assert!(result.html.contains("<strong>bold</strong>"));
/// ```
pub struct WikiRenderer {
    resolver: Box<dyn LinkResolver>,
}

impl Default for WikiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl WikiRenderer {
    /// Create a renderer with the [`NullResolver`] collaborator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolver: Box::new(NullResolver),
        }
    }

    /// Create a renderer with a host-provided link resolver.
    #[must_use]
    pub fn with_resolver(resolver: Box<dyn LinkResolver>) -> Self {
        Self { resolver }
    }

    /// Render wiki markup to an HTML fragment.
    #[must_use]
    pub fn render(&self, source: &str) -> RenderResult {
        let mut pass = Pass::new(self.resolver.as_ref());

        let normalized = normalize(source);
        let escaped = escape_html(&normalized);
        let mut html = block_pass(&mut pass, &escaped);
        html = tag_pass(&mut pass, &html, RuleFilter::All, 0);

        let Pass {
            protected,
            warnings,
            ..
        } = pass;
        protected.restore(&mut html);

        tracing::debug!(
            source_len = source.len(),
            html_len = html.len(),
            warning_count = warnings.len(),
            "rendered page"
        );
        RenderResult { html, warnings }
    }
}

/// Per-call rendering state threaded through the rule passes.
///
/// Created fresh for every top-level render; nothing in it survives the
/// call.
pub(crate) struct Pass<'a> {
    pub(crate) protected: ProtectedSpans,
    pub(crate) resolver: &'a dyn LinkResolver,
    pub(crate) warnings: Vec<String>,
}

impl<'a> Pass<'a> {
    pub(crate) fn new(resolver: &'a dyn LinkResolver) -> Self {
        Self {
            protected: ProtectedSpans::new(),
            resolver,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// Normalize line endings and strip characters reserved for placeholder
/// tokens, so user input can never forge one.
fn normalize(source: &str) -> String {
    source
        .chars()
        .filter(|&c| c != '\r' && c != PLACEHOLDER_DELIM)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::resolve::{ResolveError, ResolvedLink};

    fn render(source: &str) -> String {
        WikiRenderer::new().render(source).html
    }

    #[test]
    fn test_literal_passthrough() {
        assert_eq!(render("plain text, nothing special"), "plain text, nothing special");
    }

    #[test]
    fn test_passthrough_applies_baseline_escaping() {
        assert_eq!(render(r#"a < b & c > "d""#), "a &lt; b &amp; c &gt; &quot;d&quot;");
    }

    #[test]
    fn test_header() {
        assert_eq!(render("= Title ="), "<h1>Title</h1>\n");
    }

    #[test]
    fn test_header_marker_mismatch_unchanged() {
        assert_eq!(render("== Title ="), "== Title =");
    }

    #[test]
    fn test_bold_italic_nesting() {
        assert_eq!(
            render("'''''bold italic'''''"),
            "<em><strong>bold italic</strong></em>"
        );
        assert_eq!(render("''plain bold''"), "<strong>plain bold</strong>");
    }

    #[test]
    fn test_protection_round_trip() {
        // A link label made of rule tokens must come through verbatim,
        // with no rule applied to it.
        assert_eq!(
            render("[[page|''not bold'']]"),
            r#"<a href="page" class="nwiki-new">''not bold''</a>"#
        );
    }

    #[test]
    fn test_table_structure() {
        let html = render("{|\n! H1 !! H2\n|-\n| a || b\n|}");
        assert_eq!(html.matches("<tr>").count(), 2);
        assert_eq!(html.matches("<th>").count(), 2);
        assert_eq!(html.matches("<td>").count(), 2);
    }

    #[test]
    fn test_attach_dispatch() {
        assert!(render("[[attach:photo.png|My Photo]]").starts_with("<img "));
        assert_eq!(
            render("[[attach:report.pdf|Report]]"),
            r#"<a href="report.pdf" class="nwiki-attachment">Report</a>"#
        );
    }

    #[test]
    fn test_determinism() {
        let source = "= T =\n\n''a'' '''b''' [[p|l]] http://x.example/y\n\n* 1\n* 2\n\n";
        assert_eq!(render(source), render(source));
    }

    #[test]
    fn test_crlf_normalized() {
        assert_eq!(render("= Title =\r\n"), render("= Title =\n"));
    }

    #[test]
    fn test_placeholder_delimiter_stripped_from_input() {
        // Input that tries to forge a protection token renders harmlessly.
        let forged = "\u{7}0\u{7} and [[page|label]]";
        let html = render(forged);
        assert!(html.starts_with("0 and "));
        assert!(html.contains(">label</a>"));
    }

    #[test]
    fn test_nowiki_block_round_trip() {
        assert_eq!(
            render("<nowiki>= not a header =</nowiki>"),
            "<pre>= not a header =</pre>\n"
        );
    }

    #[test]
    fn test_inline_nowiki_round_trip() {
        assert_eq!(render("a <nowiki>''b''</nowiki> c"), "a ''b'' c");
    }

    #[test]
    fn test_description_list_runs_inline_grammar() {
        assert_eq!(
            render("''term'':description;\n"),
            "<dl><dt><strong>term</strong></dt><dd>description</dd></dl>\n"
        );
    }

    #[test]
    fn test_full_page() {
        let source = "= Welcome =\n\nIntro with ''bold'' text.\n\n* item one\n* item two\n\n----\n";
        let html = render(source);
        assert!(html.contains("<h1>Welcome</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<li>item one</li>"));
        assert!(html.contains("<hr />"));
    }

    /// Resolver backed by a fixed set of existing pages.
    struct PageSet(HashMap<String, String>);

    impl LinkResolver for PageSet {
        fn resolve_page(&self, target: &str) -> Result<ResolvedLink, ResolveError> {
            match self.0.get(target) {
                Some(url) => Ok(ResolvedLink {
                    url: url.clone(),
                    exists: true,
                }),
                None => Ok(ResolvedLink {
                    url: format!("/create/{target}"),
                    exists: false,
                }),
            }
        }

        fn attachment_path(&self, path: &str) -> Result<String, ResolveError> {
            Ok(format!("/files/{path}"))
        }
    }

    #[test]
    fn test_resolver_drives_link_emission() {
        let mut pages = HashMap::new();
        pages.insert("Home".to_owned(), "/wiki/home".to_owned());
        let renderer = WikiRenderer::with_resolver(Box::new(PageSet(pages)));

        assert_eq!(
            renderer.render("[[Home]]").html,
            r#"<a href="/wiki/home">Home</a>"#
        );
        assert_eq!(
            renderer.render("[[Missing]]").html,
            r#"<a href="/create/Missing" class="nwiki-new">Missing</a>"#
        );
        assert_eq!(
            renderer.render("[[attach:report.pdf|Report]]").html,
            r#"<a href="/files/report.pdf" class="nwiki-attachment">Report</a>"#
        );
    }

    #[test]
    fn test_no_warnings_on_clean_input() {
        let result = WikiRenderer::new().render("= T =\n\nbody\n\n");
        assert!(result.warnings.is_empty());
    }
}
