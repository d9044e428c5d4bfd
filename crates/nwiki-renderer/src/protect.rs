//! Protection of literal text against further rule interpretation.
//!
//! Handlers exchange already-final text (attribute values, visible link text,
//! nowiki content) for opaque placeholder tokens. The tokens pass through
//! every later rule pass untouched and are substituted back in one final pass
//! over the assembled output.

/// Reserved delimiter for placeholder tokens.
///
/// Stripped from the source during normalization, so user input can never
/// forge a token, and never produced by any emission helper.
pub(crate) const PLACEHOLDER_DELIM: char = '\u{7}';

/// Arena of protected spans, local to a single rendering call.
///
/// Grows monotonically during the rule passes and is fully resolved by
/// [`restore`](Self::restore) before the call returns.
#[derive(Debug, Default)]
pub(crate) struct ProtectedSpans {
    items: Vec<String>,
}

impl ProtectedSpans {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record `literal` and return the opaque token standing in for it.
    ///
    /// The token is unique within this arena and cannot match any rule
    /// pattern, so the literal survives all subsequent passes verbatim.
    pub(crate) fn protect(&mut self, literal: impl Into<String>) -> String {
        let token = Self::token(self.items.len());
        self.items.push(literal.into());
        token
    }

    fn token(index: usize) -> String {
        format!("{PLACEHOLDER_DELIM}{index}{PLACEHOLDER_DELIM}")
    }

    /// Substitute every token back into `html`, consuming the arena.
    ///
    /// A literal protected late in a pass may itself contain an earlier
    /// token (an inline nowiki span swallowing an already-emitted anchor),
    /// so restoration runs newest-first: outer literals are spliced in
    /// before the tokens they carry are resolved.
    pub(crate) fn restore(self, html: &mut String) {
        for (index, literal) in self.items.into_iter().enumerate().rev() {
            let token = Self::token(index);
            if html.contains(&token) {
                *html = html.replace(&token, &literal);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protect_returns_distinct_tokens() {
        let mut spans = ProtectedSpans::new();
        let a = spans.protect("one");
        let b = spans.protect("two");
        assert_ne!(a, b);
        assert!(a.contains(PLACEHOLDER_DELIM));
    }

    #[test]
    fn test_restore_round_trip() {
        let mut spans = ProtectedSpans::new();
        let token = spans.protect("''not bold''");
        let mut html = format!("<a>{token}</a>");
        spans.restore(&mut html);
        assert_eq!(html, "<a>''not bold''</a>");
    }

    #[test]
    fn test_restore_multiple_occurrences() {
        let mut spans = ProtectedSpans::new();
        let token = spans.protect("http://example.com");
        let mut html = format!(r#"<a href="{token}">{token}</a>"#);
        spans.restore(&mut html);
        assert_eq!(
            html,
            r#"<a href="http://example.com">http://example.com</a>"#
        );
    }

    #[test]
    fn test_restore_nested_tokens_newest_first() {
        let mut spans = ProtectedSpans::new();
        let inner = spans.protect("inner");
        let outer = spans.protect(format!("<a>{inner}</a>"));
        let mut html = format!("before {outer} after");
        spans.restore(&mut html);
        assert_eq!(html, "before <a>inner</a> after");
    }
}
