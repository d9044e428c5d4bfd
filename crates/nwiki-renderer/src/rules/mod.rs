//! The rule tables: the ordered, immutable catalogue of recognized
//! constructs.
//!
//! Two tables drive the renderer: block rules, matched against the full
//! page text, and tag rules, matched within already-linearized text.
//! Order within a table is significant — earlier rules shadow later ones
//! (`nowiki` must run before `link`, `table` before `paragraph`). Patterns
//! are compiled once per process and shared read-only across calls.
//!
//! Patterns are written against *escaped* text: the baseline escaping
//! policy runs before any rule, so the nowiki token is matched in its
//! entity form (`&lt;nowiki&gt;`).

pub(crate) mod block;
pub(crate) mod inline;
pub(crate) mod list;
pub(crate) mod table;

use std::sync::LazyLock;

use regex::Regex;

/// Identity of a block rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BlockRuleName {
    Nowiki,
    Header,
    LineBreak,
    DescList,
    Table,
    TabParagraph,
    List,
    Paragraph,
}

/// Identity of an inline ("tag") rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TagRuleName {
    Nowiki,
    Image,
    Attach,
    Link,
    UrlTag,
    Url,
    Italic,
    Bold,
}

/// Restriction on which tag rules a pass may apply.
///
/// `All` is its own explicit variant; a restricted pass never applies a
/// rule outside the allow-list, even when its pattern would match.
#[derive(Clone, Copy, Debug)]
pub(crate) enum RuleFilter {
    All,
    Only(&'static [TagRuleName]),
}

impl RuleFilter {
    pub(crate) fn allows(self, name: TagRuleName) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.contains(&name),
        }
    }
}

/// A block-level rule declaration.
pub(crate) struct BlockRule {
    pub(crate) name: BlockRuleName,
    pub(crate) pattern: &'static LazyLock<Regex>,
    /// Wrap tag applied by the default handler.
    pub(crate) tag: Option<&'static str>,
}

/// An inline rule declaration.
pub(crate) struct TagRule {
    pub(crate) name: TagRuleName,
    pub(crate) pattern: &'static LazyLock<Regex>,
    /// Wrap tag applied to fragment output.
    pub(crate) tag: Option<&'static str>,
    /// Source-syntax markers, for handlers that re-emit markup around
    /// partially-processed content.
    pub(crate) token: Option<(&'static str, &'static str)>,
}

static BLOCK_NOWIKI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ims)^&lt;nowiki&gt;(?P<content>.*?)&lt;/nowiki&gt;").unwrap()
});
static BLOCK_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^ *(?P<open>={1,6}) *(?P<title>.+?)(?P<close>={1,6}) *$").unwrap()
});
static BLOCK_LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^-{3,4}[ \t]*$").unwrap());
static BLOCK_DESC_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(?:^[^\n]+?:[^\n]+?;(?:\n|\z))+").unwrap());
static BLOCK_TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\|(?P<body>.+?)\|\}").unwrap());
static BLOCK_TAB_PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?P<colons>:+)(?P<text>.+)$").unwrap());
static BLOCK_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?P<items>(?:[ \t]*[*#]{1,5}[ \t]*[^\n]+\n?)+)").unwrap());
static BLOCK_PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)^[ \t]*(?P<text>\S.*?)\n[ \t]*\n").unwrap());

/// Block rules in priority order.
pub(crate) static BLOCK_RULES: &[BlockRule] = &[
    BlockRule {
        name: BlockRuleName::Nowiki,
        pattern: &BLOCK_NOWIKI_RE,
        tag: None,
    },
    BlockRule {
        name: BlockRuleName::Header,
        pattern: &BLOCK_HEADER_RE,
        tag: None,
    },
    BlockRule {
        name: BlockRuleName::LineBreak,
        pattern: &BLOCK_LINE_BREAK_RE,
        tag: None,
    },
    BlockRule {
        name: BlockRuleName::DescList,
        pattern: &BLOCK_DESC_LIST_RE,
        tag: Some("dl"),
    },
    BlockRule {
        name: BlockRuleName::Table,
        pattern: &BLOCK_TABLE_RE,
        tag: None,
    },
    BlockRule {
        name: BlockRuleName::TabParagraph,
        pattern: &BLOCK_TAB_PARAGRAPH_RE,
        tag: Some("p"),
    },
    BlockRule {
        name: BlockRuleName::List,
        pattern: &BLOCK_LIST_RE,
        tag: None,
    },
    BlockRule {
        name: BlockRuleName::Paragraph,
        pattern: &BLOCK_PARAGRAPH_RE,
        tag: Some("p"),
    },
];

static TAG_NOWIKI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)&lt;nowiki&gt;(?P<content>.*?)&lt;/nowiki&gt;").unwrap());
static TAG_IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[\[image:(?P<src>.+?)\|(?P<alt>.+?)\]\]").unwrap());
static TAG_ATTACH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[\[attach:(?P<args>.+?)\]\]").unwrap());
static TAG_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[\[(?P<target>.+?)\]\]").unwrap());
static TAG_URL_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[(?P<body>.+?)\]").unwrap());
// The original grammar used a lookbehind here to skip URLs already inside a
// serialized attribute. Attribute values are protection placeholders by the
// time this rule runs, so excluding `< > "` and the placeholder delimiter
// from the character class is sufficient.
static TAG_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?P<url>(?:https?|ftp)://[^\s<>"\x07]*[^\s<>"\x07,.?!:;'])"#).unwrap()
});
static TAG_ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)'{3}(?P<text>.+?)(?P<close>'{3}(?:'{2})?)").unwrap());
static TAG_BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)'{2}(?P<text>.+?)'{2}").unwrap());

/// Tag rules in priority order.
pub(crate) static TAG_RULES: &[TagRule] = &[
    TagRule {
        name: TagRuleName::Nowiki,
        pattern: &TAG_NOWIKI_RE,
        tag: None,
        token: Some(("<nowiki>", "</nowiki>")),
    },
    TagRule {
        name: TagRuleName::Image,
        pattern: &TAG_IMAGE_RE,
        tag: None,
        token: Some(("[[image:", "|alt]]")),
    },
    TagRule {
        name: TagRuleName::Attach,
        pattern: &TAG_ATTACH_RE,
        tag: None,
        token: Some(("[[attach:", "|name]]")),
    },
    TagRule {
        name: TagRuleName::Link,
        pattern: &TAG_LINK_RE,
        tag: Some("a"),
        token: Some(("[[", "]]")),
    },
    TagRule {
        name: TagRuleName::UrlTag,
        pattern: &TAG_URL_TAG_RE,
        tag: Some("a"),
        token: Some(("[", "]")),
    },
    TagRule {
        name: TagRuleName::Url,
        pattern: &TAG_URL_RE,
        tag: Some("a"),
        token: None,
    },
    TagRule {
        name: TagRuleName::Italic,
        pattern: &TAG_ITALIC_RE,
        tag: Some("em"),
        token: Some(("'''", "'''")),
    },
    TagRule {
        name: TagRuleName::Bold,
        pattern: &TAG_BOLD_RE,
        tag: Some("strong"),
        token: Some(("''", "''")),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        for rule in BLOCK_RULES {
            assert!(rule.pattern.as_str().len() > 1, "{:?}", rule.name);
        }
        for rule in TAG_RULES {
            assert!(rule.pattern.as_str().len() > 1, "{:?}", rule.name);
        }
    }

    #[test]
    fn test_rule_filter_only() {
        let filter = RuleFilter::Only(&[TagRuleName::Bold]);
        assert!(filter.allows(TagRuleName::Bold));
        assert!(!filter.allows(TagRuleName::Italic));
        assert!(!filter.allows(TagRuleName::Url));
    }

    #[test]
    fn test_rule_filter_all() {
        assert!(RuleFilter::All.allows(TagRuleName::Nowiki));
        assert!(RuleFilter::All.allows(TagRuleName::Bold));
    }

    #[test]
    fn test_shadowing_order() {
        // nowiki must be checked before link, table before paragraph.
        let tag_pos = |name| TAG_RULES.iter().position(|r| r.name == name).unwrap();
        assert!(tag_pos(TagRuleName::Nowiki) < tag_pos(TagRuleName::Link));
        assert!(tag_pos(TagRuleName::Image) < tag_pos(TagRuleName::Link));
        assert!(tag_pos(TagRuleName::Link) < tag_pos(TagRuleName::UrlTag));
        assert!(tag_pos(TagRuleName::Italic) < tag_pos(TagRuleName::Bold));

        let block_pos = |name| BLOCK_RULES.iter().position(|r| r.name == name).unwrap();
        assert!(block_pos(BlockRuleName::Nowiki) < block_pos(BlockRuleName::Header));
        assert!(block_pos(BlockRuleName::Table) < block_pos(BlockRuleName::Paragraph));
    }
}
