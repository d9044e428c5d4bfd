//! Collaborator boundary for link and attachment resolution.
//!
//! The renderer itself performs no I/O; page-existence lookups and
//! attachment path resolution are delegated to the host system through
//! [`LinkResolver`]. Resolution failures are absorbed by the renderer:
//! the offending construct is left as literal text, never an error.

/// Error from a [`LinkResolver`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The target cannot be resolved to a URL or path.
    #[error("unresolvable target: {0}")]
    Unresolvable(String),
}

/// A resolved wiki page link.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedLink {
    /// URL to link to.
    pub url: String,
    /// Whether the target page already exists. Links to missing pages are
    /// emitted with the `nwiki-new` class.
    pub exists: bool,
}

/// Host-provided resolution of wiki link targets and attachment paths.
///
/// Both calls are synchronous lookups; implementations must not block on
/// network or storage from inside a rendering call.
pub trait LinkResolver: Send + Sync {
    /// Resolve a `[[page]]` target to a URL and existence flag.
    fn resolve_page(&self, target: &str) -> Result<ResolvedLink, ResolveError>;

    /// Resolve a relative attachment path to its canonical path or URL.
    fn attachment_path(&self, path: &str) -> Result<String, ResolveError>;
}

/// Resolver that maps every target to itself.
///
/// Pages never exist, so every page link renders with the `nwiki-new`
/// class. Useful as a default and in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullResolver;

impl LinkResolver for NullResolver {
    fn resolve_page(&self, target: &str) -> Result<ResolvedLink, ResolveError> {
        Ok(ResolvedLink {
            url: target.to_owned(),
            exists: false,
        })
    }

    fn attachment_path(&self, path: &str) -> Result<String, ResolveError> {
        Ok(path.to_owned())
    }
}
