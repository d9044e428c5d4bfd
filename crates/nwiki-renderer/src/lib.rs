//! Rule-driven renderer for the nwiki markup dialect.
//!
//! Converts wiki markup into sanitized HTML fragments through a layered,
//! ordered grammar: block-level constructs (headers, tables, lists,
//! paragraphs) are expanded first, then inline "tag" constructs (links,
//! images, emphasis) are expanded recursively, with literal content
//! shielded from re-interpretation by opaque placeholder tokens that are
//! restored in one final pass.
//!
//! # Architecture
//!
//! - [`WikiRenderer`]: the entry point; deterministic and total — malformed
//!   markup degrades to literal text, never an error.
//! - [`LinkResolver`]: the host-provided collaborator for page-existence
//!   lookups and attachment path resolution. [`NullResolver`] is the
//!   default.
//! - The rule tables are process-wide, immutable, and compiled once; a
//!   renderer carries no state between calls and may be shared across
//!   threads.
//!
//! # Example
//!
//! ```
//! use nwiki_renderer::WikiRenderer;
//!
//! let renderer = WikiRenderer::new();
//! let result = renderer.render("= Hello =\n\n''bold'' text");
//! assert!(result.html.starts_with("<h1>Hello</h1>"));
//! ```

mod html;
mod protect;
mod renderer;
mod resolve;
pub(crate) mod rules;

pub use html::escape_html;
pub use renderer::{RenderResult, WikiRenderer};
pub use resolve::{LinkResolver, NullResolver, ResolveError, ResolvedLink};
