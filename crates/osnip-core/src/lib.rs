pub mod augment;
pub mod catalog;
pub mod config;
pub mod error;
pub mod load;
pub mod write;

pub use augment::{CODE_SAMPLES_KEY, CodeSample, augment, fetch_snippets};
pub use catalog::Target;
pub use error::{Error, SnippetError};

/// An OpenAPI document as an order-preserving JSON tree.
pub type Document = serde_json::Value;

/// One rendered snippet as produced by a [`SnippetGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// Human-readable label, e.g. `Shell + Curl`.
    pub title: String,
    pub content: String,
}

/// Trait for snippet generators that render request code for one endpoint.
pub trait SnippetGenerator {
    /// Render one snippet per target for the operation at `path` / `method`,
    /// in target order.
    fn endpoint_snippets(
        &self,
        document: &Document,
        path: &str,
        method: &str,
        targets: &[Target],
    ) -> Result<Vec<Snippet>, SnippetError>;
}
