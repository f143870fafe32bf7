//! Seams for the external collaborators the pipeline calls synchronously:
//! text classification/generation and policy document search. Implementations
//! live with the service binary; tests supply scripted doubles.

use serde::{Deserialize, Serialize};

/// Black-box text completion capability used for classification and response
/// drafting. Calls block until the backend answers or fails.
pub trait TextModel: Send + Sync {
    fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CapabilityError>;
}

/// Ranked policy snippet search.
pub trait PolicySearch: Send + Sync {
    fn search(&self, query: &str, top_k: usize) -> Result<Vec<PolicyHit>, CapabilityError>;
}

/// One ranked match from the policy corpus, carrying enough metadata for a
/// citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyHit {
    pub text: String,
    pub source: String,
    pub section: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("capability unavailable: {0}")]
    Unavailable(String),
    #[error("capability backend error: {0}")]
    Backend(String),
    #[error("capability call timed out")]
    Timeout,
}
