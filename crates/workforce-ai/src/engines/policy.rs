//! Policy lookup adapter. Delegates to the external search capability and
//! caps the result count; the query passes through unmodified.

use serde::Serialize;

use crate::capabilities::PolicySearch;

use super::{ToolError, ToolResult};

pub const TOP_K: usize = 3;

/// Search payload handed to the composer: the original query plus cited
/// snippets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyAnswer {
    pub query: String,
    pub results: Vec<PolicyCitation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyCitation {
    pub text: String,
    pub source: String,
}

pub fn search_policies(index: &dyn PolicySearch, query: &str) -> ToolResult<PolicyAnswer> {
    let mut hits = index.search(query, TOP_K).map_err(|error| {
        tracing::error!(%error, "policy search backend failed");
        ToolError::internal()
    })?;
    hits.truncate(TOP_K);

    Ok(PolicyAnswer {
        query: query.to_string(),
        results: hits
            .into_iter()
            .map(|hit| PolicyCitation {
                text: hit.text,
                source: format!("{}, {}", hit.source, hit.section),
            })
            .collect(),
    })
}
