use std::sync::Arc;

use serde::Serialize;

use super::Language;

/// Translation backend seam. Implementations wrap whatever model or service
/// performs the actual translation; equal source and target must be a
/// passthrough.
pub trait Translate: Send + Sync {
    fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("translation backend unavailable")]
    Unavailable,
    #[error("translation failed: {0}")]
    Failed(String),
}

/// Explicit handle the response composer receives at construction time. A
/// handle without a backend stays in the unavailable state and renders every
/// draft untranslated instead of failing the turn.
#[derive(Clone)]
pub struct TranslatorHandle {
    backend: Option<Arc<dyn Translate>>,
}

/// Introspection view for health reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatorStatus {
    pub available: bool,
}

impl TranslatorHandle {
    pub fn new(backend: Arc<dyn Translate>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn status(&self) -> TranslatorStatus {
        TranslatorStatus {
            available: self.backend.is_some(),
        }
    }

    /// Translate an English draft into the target language, falling back to
    /// the untranslated draft when the backend is missing or fails.
    pub fn render(&self, draft: &str, target: Language) -> String {
        if target == Language::En {
            return draft.to_string();
        }

        let Some(backend) = &self.backend else {
            tracing::debug!(%target, "no translation backend, returning English draft");
            return draft.to_string();
        };

        match backend.translate(draft, Language::En, target) {
            Ok(translated) => translated,
            Err(error) => {
                tracing::warn!(%target, %error, "translation failed, returning English draft");
                draft.to_string()
            }
        }
    }
}
