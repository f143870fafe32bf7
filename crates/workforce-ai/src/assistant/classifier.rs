//! Classifier stage: language detection and intent classification. Both
//! sub-classifications catch their own failures and fall back to a documented
//! default, so this stage never fails the pipeline.

use std::sync::Arc;

use crate::capabilities::TextModel;
use crate::i18n::{detect_language, Language};

use super::dispatcher::Intent;

pub struct ClassifierStage {
    model: Arc<dyn TextModel>,
}

impl ClassifierStage {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// Keyword detection first; only an inconclusive (English) result
    /// escalates to the model, constrained to the supported codes. Any model
    /// failure or unsupported reply lands on English.
    pub fn detect_language(&self, message: &str) -> Language {
        let detected = detect_language(message);
        if detected != Language::En {
            return detected;
        }

        let prompt = format!(
            "Detect the language of this text and respond with ONLY the ISO 639-1 \
             code (en, zu, xh, af, nso, st): \"{message}\""
        );
        match self.model.complete(&prompt, 10) {
            Ok(reply) => Language::from_code(&reply).unwrap_or(Language::En),
            Err(error) => {
                tracing::warn!(%error, "language detection fallback failed, defaulting to English");
                Language::En
            }
        }
    }

    /// Always asks the model; anything outside the closed intent set, or any
    /// failure, defaults to `hr_query`. That is the most conservative branch:
    /// it can only read records, never move money.
    pub fn classify_intent(&self, message: &str) -> Intent {
        let prompt = format!(
            "Classify this HR employee message into exactly one category. \
             Respond with ONLY the category name.\n\
             Categories:\n\
             - hr_query: leave balance, payslip, employee info, time off requests\n\
             - ewa_request: earned wage access, salary advance, early pay\n\
             - policy_question: company policy, rules, regulations, entitlements\n\n\
             Message: \"{message}\""
        );
        match self.model.complete(&prompt, 20) {
            Ok(reply) => {
                let intent = Intent::parse(&reply).unwrap_or(Intent::HrQuery);
                tracing::info!(%intent, "classified intent");
                intent
            }
            Err(error) => {
                tracing::warn!(%error, "intent classification failed, defaulting to hr_query");
                Intent::HrQuery
            }
        }
    }
}
