//! Response composer: drafts the final answer from the tool payload, then
//! translates it into the employee's language when needed. On an errored
//! context it skips generation entirely and emits the fixed apology.

use std::sync::Arc;

use serde_json::Value;

use crate::capabilities::TextModel;
use crate::i18n::{Language, TranslatorHandle, TranslatorStatus};

use super::context::RequestContext;

const GENERATION_FALLBACK: &str = "I'm sorry, I was unable to process your request.";

pub struct ResponseComposer {
    model: Arc<dyn TextModel>,
    translator: TranslatorHandle,
}

impl ResponseComposer {
    pub fn new(model: Arc<dyn TextModel>, translator: TranslatorHandle) -> Self {
        Self { model, translator }
    }

    pub fn translator_status(&self) -> TranslatorStatus {
        self.translator.status()
    }

    pub fn compose(&self, context: &RequestContext) -> String {
        if let Some(error) = &context.error {
            return format!("I'm sorry, I encountered an error: {error}");
        }

        let prompt = generation_prompt(&context.message, &context.tool_payload);
        match self.model.complete(&prompt, 500) {
            Ok(draft) => self.translator.render(draft.trim(), context.language),
            Err(error) => {
                tracing::warn!(%error, "response generation failed");
                GENERATION_FALLBACK.to_string()
            }
        }
    }
}

fn generation_prompt(question: &str, payload: &Value) -> String {
    format!(
        "Generate a helpful, concise response to the employee's question \
         based on these tool results. Respond in English.\n\
         House rules:\n\
         - Describe any leave submission as submitted and pending manager approval, \
         never as already approved.\n\
         - Quote balances and amounts exactly as the tools returned them; no rounding, \
         no invented figures.\n\
         - Do not speculate beyond the data provided.\n\n\
         Employee question: {question}\n\
         Tool results: {payload}\n\n\
         Response:"
    )
}
