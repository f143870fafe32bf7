use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::assistant::AssistantService;
use crate::capabilities::{CapabilityError, PolicyHit, PolicySearch, TextModel};
use crate::i18n::{Language, Translate, TranslationError, TranslatorHandle};
use crate::records::{seed_store, EmployeeId, MemoryStore};

/// Scripted text model: one canned reply per prompt family, `None` meaning
/// that family fails. Records every prompt it sees.
pub(super) struct ScriptedModel {
    pub(super) language: Option<String>,
    pub(super) intent: Option<String>,
    pub(super) hr_action: Option<String>,
    pub(super) ewa_action: Option<String>,
    pub(super) draft: Option<String>,
    pub(super) prompts: Mutex<Vec<String>>,
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self {
            language: Some("en".to_string()),
            intent: Some("hr_query".to_string()),
            hr_action: Some("leave_balance".to_string()),
            ewa_action: Some("check".to_string()),
            draft: Some("Here is what I found.".to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedModel {
    pub(super) fn with_intent(intent: &str) -> Self {
        Self {
            intent: Some(intent.to_string()),
            ..Self::default()
        }
    }

    pub(super) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }

    fn reply(slot: &Option<String>) -> Result<String, CapabilityError> {
        slot.clone()
            .ok_or_else(|| CapabilityError::Backend("scripted failure".to_string()))
    }
}

impl TextModel for ScriptedModel {
    fn complete(&self, prompt: &str, _max_tokens: u32) -> Result<String, CapabilityError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.to_string());

        if prompt.starts_with("Detect the language") {
            Self::reply(&self.language)
        } else if prompt.starts_with("Classify this HR employee message") {
            Self::reply(&self.intent)
        } else if prompt.starts_with("Which HR record") {
            Self::reply(&self.hr_action)
        } else if prompt.starts_with("Does this message request an EWA advance") {
            Self::reply(&self.ewa_action)
        } else {
            Self::reply(&self.draft)
        }
    }
}

/// Fixed-hit policy index double.
pub(super) struct StaticSearch;

impl PolicySearch for StaticSearch {
    fn search(&self, _query: &str, _top_k: usize) -> Result<Vec<PolicyHit>, CapabilityError> {
        Ok(vec![PolicyHit {
            text: "Annual leave accrues at 1.25 days per month.".to_string(),
            source: "leave_policy.md".to_string(),
            section: "Annual Leave".to_string(),
        }])
    }
}

/// Translator double that tags the draft so tests can see it ran.
pub(super) struct TaggingTranslator;

impl Translate for TaggingTranslator {
    fn translate(
        &self,
        text: &str,
        _source: Language,
        target: Language,
    ) -> Result<String, TranslationError> {
        Ok(format!("[{}] {text}", target.code()))
    }
}

pub(super) fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 10).expect("valid date")
}

pub(super) fn seeded_store() -> MemoryStore {
    let store = MemoryStore::default();
    seed_store(&store).expect("seed succeeds");
    store
}

pub(super) fn service_with(model: Arc<ScriptedModel>, store: MemoryStore) -> AssistantService {
    AssistantService::new(
        Arc::new(store),
        model,
        Arc::new(StaticSearch),
        TranslatorHandle::new(Arc::new(TaggingTranslator)),
        Some(reference_date()),
    )
}

pub(super) fn seeded_service(model: Arc<ScriptedModel>) -> AssistantService {
    service_with(model, seeded_store())
}

pub(super) fn employee(id: &str) -> EmployeeId {
    EmployeeId::new(id)
}
