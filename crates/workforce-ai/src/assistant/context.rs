use serde::Serialize;
use serde_json::Value;

use crate::i18n::Language;
use crate::records::EmployeeId;

use super::dispatcher::Intent;

/// Pipeline progress for one conversational turn. The error state is
/// orthogonal: it can be entered from any of the first four states and always
/// proceeds through the degraded composer path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    LanguageDetected,
    IntentClassified,
    Dispatched,
    Composed,
    Done,
    Errored,
}

impl PipelineState {
    /// Explicit transition table for the fixed stage sequence.
    pub const fn can_advance_to(self, next: PipelineState) -> bool {
        matches!(
            (self, next),
            (PipelineState::Start, PipelineState::LanguageDetected)
                | (PipelineState::LanguageDetected, PipelineState::IntentClassified)
                | (PipelineState::IntentClassified, PipelineState::Dispatched)
                | (PipelineState::Dispatched, PipelineState::Composed)
                | (PipelineState::Errored, PipelineState::Composed)
                | (PipelineState::Composed, PipelineState::Done)
                | (PipelineState::Start, PipelineState::Errored)
                | (PipelineState::LanguageDetected, PipelineState::Errored)
                | (PipelineState::IntentClassified, PipelineState::Errored)
                | (PipelineState::Dispatched, PipelineState::Errored)
        )
    }
}

/// Mutable state threaded through every stage of one turn. Created at
/// pipeline entry and discarded once the response is returned; nothing here
/// persists.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub employee_id: EmployeeId,
    pub message: String,
    pub language: Language,
    pub intent: Option<Intent>,
    pub tool_payload: Value,
    pub error: Option<String>,
    pub response: String,
    state: PipelineState,
}

impl RequestContext {
    pub fn new(employee_id: EmployeeId, message: impl Into<String>) -> Self {
        Self {
            employee_id,
            message: message.into(),
            language: Language::En,
            intent: None,
            tool_payload: Value::Null,
            error: None,
            response: String::new(),
            state: PipelineState::Start,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Move to the next state if the transition table allows it; an illegal
    /// transition is a coordinator bug and collapses the turn to the error
    /// state instead of panicking.
    pub fn advance(&mut self, next: PipelineState) {
        if self.state.can_advance_to(next) {
            self.state = next;
        } else {
            tracing::error!(from = ?self.state, to = ?next, "illegal pipeline transition");
            self.fail("Internal pipeline fault");
        }
    }

    /// Record a stage failure and enter the error state.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.error = Some(reason.into());
        self.state = PipelineState::Errored;
    }

    pub fn view(&self) -> TurnView {
        TurnView {
            employee_id: self.employee_id.clone(),
            language: self.language,
            intent: self.intent,
            response: self.response.clone(),
            error: self.error.clone(),
        }
    }
}

/// Serialized summary of a finished turn for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct TurnView {
    pub employee_id: EmployeeId,
    pub language: Language,
    pub intent: Option<Intent>,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
