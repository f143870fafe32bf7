//! Pipeline coordinator. Drives the fixed stage sequence for one turn and
//! owns error short-circuiting: a stage failure routes straight to the
//! degraded composer path, never to the caller as an error.

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::capabilities::{PolicySearch, TextModel};
use crate::i18n::{TranslatorHandle, TranslatorStatus};
use crate::records::{Employee, EmployeeId, RecordStore, StoreError};

use super::classifier::ClassifierStage;
use super::context::{PipelineState, RequestContext};
use super::composer::ResponseComposer;
use super::dispatcher::{DispatchOutcome, DomainDispatcher};

/// One assistant instance serves any number of independent turns; no state is
/// carried between invocations other than the record store itself.
pub struct AssistantService {
    store: Arc<dyn RecordStore>,
    classifier: ClassifierStage,
    dispatcher: DomainDispatcher,
    composer: ResponseComposer,
    reference_date: Option<NaiveDate>,
}

impl AssistantService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        model: Arc<dyn TextModel>,
        policies: Arc<dyn PolicySearch>,
        translator: TranslatorHandle,
        reference_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            classifier: ClassifierStage::new(model.clone()),
            dispatcher: DomainDispatcher::new(store.clone(), model.clone(), policies),
            composer: ResponseComposer::new(model, translator),
            store,
            reference_date,
        }
    }

    /// The date rule evaluation runs against: pinned for demos and tests,
    /// otherwise the wall clock.
    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn translator_status(&self) -> TranslatorStatus {
        self.composer.translator_status()
    }

    pub fn roster(&self) -> Result<Vec<Employee>, StoreError> {
        self.store.employees()
    }

    /// Run one conversational turn. Always returns a context in the `Done`
    /// state carrying a response; failures surface in the context's error
    /// field and its apology response, never as a `Result` error.
    pub fn respond(&self, employee_id: &EmployeeId, message: &str) -> RequestContext {
        let mut context = RequestContext::new(employee_id.clone(), message);

        context.language = self.classifier.detect_language(message);
        context.advance(PipelineState::LanguageDetected);
        tracing::info!(language = %context.language, "detected language");

        let intent = self.classifier.classify_intent(message);
        context.intent = Some(intent);
        context.advance(PipelineState::IntentClassified);

        match self
            .dispatcher
            .dispatch(intent, employee_id, message, self.today())
        {
            DispatchOutcome::Payload(payload) => {
                context.tool_payload = payload;
                context.advance(PipelineState::Dispatched);
            }
            DispatchOutcome::Failed(reason) => context.fail(reason),
        }

        context.response = self.composer.compose(&context);
        context.advance(PipelineState::Composed);
        context.advance(PipelineState::Done);
        context
    }
}
