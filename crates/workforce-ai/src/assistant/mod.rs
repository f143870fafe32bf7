//! The request-processing pipeline: classifier stage, domain dispatcher,
//! response composer, and the coordinator that runs them as a fixed finite
//! state sequence per conversational turn.

mod classifier;
mod composer;
pub mod context;
pub mod dispatcher;
mod router;
mod service;

#[cfg(test)]
mod tests;

pub use classifier::ClassifierStage;
pub use composer::ResponseComposer;
pub use context::{PipelineState, RequestContext, TurnView};
pub use dispatcher::{
    handler_for, DispatchOutcome, DomainDispatcher, Handler, Intent, DEFAULT_ADVANCE,
};
pub use router::{assistant_router, MessageRequest, RosterEntry};
pub use service::AssistantService;
