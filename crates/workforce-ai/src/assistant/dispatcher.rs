//! Domain dispatcher: a pure intent → handler table, plus the per-domain
//! sub-decision that picks the concrete rule-engine operation before the
//! engine runs.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::capabilities::{CapabilityError, PolicySearch, TextModel};
use crate::engines::{envelope, ewa, hr, policy};
use crate::records::{EmployeeId, RecordStore};

/// Advance size the conversational path requests when the employee has not
/// named an amount, clamped to availability.
pub const DEFAULT_ADVANCE: f64 = 1_500.0;

/// Closed set of intents the classifier can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    HrQuery,
    EwaRequest,
    PolicyQuestion,
}

impl Intent {
    pub const fn label(self) -> &'static str {
        match self {
            Intent::HrQuery => "hr_query",
            Intent::EwaRequest => "ewa_request",
            Intent::PolicyQuestion => "policy_question",
        }
    }

    pub fn parse(raw: &str) -> Option<Intent> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hr_query" => Some(Intent::HrQuery),
            "ewa_request" => Some(Intent::EwaRequest),
            "policy_question" => Some(Intent::PolicyQuestion),
            _ => None,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Handlers a classified request can land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    HrRules,
    EwaRules,
    PolicyLookup,
}

/// The routing table. Unrecognized intent strings never reach this point:
/// [`Intent::parse`] already collapses them to `hr_query`, the documented
/// default branch.
pub const fn handler_for(intent: Intent) -> Handler {
    match intent {
        Intent::HrQuery => Handler::HrRules,
        Intent::EwaRequest => Handler::EwaRules,
        Intent::PolicyQuestion => Handler::PolicyLookup,
    }
}

/// HR operations reachable from conversation. Leave submission needs explicit
/// dates and is only exposed through the engine API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HrAction {
    EmployeeProfile,
    LeaveBalance,
    Payslip,
}

impl HrAction {
    fn parse(raw: &str) -> Option<HrAction> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "employee_profile" => Some(HrAction::EmployeeProfile),
            "leave_balance" => Some(HrAction::LeaveBalance),
            "payslip" => Some(HrAction::Payslip),
            _ => None,
        }
    }
}

/// Result of running the dispatched handler: either the tool envelope for the
/// composer, or a stage failure that sends the turn down the degraded path.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Payload(Value),
    Failed(&'static str),
}

pub struct DomainDispatcher {
    store: Arc<dyn RecordStore>,
    model: Arc<dyn TextModel>,
    policies: Arc<dyn PolicySearch>,
}

impl DomainDispatcher {
    pub fn new(
        store: Arc<dyn RecordStore>,
        model: Arc<dyn TextModel>,
        policies: Arc<dyn PolicySearch>,
    ) -> Self {
        Self {
            store,
            model,
            policies,
        }
    }

    pub fn dispatch(
        &self,
        intent: Intent,
        employee_id: &EmployeeId,
        message: &str,
        today: NaiveDate,
    ) -> DispatchOutcome {
        match handler_for(intent) {
            Handler::HrRules => self.run_hr(employee_id, message, today),
            Handler::EwaRules => self.run_ewa(employee_id, message, today),
            Handler::PolicyLookup => self.run_policy(message),
        }
    }

    fn run_hr(
        &self,
        employee_id: &EmployeeId,
        message: &str,
        today: NaiveDate,
    ) -> DispatchOutcome {
        let action = match self.hr_action(message) {
            Ok(action) => action,
            Err(error) => {
                tracing::error!(%error, "HR sub-decision failed");
                return DispatchOutcome::Failed("Unable to process HR query");
            }
        };

        let store = self.store.as_ref();
        let payload = match action {
            HrAction::EmployeeProfile => envelope(&hr::employee_profile(store, employee_id)),
            HrAction::LeaveBalance => envelope(&hr::leave_balance(store, employee_id)),
            HrAction::Payslip => {
                let month = today.format("%Y-%m").to_string();
                envelope(&hr::payslip(store, employee_id, &month))
            }
        };
        DispatchOutcome::Payload(payload)
    }

    fn hr_action(&self, message: &str) -> Result<HrAction, CapabilityError> {
        let prompt = format!(
            "Which HR record should be consulted? Respond with ONLY the record name.\n\
             Records: employee_profile, leave_balance, payslip\n\
             Message: \"{message}\""
        );
        let reply = self.model.complete(&prompt, 20)?;
        Ok(HrAction::parse(&reply).unwrap_or(HrAction::LeaveBalance))
    }

    fn run_ewa(
        &self,
        employee_id: &EmployeeId,
        message: &str,
        today: NaiveDate,
    ) -> DispatchOutcome {
        let wants_advance = match self.wants_advance(message) {
            Ok(wants_advance) => wants_advance,
            Err(error) => {
                tracing::error!(%error, "EWA sub-decision failed");
                return DispatchOutcome::Failed("Unable to process EWA request");
            }
        };

        let store = self.store.as_ref();
        let eligibility = ewa::check_eligibility(store, employee_id, today);

        if !wants_advance {
            return DispatchOutcome::Payload(envelope(&eligibility));
        }

        match &eligibility {
            Ok(report) if report.is_eligible() => {
                let amount = report.available().min(DEFAULT_ADVANCE);
                DispatchOutcome::Payload(envelope(&ewa::request_advance(
                    store,
                    employee_id,
                    amount,
                    today,
                )))
            }
            // Ineligible or failed: surface the eligibility payload as-is so
            // the composer can explain why nothing was disbursed.
            _ => DispatchOutcome::Payload(envelope(&eligibility)),
        }
    }

    fn wants_advance(&self, message: &str) -> Result<bool, CapabilityError> {
        let prompt = format!(
            "Does this message request an EWA advance or just check eligibility? \
             Respond with ONLY: 'check' or 'request'\n\
             Message: \"{message}\""
        );
        let reply = self.model.complete(&prompt, 20)?;
        Ok(reply.to_lowercase().contains("request"))
    }

    fn run_policy(&self, message: &str) -> DispatchOutcome {
        DispatchOutcome::Payload(envelope(&policy::search_policies(
            self.policies.as_ref(),
            message,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_table_is_exhaustive_and_fixed() {
        assert_eq!(handler_for(Intent::HrQuery), Handler::HrRules);
        assert_eq!(handler_for(Intent::EwaRequest), Handler::EwaRules);
        assert_eq!(handler_for(Intent::PolicyQuestion), Handler::PolicyLookup);
    }

    #[test]
    fn intent_parsing_is_strict() {
        assert_eq!(Intent::parse(" HR_Query "), Some(Intent::HrQuery));
        assert_eq!(Intent::parse("ewa_request"), Some(Intent::EwaRequest));
        assert_eq!(Intent::parse("policy_question"), Some(Intent::PolicyQuestion));
        assert_eq!(Intent::parse("payroll"), None);
        assert_eq!(Intent::parse(""), None);
    }

    #[test]
    fn hr_action_parsing_defaults_are_explicit() {
        assert_eq!(HrAction::parse("payslip"), Some(HrAction::Payslip));
        assert_eq!(
            HrAction::parse("Employee_Profile"),
            Some(HrAction::EmployeeProfile)
        );
        assert_eq!(HrAction::parse("something else"), None);
    }
}
