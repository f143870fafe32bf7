//! End-to-end scenarios for the assistant pipeline driven through the public
//! facade: classification, dispatch into the rule engines, and composition,
//! with scripted external capabilities.

mod common {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use workforce_ai::assistant::AssistantService;
    use workforce_ai::capabilities::{CapabilityError, PolicyHit, PolicySearch, TextModel};
    use workforce_ai::i18n::{Language, Translate, TranslationError, TranslatorHandle};
    use workforce_ai::records::{seed_store, MemoryStore};

    /// Text model that answers classification prompts from simple keyword
    /// checks over the quoted message, standing in for the hosted model.
    pub struct KeywordModel;

    fn quoted_message(prompt: &str) -> &str {
        prompt
            .rsplit_once("Message: \"")
            .map(|(_, tail)| tail.trim_end_matches('"'))
            .unwrap_or(prompt)
    }

    impl TextModel for KeywordModel {
        fn complete(&self, prompt: &str, _max_tokens: u32) -> Result<String, CapabilityError> {
            if prompt.starts_with("Detect the language") {
                return Ok("en".to_string());
            }
            if prompt.starts_with("Classify this HR employee message") {
                let message = quoted_message(prompt).to_lowercase();
                let intent = if message.contains("advance") || message.contains("early") {
                    "ewa_request"
                } else if message.contains("policy") {
                    "policy_question"
                } else {
                    "hr_query"
                };
                return Ok(intent.to_string());
            }
            if prompt.starts_with("Does this message request an EWA advance") {
                let message = quoted_message(prompt).to_lowercase();
                let action = if message.contains("pay out") || message.contains("send") {
                    "request"
                } else {
                    "check"
                };
                return Ok(action.to_string());
            }
            if prompt.starts_with("Which HR record") {
                let message = quoted_message(prompt).to_lowercase();
                let record = if message.contains("payslip") {
                    "payslip"
                } else if message.contains("who am i") {
                    "employee_profile"
                } else {
                    "leave_balance"
                };
                return Ok(record.to_string());
            }
            Ok("Based on your records, here is the summary you asked for.".to_string())
        }
    }

    pub struct SinglePolicy;

    impl PolicySearch for SinglePolicy {
        fn search(&self, _query: &str, _top_k: usize) -> Result<Vec<PolicyHit>, CapabilityError> {
            Ok(vec![PolicyHit {
                text: "Sick leave requires a certificate after two days.".to_string(),
                source: "leave_policy.md".to_string(),
                section: "Sick Leave".to_string(),
            }])
        }
    }

    pub struct EchoTranslator;

    impl Translate for EchoTranslator {
        fn translate(
            &self,
            text: &str,
            _source: Language,
            target: Language,
        ) -> Result<String, TranslationError> {
            Ok(format!("({}) {text}", target.nllb_code()))
        }
    }

    pub fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 10).expect("valid date")
    }

    pub fn seeded_store() -> MemoryStore {
        let store = MemoryStore::default();
        seed_store(&store).expect("seed succeeds");
        store
    }

    pub fn assistant(store: MemoryStore) -> AssistantService {
        AssistantService::new(
            Arc::new(store),
            Arc::new(KeywordModel),
            Arc::new(SinglePolicy),
            TranslatorHandle::new(Arc::new(EchoTranslator)),
            Some(reference_date()),
        )
    }
}

use workforce_ai::assistant::{Intent, PipelineState};
use workforce_ai::engines::{ewa, hr, ErrorCode};
use workforce_ai::records::{EmployeeId, LeaveType, RecordStore};

use common::{assistant, reference_date, seeded_store};

#[test]
fn balance_question_round_trips_through_every_stage() {
    let service = assistant(seeded_store());
    let turn = service.respond(
        &EmployeeId::new("EMP005"),
        "How many leave days do I have left?",
    );

    assert_eq!(turn.state(), PipelineState::Done);
    assert_eq!(turn.intent, Some(Intent::HrQuery));
    assert_eq!(turn.tool_payload["data"]["annual"], 9.0);
    assert_eq!(turn.tool_payload["data"]["sick"], 7.0);
    assert_eq!(turn.tool_payload["data"]["family"], 2.0);
    assert!(!turn.response.is_empty());
}

#[test]
fn advance_payout_request_creates_a_disbursed_transaction() {
    let store = seeded_store();
    let service = assistant(store.clone());

    let turn = service.respond(
        &EmployeeId::new("EMP001"),
        "Please pay out an advance on my wages",
    );

    assert_eq!(turn.intent, Some(Intent::EwaRequest));
    assert_eq!(turn.tool_payload["data"]["amount"], 1500.0);

    let transactions = store
        .ewa_transactions(&EmployeeId::new("EMP001"))
        .expect("transactions");
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].amount, 1500.0);
}

#[test]
fn probationary_employee_never_reaches_disbursement() {
    let store = seeded_store();
    let service = assistant(store.clone());

    // Conversational path: the payout request degrades to an eligibility
    // verdict instead of a transaction.
    let turn = service.respond(&EmployeeId::new("EMP004"), "Please pay out my early wages");
    assert_eq!(turn.tool_payload["data"]["eligible"], false);
    assert!(store
        .ewa_transactions(&EmployeeId::new("EMP004"))
        .expect("transactions")
        .is_empty());

    // Direct path: even a tiny explicit amount is refused.
    let error = ewa::request_advance(&store, &EmployeeId::new("EMP004"), 10.0, reference_date())
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::NotEligible);
}

#[test]
fn policy_question_returns_cited_snippets() {
    let service = assistant(seeded_store());
    let turn = service.respond(
        &EmployeeId::new("EMP002"),
        "What does the policy say about sick leave?",
    );

    assert_eq!(turn.intent, Some(Intent::PolicyQuestion));
    assert_eq!(
        turn.tool_payload["data"]["results"][0]["source"],
        "leave_policy.md, Sick Leave"
    );
}

#[test]
fn leave_submission_and_payslip_agree_with_the_store() {
    let store = seeded_store();
    let monday = chrono::NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
    let wednesday = chrono::NaiveDate::from_ymd_opt(2026, 3, 4).expect("valid date");

    let receipt = hr::submit_leave_request(
        &store,
        &EmployeeId::new("EMP001"),
        monday,
        wednesday,
        LeaveType::Annual,
    )
    .expect("submission succeeds");
    assert_eq!(receipt.days, 3);

    let balances = hr::leave_balance(&store, &EmployeeId::new("EMP001")).expect("balances");
    assert_eq!(balances[&LeaveType::Annual], 9.0);

    let slip = hr::payslip(&store, &EmployeeId::new("EMP001"), "2026-02").expect("payslip");
    assert_eq!(slip.gross, 4268.0);
    assert_eq!(slip.net, 4268.0);
}
