use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Args;
use workforce_ai::assistant::AssistantService;
use workforce_ai::error::AppError;
use workforce_ai::i18n::TranslatorHandle;
use workforce_ai::records::{
    roster_from_reader, seed, seed_store, EmployeeId, MemoryStore, RecordStore, StoreError,
};

use crate::infra::{parse_date, HeuristicTextModel, PolicyIndex};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Pin rule evaluation to this date (defaults to the seeded pay period)
    #[arg(long, value_parser = parse_date)]
    pub(crate) reference_date: Option<NaiveDate>,
    /// Add employees from a roster CSV export on top of the seed data
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Ask a single question instead of the scripted conversation
    #[arg(long, requires = "employee")]
    pub(crate) question: Option<String>,
    /// Employee asking the question (e.g. EMP001)
    #[arg(long)]
    pub(crate) employee: Option<String>,
}

const SCRIPT: &[(&str, &str)] = &[
    ("EMP001", "Sawubona, ngicela ukubona amalanga ami"),
    ("EMP002", "Please pay out an advance on my wages"),
    ("EMP004", "Can I get early access to my wages?"),
    ("EMP005", "What is the policy on sick leave?"),
    ("EMP003", "Hoeveel verlof het ek oor?"),
    ("EMP001", "Show me my payslip"),
];

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = MemoryStore::default();
    seed_store(&store)?;

    if let Some(path) = &args.roster {
        let file = File::open(path)?;
        let roster = roster_from_reader(file)
            .map_err(|err| AppError::Store(StoreError::Unavailable(err.to_string())))?;
        for employee in roster {
            match store.insert_employee(employee) {
                Ok(()) | Err(StoreError::Conflict) => {}
                Err(other) => return Err(other.into()),
            }
        }
    }

    let reference_date = args.reference_date.unwrap_or_else(seed::demo_reference_date);
    let service = AssistantService::new(
        Arc::new(store.clone()),
        Arc::new(HeuristicTextModel),
        Arc::new(PolicyIndex::builtin()),
        TranslatorHandle::unavailable(),
        Some(reference_date),
    );

    println!("Workforce assistant demo (reference date {reference_date})");
    println!("{}", "-".repeat(72));

    match (&args.employee, &args.question) {
        (Some(employee), Some(question)) => {
            run_turn(&service, &store, employee, question)?;
        }
        _ => {
            for (employee, question) in SCRIPT {
                run_turn(&service, &store, employee, question)?;
            }
        }
    }

    Ok(())
}

fn run_turn(
    service: &AssistantService,
    store: &MemoryStore,
    employee: &str,
    question: &str,
) -> Result<(), AppError> {
    let employee_id = EmployeeId::new(employee);
    let name = store
        .employee(&employee_id)?
        .map(|record| record.name)
        .unwrap_or_else(|| employee.to_string());

    let turn = service.respond(&employee_id, question);
    let intent = turn
        .intent
        .map(|intent| intent.label())
        .unwrap_or("unknown");

    println!("{name} ({employee}): {question}");
    println!("  [language: {} | intent: {intent}]", turn.language);
    match &turn.error {
        Some(error) => println!("  ! {error}"),
        None => println!("  > {}", turn.response),
    }
    println!();
    Ok(())
}
