//! Earned-wage access rule engine: eligibility and advance issuance.
//!
//! Availability policy, applied in this exact order: half of the earnings in
//! the current pay period, capped at R5,000, less the outstanding disbursed
//! balance, floored at zero.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::records::{
    Employee, EmployeeId, EmploymentStatus, EwaStatus, EwaTransaction, RecordStore,
    TimesheetStatus,
};

use super::{ErrorCode, ToolError, ToolResult};

pub const MAX_ADVANCE: f64 = 5_000.0;
pub const ADVANCE_SHARE: f64 = 0.50;
pub const ADVANCE_FEE: f64 = 10.0;
pub const PROBATION_MONTHS: i32 = 3;

static TRANSACTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Eligibility verdict. Serializes to the flat shape the composer narrates
/// from: `eligible` plus either a reason/countdown or the three amounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EligibilityReport {
    Ineligible {
        eligible: bool,
        reason: String,
        weeks_remaining: i32,
    },
    Eligible {
        eligible: bool,
        earned: f64,
        available: f64,
        outstanding: f64,
    },
}

impl EligibilityReport {
    fn ineligible(reason: impl Into<String>, weeks_remaining: i32) -> Self {
        EligibilityReport::Ineligible {
            eligible: false,
            reason: reason.into(),
            weeks_remaining,
        }
    }

    fn eligible(earned: f64, available: f64, outstanding: f64) -> Self {
        EligibilityReport::Eligible {
            eligible: true,
            earned,
            available,
            outstanding,
        }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, EligibilityReport::Eligible { .. })
    }

    pub fn available(&self) -> f64 {
        match self {
            EligibilityReport::Eligible { available, .. } => *available,
            EligibilityReport::Ineligible { .. } => 0.0,
        }
    }
}

/// Receipt for a disbursed advance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvanceReceipt {
    pub transaction_id: String,
    pub amount: f64,
    pub fee: f64,
    pub net: f64,
}

/// Whole-month difference, year*12+month arithmetic; days within the month
/// are deliberately ignored.
pub fn months_employed(today: NaiveDate, hire_date: NaiveDate) -> i32 {
    (today.year() - hire_date.year()) * 12 + (today.month() as i32 - hire_date.month() as i32)
}

fn outstanding_balance(transactions: &[EwaTransaction]) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.status == EwaStatus::Disbursed)
        .map(|transaction| transaction.amount)
        .sum()
}

fn earned_this_period(
    store: &dyn RecordStore,
    employee: &Employee,
    today: NaiveDate,
) -> Result<f64, ToolError> {
    let hours: f64 = store
        .timesheets(&employee.id)?
        .iter()
        .filter(|sheet| sheet.status == TimesheetStatus::Approved && sheet.covers(today))
        .map(|sheet| sheet.hours_worked)
        .sum();
    Ok(hours * employee.hourly_rate)
}

pub fn check_eligibility(
    store: &dyn RecordStore,
    employee_id: &EmployeeId,
    today: NaiveDate,
) -> ToolResult<EligibilityReport> {
    let employee = store
        .employee(employee_id)?
        .ok_or_else(|| ToolError::not_found("Employee not found"))?;

    let months = months_employed(today, employee.hire_date);
    if employee.employment_status == EmploymentStatus::Probation || months < PROBATION_MONTHS {
        let weeks_remaining = (PROBATION_MONTHS * 4 - months * 4).max(0);
        return Ok(EligibilityReport::ineligible(
            "Probation not complete",
            weeks_remaining,
        ));
    }

    let earned = earned_this_period(store, &employee, today)?;
    let outstanding = outstanding_balance(&store.ewa_transactions(employee_id)?);

    let available = ((earned * ADVANCE_SHARE).min(MAX_ADVANCE) - outstanding).max(0.0);

    Ok(EligibilityReport::eligible(earned, available, outstanding))
}

fn next_transaction_id(today: NaiveDate) -> String {
    let sequence = TRANSACTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("EWA-{}-{sequence:03}", today.format("%Y%m%d"))
}

pub fn request_advance(
    store: &dyn RecordStore,
    employee_id: &EmployeeId,
    amount: f64,
    today: NaiveDate,
) -> ToolResult<AdvanceReceipt> {
    if amount.is_nan() || amount <= 0.0 {
        return Err(ToolError::new(
            ErrorCode::InvalidAmount,
            "Advance amount must be positive",
        ));
    }

    let report = check_eligibility(store, employee_id, today)?;
    let available = match &report {
        EligibilityReport::Eligible { available, .. } => *available,
        EligibilityReport::Ineligible { reason, .. } => {
            return Err(ToolError::new(ErrorCode::NotEligible, reason.clone()))
        }
    };

    if amount > available {
        return Err(ToolError::new(
            ErrorCode::ExceedsAvailable,
            format!("Requested R{amount} exceeds available R{available}"),
        ));
    }

    let now = today
        .and_hms_opt(0, 0, 0)
        .ok_or_else(ToolError::internal)?;

    // Advances disburse immediately; there is no pending state on this path.
    let mut transaction = EwaTransaction {
        id: next_transaction_id(today),
        employee_id: employee_id.clone(),
        amount,
        fee: ADVANCE_FEE,
        status: EwaStatus::Disbursed,
        requested_at: now,
        disbursed_at: Some(now),
    };

    for _ in 0..16 {
        match store.insert_ewa_transaction(transaction.clone()) {
            Ok(()) => {
                return Ok(AdvanceReceipt {
                    transaction_id: transaction.id,
                    amount,
                    fee: ADVANCE_FEE,
                    net: amount - ADVANCE_FEE,
                })
            }
            Err(crate::records::StoreError::Conflict) => {
                transaction.id = next_transaction_id(today);
            }
            Err(other) => return Err(other.into()),
        }
    }
    Err(ToolError::internal())
}
