//! HR rule engine: profile lookup, leave balances, leave submission, and
//! payslip computation. Every operation takes the store handle explicitly so
//! tests can run against an isolated store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::Serialize;

use crate::records::{EmployeeId, EwaStatus, LeaveType, RecordStore, StoreError};

use super::{ErrorCode, ToolError, ToolResult};

static LEAVE_REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_leave_request_id() -> String {
    let id = LEAVE_REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("LR-{id:06}")
}

/// Profile payload returned by [`employee_profile`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeProfile {
    pub id: EmployeeId,
    pub name: String,
    pub department: String,
    pub role: String,
    pub hire_date: NaiveDate,
    pub hourly_rate: f64,
    pub preferred_language: String,
    pub bank_account_last4: String,
    pub employment_status: String,
}

/// Receipt returned after a leave submission. The stored state is terminal
/// `approved`; user-facing copy still narrates it as pending manager review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveReceipt {
    pub request_id: String,
    pub status: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: u32,
}

/// Monthly payslip summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayslipSummary {
    pub period: String,
    pub hours_worked: f64,
    pub hourly_rate: f64,
    pub gross: f64,
    pub ewa_deductions: f64,
    pub net: f64,
}

pub fn employee_profile(
    store: &dyn RecordStore,
    employee_id: &EmployeeId,
) -> ToolResult<EmployeeProfile> {
    let employee = store
        .employee(employee_id)?
        .ok_or_else(|| ToolError::not_found("Employee not found"))?;

    Ok(EmployeeProfile {
        id: employee.id,
        name: employee.name,
        department: employee.department,
        role: employee.role,
        hire_date: employee.hire_date,
        hourly_rate: employee.hourly_rate,
        preferred_language: employee.preferred_language.code().to_string(),
        bank_account_last4: employee.bank_account_last4,
        employment_status: employee.employment_status.label().to_string(),
    })
}

/// Balance days per leave type, keyed by the lowercase type label.
pub fn leave_balance(
    store: &dyn RecordStore,
    employee_id: &EmployeeId,
) -> ToolResult<BTreeMap<LeaveType, f64>> {
    if store.employee(employee_id)?.is_none() {
        return Err(ToolError::not_found("Employee not found"));
    }

    let balances = store
        .leave_balances(employee_id)?
        .into_iter()
        .map(|row| (row.leave_type, row.balance_days))
        .collect::<BTreeMap<_, _>>();

    if balances.is_empty() {
        return Err(ToolError::not_found("No leave balances on record"));
    }
    Ok(balances)
}

/// Inclusive business-day count, skipping Saturdays and Sundays.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> u32 {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32
}

pub fn submit_leave_request(
    store: &dyn RecordStore,
    employee_id: &EmployeeId,
    start_date: NaiveDate,
    end_date: NaiveDate,
    leave_type: LeaveType,
) -> ToolResult<LeaveReceipt> {
    if store.employee(employee_id)?.is_none() {
        return Err(ToolError::not_found("Employee not found"));
    }

    if end_date < start_date {
        return Err(ToolError::new(
            ErrorCode::InvalidDates,
            "End date is before start date",
        ));
    }

    let days = business_days(start_date, end_date);
    if days == 0 {
        return Err(ToolError::new(
            ErrorCode::InvalidDates,
            "The requested range contains no business days",
        ));
    }

    let available = store
        .leave_balances(employee_id)?
        .into_iter()
        .find(|row| row.leave_type == leave_type)
        .map(|row| row.balance_days);
    match available {
        Some(balance) if balance >= f64::from(days) => {}
        Some(balance) => {
            return Err(ToolError::new(
                ErrorCode::InsufficientBalance,
                format!(
                    "Insufficient {} leave balance: {balance} days available, {days} requested",
                    leave_type.label()
                ),
            ))
        }
        None => {
            return Err(ToolError::new(
                ErrorCode::InsufficientBalance,
                format!("No {} leave balance on record", leave_type.label()),
            ))
        }
    }

    // The debit re-checks under the store lock, so a concurrent submission
    // cannot overdraw the row between the check above and this call.
    match store.debit_leave(employee_id, leave_type, f64::from(days)) {
        Ok(_) => {}
        Err(StoreError::NotFound) => {
            return Err(ToolError::new(
                ErrorCode::InsufficientBalance,
                format!("No {} leave balance on record", leave_type.label()),
            ))
        }
        Err(other) => return Err(other.into()),
    }

    Ok(LeaveReceipt {
        request_id: next_leave_request_id(),
        status: "approved".to_string(),
        leave_type,
        start_date,
        end_date,
        days,
    })
}

fn month_range(year_month: &str) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::parse_from_str(&format!("{year_month}-01"), "%Y-%m-%d").ok()?;
    let next = start.checked_add_months(Months::new(1))?;
    Some((start, next))
}

pub fn payslip(
    store: &dyn RecordStore,
    employee_id: &EmployeeId,
    year_month: &str,
) -> ToolResult<PayslipSummary> {
    let employee = store
        .employee(employee_id)?
        .ok_or_else(|| ToolError::not_found("Employee not found"))?;

    let (month_start, next_month) = month_range(year_month).ok_or_else(|| {
        ToolError::new(
            ErrorCode::InvalidDates,
            format!("'{year_month}' is not a YYYY-MM month"),
        )
    })?;

    // Payslip hours count every timesheet starting in the month; approval
    // status only gates earnings availability for advances.
    let hours_worked: f64 = store
        .timesheets(employee_id)?
        .iter()
        .filter(|sheet| month_start <= sheet.pay_period_start && sheet.pay_period_start < next_month)
        .map(|sheet| sheet.hours_worked)
        .sum();

    let gross = hours_worked * employee.hourly_rate;

    let ewa_deductions: f64 = store
        .ewa_transactions(employee_id)?
        .iter()
        .filter(|transaction| transaction.status == EwaStatus::Disbursed)
        .filter(|transaction| {
            transaction
                .disbursed_at
                .map(|at| month_start <= at.date() && at.date() < next_month)
                .unwrap_or(false)
        })
        .map(|transaction| transaction.amount)
        .sum();

    Ok(PayslipSummary {
        period: year_month.to_string(),
        hours_worked,
        hourly_rate: employee.hourly_rate,
        gross,
        ewa_deductions,
        net: gross - ewa_deductions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{seed_store, MemoryStore};

    fn seeded() -> MemoryStore {
        let store = MemoryStore::default();
        seed_store(&store).expect("seed succeeds");
        store
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn profile_returns_seeded_fields() {
        let store = seeded();
        let profile =
            employee_profile(&store, &EmployeeId::new("EMP001")).expect("profile found");
        assert_eq!(profile.name, "Sipho Dlamini");
        assert_eq!(profile.department, "Retail - Checkers Sandton");
        assert_eq!(profile.role, "Sales Assistant");
        assert_eq!(profile.hire_date, date(2024, 3, 15));
        assert_eq!(profile.preferred_language, "zu");
        assert_eq!(profile.employment_status, "active");
    }

    #[test]
    fn profile_for_unknown_employee_is_not_found() {
        let store = seeded();
        let error = employee_profile(&store, &EmployeeId::new("INVALID")).unwrap_err();
        assert_eq!(error.code, ErrorCode::NotFound);
        assert_eq!(error.message, "Employee not found");
    }

    #[test]
    fn balances_map_per_leave_type() {
        let store = seeded();
        let balances = leave_balance(&store, &EmployeeId::new("EMP005")).expect("balances");
        assert_eq!(balances[&LeaveType::Annual], 9.0);
        assert_eq!(balances[&LeaveType::Sick], 7.0);
        assert_eq!(balances[&LeaveType::Family], 2.0);
    }

    #[test]
    fn balances_for_unknown_employee_are_not_found() {
        let store = seeded();
        let error = leave_balance(&store, &EmployeeId::new("INVALID")).unwrap_err();
        assert_eq!(error.code, ErrorCode::NotFound);
    }

    #[test]
    fn business_days_skip_weekends() {
        // 2026-03-02 is a Monday.
        assert_eq!(business_days(date(2026, 3, 2), date(2026, 3, 4)), 3);
        assert_eq!(business_days(date(2026, 3, 2), date(2026, 3, 8)), 5);
        assert_eq!(business_days(date(2026, 3, 7), date(2026, 3, 8)), 0);
        assert_eq!(business_days(date(2026, 3, 6), date(2026, 3, 9)), 2);
    }

    #[test]
    fn leave_submission_debits_and_credits_atomically() {
        let store = seeded();
        let receipt = submit_leave_request(
            &store,
            &EmployeeId::new("EMP001"),
            date(2026, 3, 2),
            date(2026, 3, 4),
            LeaveType::Annual,
        )
        .expect("submission succeeds");

        assert_eq!(receipt.status, "approved");
        assert_eq!(receipt.days, 3);
        assert!(receipt.request_id.starts_with("LR-"));

        let balances = store
            .leave_balances(&EmployeeId::new("EMP001"))
            .expect("balances");
        let annual = balances
            .iter()
            .find(|row| row.leave_type == LeaveType::Annual)
            .expect("annual row");
        assert_eq!(annual.balance_days, 9.0);
        assert_eq!(annual.used_ytd, 6.0);
    }

    #[test]
    fn weekend_only_range_is_rejected() {
        let store = seeded();
        let error = submit_leave_request(
            &store,
            &EmployeeId::new("EMP001"),
            date(2026, 3, 7),
            date(2026, 3, 8),
            LeaveType::Annual,
        )
        .unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidDates);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let store = seeded();
        let error = submit_leave_request(
            &store,
            &EmployeeId::new("EMP001"),
            date(2026, 3, 4),
            date(2026, 3, 2),
            LeaveType::Annual,
        )
        .unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidDates);
    }

    #[test]
    fn overdrawn_submission_leaves_balance_untouched() {
        let store = seeded();
        // Johan has 2 annual days left; Mon-Fri needs 5.
        let error = submit_leave_request(
            &store,
            &EmployeeId::new("EMP003"),
            date(2026, 3, 2),
            date(2026, 3, 6),
            LeaveType::Annual,
        )
        .unwrap_err();
        assert_eq!(error.code, ErrorCode::InsufficientBalance);

        let balances = store
            .leave_balances(&EmployeeId::new("EMP003"))
            .expect("balances");
        let annual = balances
            .iter()
            .find(|row| row.leave_type == LeaveType::Annual)
            .expect("annual row");
        assert_eq!(annual.balance_days, 2.0);
        assert_eq!(annual.used_ytd, 13.0);
    }

    #[test]
    fn payslip_totals_without_deductions() {
        let store = seeded();
        let slip = payslip(&store, &EmployeeId::new("EMP001"), "2026-02").expect("payslip");
        assert_eq!(slip.hours_worked, 88.0);
        assert_eq!(slip.hourly_rate, 48.50);
        assert_eq!(slip.gross, 4268.0);
        assert_eq!(slip.ewa_deductions, 0.0);
        assert_eq!(slip.net, 4268.0);
    }

    #[test]
    fn payslip_subtracts_same_month_disbursements() {
        let store = seeded();
        let slip = payslip(&store, &EmployeeId::new("EMP002"), "2026-02").expect("payslip");
        assert_eq!(slip.gross, 3360.0);
        assert_eq!(slip.ewa_deductions, 800.0);
        assert_eq!(slip.net, 2560.0);
    }

    #[test]
    fn payslip_ignores_other_months() {
        let store = seeded();
        let slip = payslip(&store, &EmployeeId::new("EMP002"), "2026-03").expect("payslip");
        assert_eq!(slip.hours_worked, 0.0);
        assert_eq!(slip.ewa_deductions, 0.0);
        assert_eq!(slip.net, 0.0);
    }

    #[test]
    fn payslip_rejects_malformed_month() {
        let store = seeded();
        let error = payslip(&store, &EmployeeId::new("EMP001"), "February").unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidDates);
    }
}
