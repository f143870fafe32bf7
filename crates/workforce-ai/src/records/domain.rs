use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::i18n::Language;

/// Identifier wrapper for employee records (short codes like `EMP001`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

impl EmployeeId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Employment lifecycle phase; probation blocks earned-wage access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmploymentStatus {
    Active,
    Probation,
    Terminated,
}

impl EmploymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EmploymentStatus::Active => "active",
            EmploymentStatus::Probation => "probation",
            EmploymentStatus::Terminated => "terminated",
        }
    }
}

/// Leave categories tracked per employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Family,
}

impl LeaveType {
    pub const ALL: [LeaveType; 3] = [LeaveType::Annual, LeaveType::Sick, LeaveType::Family];

    pub const fn label(self) -> &'static str {
        match self {
            LeaveType::Annual => "annual",
            LeaveType::Sick => "sick",
            LeaveType::Family => "family",
        }
    }

    pub fn parse(raw: &str) -> Option<LeaveType> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "annual" => Some(LeaveType::Annual),
            "sick" => Some(LeaveType::Sick),
            "family" => Some(LeaveType::Family),
            _ => None,
        }
    }
}

/// Timesheet approval state; only approved sheets count toward earnings
/// availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimesheetStatus {
    Pending,
    Approved,
    Rejected,
}

/// Earned-wage transaction lifecycle. Disbursed amounts form the outstanding
/// balance until repaid; no operation here moves a record to `Repaid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EwaStatus {
    Pending,
    Disbursed,
    Repaid,
    Cancelled,
}

/// Employee profile record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub department: String,
    pub role: String,
    pub hire_date: NaiveDate,
    pub hourly_rate: f64,
    pub preferred_language: Language,
    pub bank_account_last4: String,
    pub employment_status: EmploymentStatus,
}

/// Per-employee, per-type leave balance row. `balance_days` never goes
/// negative; the store's debit operation enforces this atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub employee_id: EmployeeId,
    pub leave_type: LeaveType,
    pub balance_days: f64,
    pub accrued_ytd: f64,
    pub used_ytd: f64,
}

/// Hours worked over a pay period. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timesheet {
    pub employee_id: EmployeeId,
    pub pay_period_start: NaiveDate,
    pub pay_period_end: NaiveDate,
    pub hours_worked: f64,
    pub status: TimesheetStatus,
}

impl Timesheet {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.pay_period_start <= date && date <= self.pay_period_end
    }
}

/// Earned-wage access transaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EwaTransaction {
    pub id: String,
    pub employee_id: EmployeeId,
    pub amount: f64,
    pub fee: f64,
    pub status: EwaStatus,
    pub requested_at: NaiveDateTime,
    pub disbursed_at: Option<NaiveDateTime>,
}
