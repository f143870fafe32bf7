//! Demo dataset: twelve South African employee profiles with leave balances,
//! one approved timesheet each for the current pay period, and a single
//! outstanding earned-wage transaction.

use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::i18n::Language;

use super::domain::{
    Employee, EmployeeId, EmploymentStatus, EwaStatus, EwaTransaction, LeaveBalance, LeaveType,
    Timesheet, TimesheetStatus,
};
use super::store::{RecordStore, StoreError};

pub fn pay_period_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid pay period start")
}

pub fn pay_period_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 15).expect("valid pay period end")
}

/// Mid-period date the demo evaluates eligibility and payslips against.
pub fn demo_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 10).expect("valid reference date")
}

/// Counts reported back after a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub employees: usize,
    pub seeded: bool,
}

struct EmployeeSeed {
    id: &'static str,
    name: &'static str,
    department: &'static str,
    role: &'static str,
    hire_date: (i32, u32, u32),
    hourly_rate: f64,
    preferred_language: Language,
    bank_account_last4: &'static str,
    employment_status: EmploymentStatus,
    // (balance, accrued_ytd, used_ytd) for annual, sick, family.
    leave: [(f64, f64, f64); 3],
    hours_worked: f64,
}

const EMPLOYEES: [EmployeeSeed; 12] = [
    EmployeeSeed {
        id: "EMP001",
        name: "Sipho Dlamini",
        department: "Retail - Checkers Sandton",
        role: "Sales Assistant",
        hire_date: (2024, 3, 15),
        hourly_rate: 48.50,
        preferred_language: Language::Zu,
        bank_account_last4: "4521",
        employment_status: EmploymentStatus::Active,
        leave: [(12.0, 15.0, 3.0), (8.0, 10.0, 2.0), (3.0, 3.0, 0.0)],
        hours_worked: 88.0,
    },
    EmployeeSeed {
        id: "EMP002",
        name: "Thandiwe Nkosi",
        department: "Security - Fidelity Rosebank",
        role: "Security Officer",
        hire_date: (2023, 8, 1),
        hourly_rate: 42.00,
        preferred_language: Language::Xh,
        bank_account_last4: "7832",
        employment_status: EmploymentStatus::Active,
        leave: [(10.0, 15.0, 5.0), (6.0, 10.0, 4.0), (2.0, 3.0, 1.0)],
        hours_worked: 80.0,
    },
    EmployeeSeed {
        id: "EMP003",
        name: "Johan van der Berg",
        department: "Warehouse - DHL Johannesburg",
        role: "Warehouse Supervisor",
        hire_date: (2022, 1, 10),
        hourly_rate: 55.00,
        preferred_language: Language::Af,
        bank_account_last4: "1156",
        employment_status: EmploymentStatus::Active,
        leave: [(2.0, 15.0, 13.0), (4.0, 10.0, 6.0), (1.0, 3.0, 2.0)],
        hours_worked: 92.0,
    },
    EmployeeSeed {
        id: "EMP004",
        name: "Lerato Molefe",
        department: "Call Centre - Vodacom",
        role: "Customer Service Agent",
        hire_date: (2025, 12, 28),
        hourly_rate: 38.00,
        preferred_language: Language::Nso,
        bank_account_last4: "9043",
        employment_status: EmploymentStatus::Probation,
        leave: [(1.0, 1.0, 0.0), (1.0, 1.0, 0.0), (0.0, 0.0, 0.0)],
        hours_worked: 60.0,
    },
    EmployeeSeed {
        id: "EMP005",
        name: "Nomvula Sithole",
        department: "Hospitality - Hilton Sandton",
        role: "Front Desk Agent",
        hire_date: (2024, 6, 1),
        hourly_rate: 45.00,
        preferred_language: Language::En,
        bank_account_last4: "3367",
        employment_status: EmploymentStatus::Active,
        leave: [(9.0, 12.0, 3.0), (7.0, 10.0, 3.0), (2.0, 3.0, 1.0)],
        hours_worked: 76.0,
    },
    EmployeeSeed {
        id: "EMP006",
        name: "Thabo Mokoena",
        department: "Mining - Anglo American",
        role: "Shift Foreman",
        hire_date: (2020, 5, 15),
        hourly_rate: 85.00,
        preferred_language: Language::St,
        bank_account_last4: "6210",
        employment_status: EmploymentStatus::Active,
        leave: [(15.0, 20.0, 5.0), (9.0, 10.0, 1.0), (3.0, 3.0, 0.0)],
        hours_worked: 96.0,
    },
    EmployeeSeed {
        id: "EMP007",
        name: "Precious Ndlovu",
        department: "Fast Food - McDonald's",
        role: "Crew Member",
        hire_date: (2025, 9, 1),
        hourly_rate: 35.00,
        preferred_language: Language::Zu,
        bank_account_last4: "8874",
        employment_status: EmploymentStatus::Active,
        leave: [(4.0, 5.0, 1.0), (9.0, 10.0, 1.0), (3.0, 3.0, 0.0)],
        hours_worked: 72.0,
    },
    EmployeeSeed {
        id: "EMP008",
        name: "Pieter Botha",
        department: "Logistics - Shoprite DC",
        role: "Dispatch Coordinator",
        hire_date: (2023, 2, 20),
        hourly_rate: 52.00,
        preferred_language: Language::Af,
        bank_account_last4: "2590",
        employment_status: EmploymentStatus::Active,
        leave: [(11.0, 15.0, 4.0), (8.0, 10.0, 2.0), (3.0, 3.0, 0.0)],
        hours_worked: 84.0,
    },
    EmployeeSeed {
        id: "EMP009",
        name: "Lindiwe Khumalo",
        department: "Healthcare - Netcare",
        role: "Nursing Assistant",
        hire_date: (2023, 11, 5),
        hourly_rate: 65.00,
        preferred_language: Language::Xh,
        bank_account_last4: "5148",
        employment_status: EmploymentStatus::Active,
        leave: [(8.0, 12.0, 4.0), (5.0, 10.0, 5.0), (1.0, 3.0, 2.0)],
        hours_worked: 80.0,
    },
    EmployeeSeed {
        id: "EMP010",
        name: "David Okonkwo",
        department: "Manufacturing - Toyota",
        role: "Assembly Technician",
        hire_date: (2022, 7, 12),
        hourly_rate: 58.00,
        preferred_language: Language::En,
        bank_account_last4: "4396",
        employment_status: EmploymentStatus::Active,
        leave: [(14.0, 18.0, 4.0), (10.0, 10.0, 0.0), (3.0, 3.0, 0.0)],
        hours_worked: 100.0,
    },
    EmployeeSeed {
        id: "EMP011",
        name: "Ayanda Zulu",
        department: "Cleaning - Bidvest",
        role: "Cleaning Operative",
        hire_date: (2024, 10, 1),
        hourly_rate: 32.00,
        preferred_language: Language::Zu,
        bank_account_last4: "7021",
        employment_status: EmploymentStatus::Active,
        leave: [(6.0, 8.0, 2.0), (8.0, 10.0, 2.0), (3.0, 3.0, 0.0)],
        hours_worked: 68.0,
    },
    EmployeeSeed {
        id: "EMP012",
        name: "Maria van Wyk",
        department: "Restaurant - Spur",
        role: "Waitress",
        hire_date: (2025, 4, 15),
        hourly_rate: 40.00,
        preferred_language: Language::Af,
        bank_account_last4: "1835",
        employment_status: EmploymentStatus::Active,
        leave: [(5.0, 6.0, 1.0), (9.0, 10.0, 1.0), (2.0, 3.0, 1.0)],
        hours_worked: 48.0,
    },
];

impl EmployeeSeed {
    fn employee(&self) -> Result<Employee, StoreError> {
        let (year, month, day) = self.hire_date;
        let hire_date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| StoreError::Unavailable(format!("invalid hire date for {}", self.id)))?;
        Ok(Employee {
            id: EmployeeId::new(self.id),
            name: self.name.to_string(),
            department: self.department.to_string(),
            role: self.role.to_string(),
            hire_date,
            hourly_rate: self.hourly_rate,
            preferred_language: self.preferred_language,
            bank_account_last4: self.bank_account_last4.to_string(),
            employment_status: self.employment_status,
        })
    }
}

/// Seed the store with the demo dataset. Idempotent: a non-empty employee
/// table skips the run entirely.
pub fn seed_store(store: &dyn RecordStore) -> Result<SeedSummary, StoreError> {
    let existing = store.employee_count()?;
    if existing > 0 {
        tracing::info!(existing, "store already seeded, skipping");
        return Ok(SeedSummary {
            employees: existing,
            seeded: false,
        });
    }

    for seed in &EMPLOYEES {
        store.insert_employee(seed.employee()?)?;

        for (leave_type, (balance, accrued, used)) in LeaveType::ALL.iter().zip(seed.leave) {
            store.insert_leave_balance(LeaveBalance {
                employee_id: EmployeeId::new(seed.id),
                leave_type: *leave_type,
                balance_days: balance,
                accrued_ytd: accrued,
                used_ytd: used,
            })?;
        }

        store.insert_timesheet(Timesheet {
            employee_id: EmployeeId::new(seed.id),
            pay_period_start: pay_period_start(),
            pay_period_end: pay_period_end(),
            hours_worked: seed.hours_worked,
            status: TimesheetStatus::Approved,
        })?;
    }

    // Thandiwe carries an R800 outstanding advance from earlier in the period.
    let requested_at = NaiveDate::from_ymd_opt(2026, 2, 5)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .ok_or_else(|| StoreError::Unavailable("invalid seed timestamp".to_string()))?;
    store.insert_ewa_transaction(EwaTransaction {
        id: "EWA-20260205-001".to_string(),
        employee_id: EmployeeId::new("EMP002"),
        amount: 800.0,
        fee: 10.0,
        status: EwaStatus::Disbursed,
        requested_at,
        disbursed_at: advance_minute(requested_at),
    })?;

    tracing::info!(employees = EMPLOYEES.len(), "store seeded");
    Ok(SeedSummary {
        employees: EMPLOYEES.len(),
        seeded: true,
    })
}

fn advance_minute(at: NaiveDateTime) -> Option<NaiveDateTime> {
    at.checked_add_signed(chrono::Duration::minutes(1))
}

/// Roster row for CSV-driven overrides of the employee table, in the export
/// format operations teams already produce.
#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Employee ID")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Department")]
    department: String,
    #[serde(rename = "Role")]
    role: String,
    #[serde(rename = "Hire Date")]
    hire_date: String,
    #[serde(rename = "Hourly Rate")]
    hourly_rate: f64,
    #[serde(rename = "Preferred Language")]
    preferred_language: String,
    #[serde(rename = "Bank Account Last4")]
    bank_account_last4: String,
    #[serde(rename = "Employment Status")]
    employment_status: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("roster parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

/// Parse an employee roster from a CSV export.
pub fn roster_from_reader<R: Read>(reader: R) -> Result<Vec<Employee>, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut employees = Vec::new();
    for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = record?;
        employees.push(roster_employee(index + 1, row)?);
    }
    Ok(employees)
}

fn roster_employee(row: usize, raw: RosterRow) -> Result<Employee, RosterError> {
    let hire_date = NaiveDate::parse_from_str(&raw.hire_date, "%Y-%m-%d").map_err(|err| {
        RosterError::InvalidRow {
            row,
            message: format!("hire date '{}' is not YYYY-MM-DD ({err})", raw.hire_date),
        }
    })?;

    let preferred_language =
        Language::from_code(&raw.preferred_language).ok_or_else(|| RosterError::InvalidRow {
            row,
            message: format!("unsupported language code '{}'", raw.preferred_language),
        })?;

    let employment_status = match raw.employment_status.to_ascii_lowercase().as_str() {
        "active" => EmploymentStatus::Active,
        "probation" => EmploymentStatus::Probation,
        "terminated" => EmploymentStatus::Terminated,
        other => {
            return Err(RosterError::InvalidRow {
                row,
                message: format!("unknown employment status '{other}'"),
            })
        }
    };

    Ok(Employee {
        id: EmployeeId::new(raw.id),
        name: raw.name,
        department: raw.department,
        role: raw.role,
        hire_date,
        hourly_rate: raw.hourly_rate,
        preferred_language,
        bank_account_last4: raw.bank_account_last4,
        employment_status,
    })
}
