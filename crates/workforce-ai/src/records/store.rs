use super::domain::{Employee, EmployeeId, EwaTransaction, LeaveBalance, LeaveType, Timesheet};

/// Storage abstraction over the employee, leave, timesheet, and transaction
/// tables so the rule engines can be exercised against an isolated store per
/// test. Every method is a complete transaction: `debit_leave` in particular
/// must re-check and apply the balance mutation under a single lock so a
/// half-applied debit can never be observed.
pub trait RecordStore: Send + Sync {
    fn employee(&self, id: &EmployeeId) -> Result<Option<Employee>, StoreError>;
    fn employees(&self) -> Result<Vec<Employee>, StoreError>;
    fn employee_count(&self) -> Result<usize, StoreError>;
    fn insert_employee(&self, employee: Employee) -> Result<(), StoreError>;

    fn leave_balances(&self, employee_id: &EmployeeId) -> Result<Vec<LeaveBalance>, StoreError>;
    fn insert_leave_balance(&self, balance: LeaveBalance) -> Result<(), StoreError>;
    /// Atomically move `days` from `balance_days` to `used_ytd` for the given
    /// employee and leave type, returning the updated row.
    fn debit_leave(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
        days: f64,
    ) -> Result<LeaveBalance, StoreError>;

    fn timesheets(&self, employee_id: &EmployeeId) -> Result<Vec<Timesheet>, StoreError>;
    fn insert_timesheet(&self, timesheet: Timesheet) -> Result<(), StoreError>;

    fn ewa_transactions(&self, employee_id: &EmployeeId)
        -> Result<Vec<EwaTransaction>, StoreError>;
    fn insert_ewa_transaction(&self, transaction: EwaTransaction) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: f64, available: f64 },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
