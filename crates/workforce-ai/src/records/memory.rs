use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{Employee, EmployeeId, EwaTransaction, LeaveBalance, LeaveType, Timesheet};
use super::store::{RecordStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    employees: BTreeMap<EmployeeId, Employee>,
    leave_balances: Vec<LeaveBalance>,
    timesheets: Vec<Timesheet>,
    ewa_transactions: Vec<EwaTransaction>,
}

/// In-memory record store. One mutex over all tables serializes every
/// mutation, which is what makes `debit_leave` a genuine check-and-apply.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl RecordStore for MemoryStore {
    fn employee(&self, id: &EmployeeId) -> Result<Option<Employee>, StoreError> {
        Ok(self.lock()?.employees.get(id).cloned())
    }

    fn employees(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(self.lock()?.employees.values().cloned().collect())
    }

    fn employee_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.employees.len())
    }

    fn insert_employee(&self, employee: Employee) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        if tables.employees.contains_key(&employee.id) {
            return Err(StoreError::Conflict);
        }
        tables.employees.insert(employee.id.clone(), employee);
        Ok(())
    }

    fn leave_balances(&self, employee_id: &EmployeeId) -> Result<Vec<LeaveBalance>, StoreError> {
        Ok(self
            .lock()?
            .leave_balances
            .iter()
            .filter(|balance| &balance.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn insert_leave_balance(&self, balance: LeaveBalance) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        let duplicate = tables
            .leave_balances
            .iter()
            .any(|row| row.employee_id == balance.employee_id && row.leave_type == balance.leave_type);
        if duplicate {
            return Err(StoreError::Conflict);
        }
        tables.leave_balances.push(balance);
        Ok(())
    }

    fn debit_leave(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
        days: f64,
    ) -> Result<LeaveBalance, StoreError> {
        let mut tables = self.lock()?;
        let row = tables
            .leave_balances
            .iter_mut()
            .find(|row| &row.employee_id == employee_id && row.leave_type == leave_type)
            .ok_or(StoreError::NotFound)?;

        if row.balance_days < days {
            return Err(StoreError::InsufficientBalance {
                requested: days,
                available: row.balance_days,
            });
        }

        row.balance_days -= days;
        row.used_ytd += days;
        Ok(row.clone())
    }

    fn timesheets(&self, employee_id: &EmployeeId) -> Result<Vec<Timesheet>, StoreError> {
        Ok(self
            .lock()?
            .timesheets
            .iter()
            .filter(|sheet| &sheet.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn insert_timesheet(&self, timesheet: Timesheet) -> Result<(), StoreError> {
        self.lock()?.timesheets.push(timesheet);
        Ok(())
    }

    fn ewa_transactions(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<EwaTransaction>, StoreError> {
        Ok(self
            .lock()?
            .ewa_transactions
            .iter()
            .filter(|transaction| &transaction.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn insert_ewa_transaction(&self, transaction: EwaTransaction) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        if tables
            .ewa_transactions
            .iter()
            .any(|existing| existing.id == transaction.id)
        {
            return Err(StoreError::Conflict);
        }
        tables.ewa_transactions.push(transaction);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::i18n::Language;
    use crate::records::domain::EmploymentStatus;

    fn employee(id: &str) -> Employee {
        Employee {
            id: EmployeeId::new(id),
            name: "Test Person".to_string(),
            department: "QA".to_string(),
            role: "Tester".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date"),
            hourly_rate: 40.0,
            preferred_language: Language::En,
            bank_account_last4: "0000".to_string(),
            employment_status: EmploymentStatus::Active,
        }
    }

    fn balance(id: &str, days: f64) -> LeaveBalance {
        LeaveBalance {
            employee_id: EmployeeId::new(id),
            leave_type: LeaveType::Annual,
            balance_days: days,
            accrued_ytd: days,
            used_ytd: 0.0,
        }
    }

    #[test]
    fn duplicate_employee_insert_conflicts() {
        let store = MemoryStore::default();
        store.insert_employee(employee("EMP001")).expect("insert");
        assert!(matches!(
            store.insert_employee(employee("EMP001")),
            Err(StoreError::Conflict)
        ));
        assert_eq!(store.employee_count().expect("count"), 1);
    }

    #[test]
    fn debit_moves_days_between_columns() {
        let store = MemoryStore::default();
        store
            .insert_leave_balance(balance("EMP001", 10.0))
            .expect("insert");

        let updated = store
            .debit_leave(&EmployeeId::new("EMP001"), LeaveType::Annual, 3.0)
            .expect("debit succeeds");
        assert_eq!(updated.balance_days, 7.0);
        assert_eq!(updated.used_ytd, 3.0);
    }

    #[test]
    fn overdrawn_debit_leaves_row_untouched() {
        let store = MemoryStore::default();
        store
            .insert_leave_balance(balance("EMP001", 2.0))
            .expect("insert");

        let result = store.debit_leave(&EmployeeId::new("EMP001"), LeaveType::Annual, 5.0);
        assert!(matches!(
            result,
            Err(StoreError::InsufficientBalance {
                requested,
                available
            }) if requested == 5.0 && available == 2.0
        ));

        let rows = store
            .leave_balances(&EmployeeId::new("EMP001"))
            .expect("balances");
        assert_eq!(rows[0].balance_days, 2.0);
        assert_eq!(rows[0].used_ytd, 0.0);
    }

    #[test]
    fn debit_for_missing_row_is_not_found() {
        let store = MemoryStore::default();
        assert!(matches!(
            store.debit_leave(&EmployeeId::new("EMP404"), LeaveType::Sick, 1.0),
            Err(StoreError::NotFound)
        ));
    }
}
