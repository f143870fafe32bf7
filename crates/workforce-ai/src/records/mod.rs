//! Employee, leave, timesheet, and earned-wage records plus the store seam
//! the rule engines evaluate against.

pub mod domain;
mod memory;
pub mod seed;
pub mod store;

pub use domain::{
    Employee, EmployeeId, EmploymentStatus, EwaStatus, EwaTransaction, LeaveBalance, LeaveType,
    Timesheet, TimesheetStatus,
};
pub use memory::MemoryStore;
pub use seed::{roster_from_reader, seed_store, RosterError, SeedSummary};
pub use store::{RecordStore, StoreError};
