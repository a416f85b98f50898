pub mod attendance_sync;
pub mod ledger;
pub mod payroll;
pub mod policy;
pub mod settlement;
