pub mod attendance;
pub mod deduction;
pub mod employee;
pub mod salary_payment;
