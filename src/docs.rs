use utoipa::OpenApi;

use crate::api::attendance::{
    AttendanceQuery, DailyReportQuery, DailyReportRow, MarkAttendanceRequest, SummaryQuery,
};
use crate::api::deduction::{CreateDeduction, DeductionQuery};
use crate::api::employee::{CreateEmployee, EmployeeQuery, UpdateEmployee};
use crate::api::payroll::{BreakdownQuery, SettleRequest};
use crate::api::settings::{BranchPolicyResponse, UpdateBranchPolicy};
use crate::engine::payroll::SalaryBreakdown;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
use crate::model::deduction::{Deduction, DeductionType};
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::salary_payment::{PaymentMethod, SalaryPayment};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BranchPay API",
        version = "1.0.0",
        description = r#"
## Multi-Branch Payroll & Workforce API

Record-keeper for a retail/service chain: daily attendance, a per-employee
deduction ledger, monthly gross-to-net salary calculation, and irreversible
salary settlement.

### Key behaviors
- Marking a date `half_day` automatically books the matching pay deduction;
  re-marking the date removes or recreates it in the same transaction.
- Advances, loans, manual penalties and late fees accumulate per employee
  until a settlement retires them.
- The salary breakdown is a pure calculation; settling persists the payment
  and closes out the ledger atomically.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::mark,
        crate::api::attendance::list,
        crate::api::attendance::summary,
        crate::api::attendance::daily_report,

        crate::api::deduction::create,
        crate::api::deduction::list,
        crate::api::deduction::balance,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::payroll::breakdown,
        crate::api::payroll::settle,
        crate::api::payroll::payments,

        crate::api::settings::get_settings,
        crate::api::settings::update_settings
    ),
    components(
        schemas(
            AttendanceRecord,
            AttendanceStatus,
            AttendanceSummary,
            AttendanceQuery,
            MarkAttendanceRequest,
            SummaryQuery,
            DailyReportQuery,
            DailyReportRow,
            Deduction,
            DeductionType,
            DeductionQuery,
            CreateDeduction,
            Employee,
            EmployeeStatus,
            EmployeeQuery,
            CreateEmployee,
            UpdateEmployee,
            SalaryBreakdown,
            BreakdownQuery,
            SettleRequest,
            SalaryPayment,
            PaymentMethod,
            BranchPolicyResponse,
            UpdateBranchPolicy
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance marking and reports"),
        (name = "Deductions", description = "Per-employee deduction ledger"),
        (name = "Employee", description = "Employee directory"),
        (name = "Payroll", description = "Salary calculation and settlement"),
        (name = "Settings", description = "Branch payroll policy"),
    )
)]
pub struct ApiDoc;
