use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    strum_macros::Display,
    strum_macros::EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeductionType {
    /// Managed exclusively by the attendance synchronizer.
    HalfDay,
    Advance,
    Loan,
    Manual,
    LateFee,
}

impl DeductionType {
    /// Types a caller may append through the ledger API. `half_day` rows are
    /// created and destroyed only by attendance re-marks.
    pub fn is_manual(self) -> bool {
        !matches!(self, DeductionType::HalfDay)
    }
}

/// A debit against an employee's future pay. Non-half-day rows are never
/// hard-deleted; settlement retires them by flipping `is_repaid`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "employee_id": 1,
        "branch_id": 2,
        "type": "advance",
        "amount": 1000.0,
        "date": "2026-01-10",
        "note": "festival advance",
        "is_repaid": false,
        "created_by": 3
    })
)]
pub struct Deduction {
    pub id: i64,
    pub employee_id: i64,
    pub branch_id: i64,

    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: DeductionType,

    pub amount: f64,

    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,

    pub note: String,
    pub is_repaid: bool,
    pub created_by: i64,
}
