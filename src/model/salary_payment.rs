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
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Cheque,
    Upi,
}

/// Immutable record of a settled salary period. Written exactly once by the
/// settlement processor; there is no update or delete path.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SalaryPayment {
    #[schema(example = 12)]
    pub id: i64,

    #[schema(example = 1)]
    pub employee_id: i64,

    #[schema(example = 2)]
    pub branch_id: i64,

    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub period_start: NaiveDate,

    #[schema(example = "2026-01-31", value_type = String, format = "date")]
    pub period_end: NaiveDate,

    #[schema(example = 20000.0)]
    pub gross_salary: f64,

    #[schema(example = 1666.67)]
    pub total_deductions: f64,

    #[schema(example = 500.0)]
    pub bonuses: f64,

    #[schema(example = 18833.33)]
    pub net_paid: f64,

    #[schema(example = "2026-02-01", value_type = String, format = "date")]
    pub paid_on: NaiveDate,

    #[schema(example = "bank_transfer")]
    pub payment_method: PaymentMethod,

    pub notes: String,

    #[schema(example = 3)]
    pub created_by: i64,
}
