use chrono::{NaiveDate, NaiveTime};
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
pub enum AttendanceStatus {
    FullDay,
    HalfDay,
    Absent,
}

/// One mark per employee per calendar date, updated in place on re-marks.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = 1)]
    pub employee_id: i64,

    #[schema(example = 2)]
    pub branch_id: i64,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "half_day")]
    pub status: AttendanceStatus,

    #[schema(example = "09:05:00", value_type = String, nullable = true)]
    pub check_in: Option<NaiveTime>,

    #[schema(example = "13:30:00", value_type = String, nullable = true)]
    pub check_out: Option<NaiveTime>,

    #[schema(example = "left early, fever")]
    pub note: String,
}

/// Per-month attendance tally used by the payroll calculator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceSummary {
    #[schema(example = 24)]
    pub total_days: i64,

    #[schema(example = 20)]
    pub full_days: i64,

    #[schema(example = 2)]
    pub half_days: i64,

    #[schema(example = 2)]
    pub absent_days: i64,
}
