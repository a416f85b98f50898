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
pub enum EmployeeStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "branch_id": 2,
        "name": "Ravi Kumar",
        "phone": "+919812345678",
        "age": 28,
        "role": "stylist",
        "monthly_salary": 20000.0,
        "join_date": "2024-03-01",
        "status": "active"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = 2)]
    pub branch_id: i64,

    #[schema(example = "Ravi Kumar")]
    pub name: String,

    #[schema(example = "+919812345678", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = 28, nullable = true)]
    pub age: Option<i64>,

    #[schema(example = "stylist")]
    pub role: String,

    #[schema(example = 20000.0)]
    pub monthly_salary: f64,

    #[schema(example = "2024-03-01", value_type = String, format = "date")]
    pub join_date: NaiveDate,

    #[schema(example = "active")]
    pub status: EmployeeStatus,
}
