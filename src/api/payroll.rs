use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use crate::api::engine_error_response;
use crate::engine::payroll::{compute_monthly_salary, SalaryBreakdown, SqlTaskSource};
use crate::engine::settlement::{list_payments, process_salary_payment, SettlementRequest};
use crate::model::salary_payment::{PaymentMethod, SalaryPayment};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct BreakdownQuery {
    #[schema(example = 1)]
    pub month: u32,
    #[schema(example = 2026)]
    pub year: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct SettleRequest {
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

    #[schema(example = "January salary")]
    pub notes: Option<String>,

    /// Acting user, recorded on the payment row.
    #[schema(example = 3)]
    pub created_by: i64,
}

/// Compute the gross-to-net breakdown for one employee and month
///
/// A pure read; nothing is persisted. Recompute as often as needed before
/// settling.
#[utoipa::path(
    get,
    path = "/api/v1/payroll/{employee_id}/breakdown",
    params(
        ("employee_id", description = "Employee ID"),
        BreakdownQuery
    ),
    responses(
        (status = 200, description = "Salary breakdown", body = SalaryBreakdown),
        (status = 400, description = "Invalid month"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn breakdown(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    query: web::Query<BreakdownQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let tasks = SqlTaskSource::new(pool.get_ref());

    let result =
        compute_monthly_salary(pool.get_ref(), &tasks, employee_id, query.month, query.year)
            .await;

    match result {
        Ok(breakdown) => Ok(HttpResponse::Ok().json(breakdown)),
        Err(e) => Ok(engine_error_response(e)),
    }
}

/// Settle a salary period: record the payment and retire open deductions
///
/// Not idempotent: posting the same period twice records two payments.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/{employee_id}/settle",
    params(
        ("employee_id", description = "Employee ID")
    ),
    request_body = SettleRequest,
    responses(
        (status = 201, description = "Salary settled", body = Object, example = json!({
            "message": "Salary processed",
            "id": 12
        })),
        (status = 400, description = "Invalid period or amounts"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Settlement failed, fully rolled back")
    ),
    tag = "Payroll"
)]
pub async fn settle(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<SettleRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let payload = payload.into_inner();

    let result = process_salary_payment(
        pool.get_ref(),
        employee_id,
        SettlementRequest {
            branch_id: payload.branch_id,
            period_start: payload.period_start,
            period_end: payload.period_end,
            gross_salary: payload.gross_salary,
            total_deductions: payload.total_deductions,
            bonuses: payload.bonuses,
            net_paid: payload.net_paid,
            paid_on: payload.paid_on,
            payment_method: payload.payment_method,
            notes: payload.notes.unwrap_or_default(),
            created_by: payload.created_by,
        },
    )
    .await;

    match result {
        Ok(id) => Ok(HttpResponse::Created().json(json!({
            "message": "Salary processed",
            "id": id
        }))),
        Err(e) => Ok(engine_error_response(e)),
    }
}

/// Salary payment history for an employee, newest period first
#[utoipa::path(
    get,
    path = "/api/v1/payroll/{employee_id}/payments",
    params(
        ("employee_id", description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Payments", body = [SalaryPayment]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn payments(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    match list_payments(pool.get_ref(), path.into_inner()).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(rows)),
        Err(e) => Ok(engine_error_response(e)),
    }
}
