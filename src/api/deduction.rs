use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use crate::api::engine_error_response;
use crate::engine::ledger::{
    add_manual_deduction, list_deductions, outstanding_balance, NewDeduction,
};
use crate::model::deduction::{Deduction, DeductionType};

#[derive(Deserialize, ToSchema)]
pub struct CreateDeduction {
    #[schema(example = 1)]
    pub employee_id: i64,

    #[schema(example = 2)]
    pub branch_id: i64,

    /// One of advance, loan, manual, late_fee. `half_day` is rejected.
    #[serde(rename = "type")]
    #[schema(example = "advance")]
    pub kind: DeductionType,

    #[schema(example = 1000.0)]
    pub amount: f64,

    #[schema(example = "2026-01-10", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "festival advance")]
    pub note: Option<String>,

    /// Acting user, recorded for audit attribution.
    #[schema(example = 3)]
    pub created_by: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct DeductionQuery {
    #[schema(example = 1)]
    pub employee_id: i64,

    /// Include rows already retired by settlement. Defaults to false, the
    /// outstanding-balance view.
    #[schema(example = false)]
    pub include_repaid: Option<bool>,
}

/// Record an advance/loan/manual/late-fee deduction
#[utoipa::path(
    post,
    path = "/api/v1/deductions",
    request_body = CreateDeduction,
    responses(
        (status = 201, description = "Deduction added", body = Object, example = json!({
            "message": "Deduction added",
            "id": 7
        })),
        (status = 400, description = "Invalid type or amount"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Deductions"
)]
pub async fn create(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateDeduction>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let result = add_manual_deduction(
        pool.get_ref(),
        NewDeduction {
            employee_id: payload.employee_id,
            branch_id: payload.branch_id,
            kind: payload.kind,
            amount: payload.amount,
            date: payload.date,
            note: payload.note.unwrap_or_default(),
            created_by: payload.created_by,
        },
    )
    .await;

    match result {
        Ok(id) => Ok(HttpResponse::Created().json(json!({
            "message": "Deduction added",
            "id": id
        }))),
        Err(e) => Ok(engine_error_response(e)),
    }
}

/// Deduction history for an employee, newest first
#[utoipa::path(
    get,
    path = "/api/v1/deductions",
    params(DeductionQuery),
    responses(
        (status = 200, description = "Deductions", body = [Deduction]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Deductions"
)]
pub async fn list(
    pool: web::Data<SqlitePool>,
    query: web::Query<DeductionQuery>,
) -> actix_web::Result<impl Responder> {
    let result = list_deductions(
        pool.get_ref(),
        query.employee_id,
        query.include_repaid.unwrap_or(false),
    )
    .await;

    match result {
        Ok(rows) => Ok(HttpResponse::Ok().json(rows)),
        Err(e) => Ok(engine_error_response(e)),
    }
}

/// Outstanding (unrepaid) balance for an employee
#[utoipa::path(
    get,
    path = "/api/v1/deductions/balance",
    params(
        ("employee_id" = i64, Query, description = "Employee ID", example = 1)
    ),
    responses(
        (status = 200, description = "Outstanding balance", body = Object, example = json!({
            "employee_id": 1,
            "outstanding_balance": 1000.0
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Deductions"
)]
pub async fn balance(
    pool: web::Data<SqlitePool>,
    query: web::Query<BalanceQuery>,
) -> actix_web::Result<impl Responder> {
    match outstanding_balance(pool.get_ref(), query.employee_id).await {
        Ok(total) => Ok(HttpResponse::Ok().json(json!({
            "employee_id": query.employee_id,
            "outstanding_balance": total
        }))),
        Err(e) => Ok(engine_error_response(e)),
    }
}

#[derive(Deserialize, IntoParams)]
pub struct BalanceQuery {
    pub employee_id: i64,
}
