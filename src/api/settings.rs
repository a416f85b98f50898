use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;
use utoipa::ToSchema;

use crate::engine::policy::BranchPolicy;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct BranchPolicyResponse {
    #[schema(example = 2)]
    pub branch_id: i64,
    #[schema(example = 50.0)]
    pub half_day_deduction_percent: f64,
    #[schema(example = 50.0)]
    pub bonus_per_task: f64,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateBranchPolicy {
    #[schema(example = 40.0)]
    pub half_day_deduction_percent: Option<f64>,
    #[schema(example = 75.0)]
    pub bonus_per_task: Option<f64>,
}

/// Read the branch's payroll policy (defaults included)
#[utoipa::path(
    get,
    path = "/api/v1/settings/{branch_id}",
    params(("branch_id", description = "Branch ID")),
    responses(
        (status = 200, description = "Branch policy", body = BranchPolicyResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Settings"
)]
pub async fn get_settings(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let branch_id = path.into_inner();
    let policy = BranchPolicy::load(pool.get_ref(), branch_id)
        .await
        .map_err(|e| {
            error!(error = %e, branch_id, "Failed to load branch policy");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(BranchPolicyResponse {
        branch_id,
        half_day_deduction_percent: policy.half_day_deduction_percent,
        bonus_per_task: policy.bonus_per_task,
    }))
}

/// Upsert the branch's payroll policy keys
#[utoipa::path(
    put,
    path = "/api/v1/settings/{branch_id}",
    params(("branch_id", description = "Branch ID")),
    request_body = UpdateBranchPolicy,
    responses(
        (status = 200, description = "Policy updated", body = BranchPolicyResponse),
        (status = 400, description = "Negative value"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Settings"
)]
pub async fn update_settings(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateBranchPolicy>,
) -> actix_web::Result<impl Responder> {
    let branch_id = path.into_inner();

    let updates = [
        ("half_day_deduction_percent", payload.half_day_deduction_percent),
        ("bonus_per_task", payload.bonus_per_task),
    ];

    for (key, value) in updates {
        let Some(value) = value else { continue };
        if value < 0.0 {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": format!("{key} must not be negative")
            })));
        }
        sqlx::query(
            r#"
            INSERT INTO branch_settings (branch_id, setting_key, setting_value)
            VALUES (?, ?, ?)
            ON CONFLICT (branch_id, setting_key) DO UPDATE SET setting_value = excluded.setting_value
            "#,
        )
        .bind(branch_id)
        .bind(key)
        .bind(value.to_string())
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, branch_id, key, "Failed to store branch setting");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    }

    let policy = BranchPolicy::load(pool.get_ref(), branch_id)
        .await
        .map_err(|e| {
            error!(error = %e, branch_id, "Failed to reload branch policy");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(BranchPolicyResponse {
        branch_id,
        half_day_deduction_percent: policy.half_day_deduction_percent,
        bonus_per_task: policy.bonus_per_task,
    }))
}
