use actix_web::{web, HttpResponse, Responder};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::api::engine_error_response;
use crate::engine::attendance_sync::{mark_attendance, MarkAttendance};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceSummary};

#[derive(Deserialize, ToSchema)]
pub struct MarkAttendanceRequest {
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

    #[schema(example = "left early")]
    pub note: Option<String>,

    /// Acting user, recorded on any auto-created deduction.
    #[schema(example = 3)]
    pub marked_by: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceQuery {
    #[schema(example = 1)]
    pub employee_id: Option<i64>,
    #[schema(example = 2)]
    pub branch_id: Option<i64>,
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2026-01-31", value_type = String, format = "date")]
    pub end_date: Option<NaiveDate>,
    #[schema(example = "half_day")]
    pub status: Option<AttendanceStatus>,
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 25)]
    pub per_page: Option<u32>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SummaryQuery {
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = 1)]
    pub month: u32,
    #[schema(example = 2026)]
    pub year: i32,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct DailyReportQuery {
    #[schema(example = 2)]
    pub branch_id: i64,
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
}

/// One line of the per-branch daily report: every active employee with that
/// day's mark, `not_marked` when no row exists yet.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct DailyReportRow {
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = "Ravi Kumar")]
    pub name: String,
    #[schema(example = "stylist")]
    pub role: String,
    #[schema(example = "not_marked")]
    pub attendance_status: String,
    #[schema(example = "09:05:00", value_type = String, nullable = true)]
    pub check_in: Option<NaiveTime>,
    #[schema(example = "18:00:00", value_type = String, nullable = true)]
    pub check_out: Option<NaiveTime>,
    pub note: Option<String>,
}

/// Mark (or re-mark) attendance for one employee and date
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = MarkAttendanceRequest,
    responses(
        (status = 200, description = "Attendance recorded", body = Object, example = json!({
            "message": "Attendance recorded",
            "id": 17
        })),
        (status = 400, description = "Invalid status or payload"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn mark(
    pool: web::Data<SqlitePool>,
    payload: web::Json<MarkAttendanceRequest>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let result = mark_attendance(
        pool.get_ref(),
        MarkAttendance {
            employee_id: payload.employee_id,
            branch_id: payload.branch_id,
            date: payload.date,
            status: payload.status,
            check_in: payload.check_in,
            check_out: payload.check_out,
            note: payload.note.unwrap_or_default(),
            marked_by: payload.marked_by,
        },
    )
    .await;

    match result {
        Ok(id) => Ok(HttpResponse::Ok().json(json!({
            "message": "Attendance recorded",
            "id": id
        }))),
        Err(e) => Ok(engine_error_response(e)),
    }
}

/// List attendance records with filters
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance records", body = [AttendanceRecord]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list(
    pool: web::Data<SqlitePool>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(25).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let rows = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT * FROM attendance
        WHERE (?1 IS NULL OR employee_id = ?1)
          AND (?2 IS NULL OR branch_id = ?2)
          AND (?3 IS NULL OR date >= ?3)
          AND (?4 IS NULL OR date <= ?4)
          AND (?5 IS NULL OR status = ?5)
        ORDER BY date DESC, employee_id ASC
        LIMIT ?6 OFFSET ?7
        "#,
    )
    .bind(query.employee_id)
    .bind(query.branch_id)
    .bind(query.start_date)
    .bind(query.end_date)
    .bind(query.status)
    .bind(per_page as i64)
    .bind(offset as i64)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch attendance list");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(rows))
}

/// Monthly attendance tally for an employee
#[utoipa::path(
    get,
    path = "/api/v1/attendance/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Attendance summary", body = AttendanceSummary),
        (status = 400, description = "Invalid month"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn summary(
    pool: web::Data<SqlitePool>,
    query: web::Query<SummaryQuery>,
) -> actix_web::Result<impl Responder> {
    let (start, end) = match crate::engine::payroll::month_bounds(query.month, query.year) {
        Ok(bounds) => bounds,
        Err(e) => return Ok(engine_error_response(e)),
    };

    let summary = sqlx::query_as::<_, AttendanceSummary>(
        r#"
        SELECT
            COUNT(*) AS total_days,
            COALESCE(SUM(CASE WHEN status = 'full_day' THEN 1 ELSE 0 END), 0) AS full_days,
            COALESCE(SUM(CASE WHEN status = 'half_day' THEN 1 ELSE 0 END), 0) AS half_days,
            COALESCE(SUM(CASE WHEN status = 'absent' THEN 1 ELSE 0 END), 0) AS absent_days
        FROM attendance
        WHERE employee_id = ? AND date BETWEEN ? AND ?
        "#,
    )
    .bind(query.employee_id)
    .bind(start)
    .bind(end)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = query.employee_id, "Failed to fetch attendance summary");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(summary))
}

/// Daily report: every active employee of a branch with that day's mark
#[utoipa::path(
    get,
    path = "/api/v1/attendance/daily-report",
    params(DailyReportQuery),
    responses(
        (status = 200, description = "Daily report rows", body = [DailyReportRow]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn daily_report(
    pool: web::Data<SqlitePool>,
    query: web::Query<DailyReportQuery>,
) -> actix_web::Result<impl Responder> {
    let rows = sqlx::query_as::<_, DailyReportRow>(
        r#"
        SELECT
            e.id AS employee_id,
            e.name,
            e.role,
            CASE WHEN a.id IS NULL THEN 'not_marked' ELSE a.status END AS attendance_status,
            a.check_in,
            a.check_out,
            a.note
        FROM employees e
        LEFT JOIN attendance a ON e.id = a.employee_id AND a.date = ?
        WHERE e.branch_id = ? AND e.status = 'active'
        ORDER BY e.name
        "#,
    )
    .bind(query.date)
    .bind(query.branch_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, branch_id = query.branch_id, "Failed to build daily report");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(rows))
}
