use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;
use tracing::info;

use crate::engine::ledger;
use crate::error::EngineError;
use crate::model::attendance::AttendanceStatus;

/// Input for marking (or re-marking) one employee's attendance on one date.
#[derive(Debug, Clone)]
pub struct MarkAttendance {
    pub employee_id: i64,
    pub branch_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub note: String,
    pub marked_by: i64,
}

/// Record or update the attendance mark for `(employee, date)` and keep the
/// automatic half-day deduction in lock-step.
///
/// The attendance upsert and the deduction create/delete run inside one
/// transaction: after any call, a half-day deduction exists for the date iff
/// the stored status is `half_day`. Re-marking the same date updates the
/// existing row in place; it never inserts a duplicate.
///
/// Returns the id of the created or updated attendance row.
pub async fn mark_attendance(
    pool: &SqlitePool,
    mark: MarkAttendance,
) -> Result<i64, EngineError> {
    let mut tx = pool.begin().await?;

    let existing: Option<(i64, AttendanceStatus)> = sqlx::query_as(
        "SELECT id, status FROM attendance WHERE employee_id = ? AND date = ?",
    )
    .bind(mark.employee_id)
    .bind(mark.date)
    .fetch_optional(&mut *tx)
    .await?;

    let attendance_id = match existing {
        None => {
            if mark.status == AttendanceStatus::HalfDay {
                ledger::create_half_day_deduction(
                    &mut tx,
                    mark.employee_id,
                    mark.branch_id,
                    mark.date,
                    mark.marked_by,
                )
                .await?;
            } else {
                // Employee existence is otherwise only checked on the
                // half-day path (where the salary lookup needs it).
                let found: Option<(i64,)> =
                    sqlx::query_as("SELECT id FROM employees WHERE id = ?")
                        .bind(mark.employee_id)
                        .fetch_optional(&mut *tx)
                        .await?;
                if found.is_none() {
                    return Err(EngineError::NotFound("employee"));
                }
            }

            sqlx::query(
                r#"
                INSERT INTO attendance
                (employee_id, branch_id, date, status, check_in, check_out, note)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(mark.employee_id)
            .bind(mark.branch_id)
            .bind(mark.date)
            .bind(mark.status)
            .bind(mark.check_in)
            .bind(mark.check_out)
            .bind(&mark.note)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid()
        }
        Some((id, previous_status)) => {
            match (previous_status, mark.status) {
                (prev, AttendanceStatus::HalfDay) if prev != AttendanceStatus::HalfDay => {
                    ledger::create_half_day_deduction(
                        &mut tx,
                        mark.employee_id,
                        mark.branch_id,
                        mark.date,
                        mark.marked_by,
                    )
                    .await?;
                }
                (AttendanceStatus::HalfDay, next) if next != AttendanceStatus::HalfDay => {
                    ledger::remove_half_day_deduction(&mut tx, mark.employee_id, mark.date)
                        .await?;
                }
                _ => {}
            }

            sqlx::query(
                r#"
                UPDATE attendance
                SET status = ?, check_in = ?, check_out = ?, note = ?,
                    updated_at = datetime('now')
                WHERE id = ?
                "#,
            )
            .bind(mark.status)
            .bind(mark.check_in)
            .bind(mark.check_out)
            .bind(&mark.note)
            .bind(id)
            .execute(&mut *tx)
            .await?;
            id
        }
    };

    tx.commit().await?;

    info!(
        attendance_id,
        employee_id = mark.employee_id,
        date = %mark.date,
        status = %mark.status,
        marked_by = mark.marked_by,
        "Marked attendance"
    );
    Ok(attendance_id)
}
