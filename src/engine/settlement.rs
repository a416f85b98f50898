use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::EngineError;
use crate::model::salary_payment::{PaymentMethod, SalaryPayment};

/// Fields of a settlement, usually flattened from a computed breakdown.
#[derive(Debug, Clone)]
pub struct SettlementRequest {
    pub branch_id: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub gross_salary: f64,
    pub total_deductions: f64,
    pub bonuses: f64,
    pub net_paid: f64,
    pub paid_on: NaiveDate,
    pub payment_method: PaymentMethod,
    pub notes: String,
    pub created_by: i64,
}

/// Irreversibly pay an employee for a period: record the salary payment and
/// retire every open non-half-day deduction, in one transaction.
///
/// Half-day deductions are left untouched; they belong to the attendance
/// synchronizer, which destroys them on re-marks instead of carrying them
/// as repaid history.
///
/// There is no uniqueness guard on (employee, period): settling the same
/// period twice records two payments. Callers wanting a guard must check
/// payment history first.
pub async fn process_salary_payment(
    pool: &SqlitePool,
    employee_id: i64,
    req: SettlementRequest,
) -> Result<i64, EngineError> {
    if req.period_start > req.period_end {
        return Err(EngineError::invalid("period_start is after period_end"));
    }
    if req.net_paid < 0.0 {
        return Err(EngineError::invalid("net_paid must not be negative"));
    }

    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(EngineError::NotFound("employee"));
    }

    let mut tx = pool.begin().await?;

    let payment_id = sqlx::query(
        r#"
        INSERT INTO salary_payments
        (employee_id, branch_id, period_start, period_end,
         gross_salary, total_deductions, bonuses, net_paid,
         paid_on, payment_method, notes, created_by)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(req.branch_id)
    .bind(req.period_start)
    .bind(req.period_end)
    .bind(req.gross_salary)
    .bind(req.total_deductions)
    .bind(req.bonuses)
    .bind(req.net_paid)
    .bind(req.paid_on)
    .bind(req.payment_method)
    .bind(&req.notes)
    .bind(req.created_by)
    .execute(&mut *tx)
    .await
    .map_err(EngineError::SettlementFailed)?
    .last_insert_rowid();

    sqlx::query(
        "UPDATE deductions SET is_repaid = 1
         WHERE employee_id = ? AND is_repaid = 0 AND type <> 'half_day'",
    )
    .bind(employee_id)
    .execute(&mut *tx)
    .await
    .map_err(EngineError::SettlementFailed)?;

    tx.commit().await.map_err(EngineError::SettlementFailed)?;

    info!(
        payment_id,
        employee_id,
        period_start = %req.period_start,
        period_end = %req.period_end,
        net_paid = req.net_paid,
        created_by = req.created_by,
        "Processed salary payment"
    );
    Ok(payment_id)
}

/// Payment history for an employee, most recent period first.
pub async fn list_payments(
    pool: &SqlitePool,
    employee_id: i64,
) -> Result<Vec<SalaryPayment>, EngineError> {
    let rows = sqlx::query_as::<_, SalaryPayment>(
        "SELECT * FROM salary_payments WHERE employee_id = ?
         ORDER BY period_start DESC, id DESC",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
