use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::engine::policy::BranchPolicy;
use crate::error::EngineError;
use crate::model::deduction::{Deduction, DeductionType};

/// Caller-supplied fields for a manually entered debit.
#[derive(Debug, Clone)]
pub struct NewDeduction {
    pub employee_id: i64,
    pub branch_id: i64,
    pub kind: DeductionType,
    pub amount: f64,
    pub date: NaiveDate,
    pub note: String,
    pub created_by: i64,
}

/// Append an advance/loan/manual/late-fee debit to the employee's ledger.
///
/// `half_day` is rejected here: those rows are owned by the attendance
/// synchronizer and may not be created through this path.
pub async fn add_manual_deduction(
    pool: &SqlitePool,
    new: NewDeduction,
) -> Result<i64, EngineError> {
    if !new.kind.is_manual() {
        return Err(EngineError::invalid(
            "half_day deductions are managed automatically by attendance marking",
        ));
    }
    if !(new.amount > 0.0) {
        return Err(EngineError::invalid("deduction amount must be positive"));
    }

    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM employees WHERE id = ?")
        .bind(new.employee_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(EngineError::NotFound("employee"));
    }

    let id = sqlx::query(
        r#"
        INSERT INTO deductions (employee_id, branch_id, type, amount, date, note, created_by)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new.employee_id)
    .bind(new.branch_id)
    .bind(new.kind)
    .bind(new.amount)
    .bind(new.date)
    .bind(&new.note)
    .bind(new.created_by)
    .execute(pool)
    .await?
    .last_insert_rowid();

    debug!(
        deduction_id = id,
        employee_id = new.employee_id,
        kind = %new.kind,
        amount = new.amount,
        created_by = new.created_by,
        "Added manual deduction"
    );
    Ok(id)
}

/// Deduction history for an employee, newest date first. With
/// `include_repaid = false` this is the outstanding-balance view payroll uses.
pub async fn list_deductions(
    pool: &SqlitePool,
    employee_id: i64,
    include_repaid: bool,
) -> Result<Vec<Deduction>, EngineError> {
    let sql = if include_repaid {
        "SELECT * FROM deductions WHERE employee_id = ? ORDER BY date DESC, id DESC"
    } else {
        "SELECT * FROM deductions WHERE employee_id = ? AND is_repaid = 0
         ORDER BY date DESC, id DESC"
    };
    let rows = sqlx::query_as::<_, Deduction>(sql)
        .bind(employee_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Sum of all unrepaid deductions for the employee, every type included.
pub async fn outstanding_balance(
    pool: &SqlitePool,
    employee_id: i64,
) -> Result<f64, EngineError> {
    let (total,): (f64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(amount), 0.0) FROM deductions
         WHERE employee_id = ? AND is_repaid = 0",
    )
    .bind(employee_id)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Create the automatic half-day deduction for `(employee, date)` on the
/// caller's transaction. Idempotent: an existing unrepaid half-day row for
/// that date is returned as-is.
pub(crate) async fn create_half_day_deduction(
    conn: &mut SqliteConnection,
    employee_id: i64,
    branch_id: i64,
    date: NaiveDate,
    created_by: i64,
) -> Result<i64, EngineError> {
    let salary: Option<(f64,)> =
        sqlx::query_as("SELECT monthly_salary FROM employees WHERE id = ?")
            .bind(employee_id)
            .fetch_optional(&mut *conn)
            .await?;
    let (monthly_salary,) = salary.ok_or(EngineError::NotFound("employee"))?;

    let policy = BranchPolicy::load(&mut *conn, branch_id).await?;
    let amount = policy.half_day_amount(monthly_salary);

    let existing: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM deductions
         WHERE employee_id = ? AND date = ? AND type = 'half_day' AND is_repaid = 0",
    )
    .bind(employee_id)
    .bind(date)
    .fetch_optional(&mut *conn)
    .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let id = sqlx::query(
        r#"
        INSERT INTO deductions (employee_id, branch_id, type, amount, date, note, created_by)
        VALUES (?, ?, 'half_day', ?, ?, 'Automatic half-day deduction', ?)
        "#,
    )
    .bind(employee_id)
    .bind(branch_id)
    .bind(amount)
    .bind(date)
    .bind(created_by)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    debug!(deduction_id = id, employee_id, %date, amount, "Created half-day deduction");
    Ok(id)
}

/// Hard-delete the half-day deduction for `(employee, date)`. No-op when
/// none exists.
pub(crate) async fn remove_half_day_deduction(
    conn: &mut SqliteConnection,
    employee_id: i64,
    date: NaiveDate,
) -> Result<(), EngineError> {
    let result = sqlx::query(
        "DELETE FROM deductions
         WHERE employee_id = ? AND date = ? AND type = 'half_day'",
    )
    .bind(employee_id)
    .bind(date)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() > 0 {
        debug!(employee_id, %date, "Removed half-day deduction");
    }
    Ok(())
}
