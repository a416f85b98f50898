use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::ToSchema;

use crate::engine::policy::BranchPolicy;
use crate::error::EngineError;
use crate::model::attendance::AttendanceSummary;
use crate::model::employee::Employee;

/// Seam for the external Task/Performance collaborator: how many
/// bonus-eligible units of work an employee completed in a date range.
#[allow(async_fn_in_trait)]
pub trait TaskSource {
    async fn bonus_units(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<i64, EngineError>;
}

/// Default source: the local `tasks` table.
pub struct SqlTaskSource<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SqlTaskSource<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }
}

impl TaskSource for SqlTaskSource<'_> {
    async fn bonus_units(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<i64, EngineError> {
        let (units,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(count), 0) FROM tasks
             WHERE employee_id = ? AND date BETWEEN ? AND ? AND bonus_applicable = 1",
        )
        .bind(employee_id)
        .bind(start)
        .bind(end)
        .fetch_one(self.pool)
        .await?;
        Ok(units)
    }
}

/// Computed gross-to-net figure for one employee and one calendar month.
/// A pure read: nothing is persisted until settlement commits it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalaryBreakdown {
    pub employee: Employee,

    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub period_start: NaiveDate,

    #[schema(example = "2026-01-31", value_type = String, format = "date")]
    pub period_end: NaiveDate,

    #[schema(example = 20000.0)]
    pub gross_salary: f64,

    #[schema(example = 666.67)]
    pub half_day_deduction: f64,

    #[schema(example = 1000.0)]
    pub other_deductions: f64,

    #[schema(example = 1666.67)]
    pub total_deductions: f64,

    #[schema(example = 500.0)]
    pub bonus: f64,

    #[schema(example = 18833.33)]
    pub net_salary: f64,

    #[schema(example = 10)]
    pub tasks_completed: i64,

    pub attendance: AttendanceSummary,
}

/// Round a reported money figure to two decimal places. Stored amounts stay
/// unrounded; only the breakdown boundary rounds.
fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// First and last calendar day of `(month, year)`, using the true month
/// length. Distinct from the fixed /30 daily-rate divisor on purpose.
pub fn month_bounds(month: u32, year: i32) -> Result<(NaiveDate, NaiveDate), EngineError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::invalid(format!("invalid month {year}-{month}")))?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let end = next_month
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| EngineError::invalid(format!("invalid month {year}-{month}")))?;
    Ok((start, end))
}

/// Aggregate attendance, ledger balance and bonus-eligible work into a
/// gross/deduction/bonus/net breakdown for the given month.
///
/// Inactive employees are still computable; settlement of a past period can
/// happen after an employee leaves.
pub async fn compute_monthly_salary(
    pool: &SqlitePool,
    tasks: &impl TaskSource,
    employee_id: i64,
    month: u32,
    year: i32,
) -> Result<SalaryBreakdown, EngineError> {
    let (period_start, period_end) = month_bounds(month, year)?;

    let employee: Employee = sqlx::query_as("SELECT * FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool)
        .await?
        .ok_or(EngineError::NotFound("employee"))?;

    let attendance: AttendanceSummary = sqlx::query_as(
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
    .bind(employee_id)
    .bind(period_start)
    .bind(period_end)
    .fetch_one(pool)
    .await?;

    // Auto half-day component: rows dated inside the month.
    let (half_day_deduction,): (f64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(amount), 0.0) FROM deductions
         WHERE employee_id = ? AND type = 'half_day' AND date BETWEEN ? AND ?",
    )
    .bind(employee_id)
    .bind(period_start)
    .bind(period_end)
    .fetch_one(pool)
    .await?;

    // Open advances/loans/penalties accumulate across months until settled,
    // so this window is bounded only at the period end.
    let (other_deductions,): (f64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(amount), 0.0) FROM deductions
         WHERE employee_id = ? AND type <> 'half_day' AND is_repaid = 0 AND date <= ?",
    )
    .bind(employee_id)
    .bind(period_end)
    .fetch_one(pool)
    .await?;

    let policy = BranchPolicy::load(pool, employee.branch_id).await?;
    let tasks_completed = tasks
        .bonus_units(employee_id, period_start, period_end)
        .await?;
    let bonus = tasks_completed as f64 * policy.bonus_per_task;

    let total_deductions = half_day_deduction + other_deductions;
    let net_salary = (employee.monthly_salary - total_deductions + bonus).max(0.0);

    Ok(SalaryBreakdown {
        gross_salary: employee.monthly_salary,
        period_start,
        period_end,
        half_day_deduction: round_money(half_day_deduction),
        other_deductions: round_money(other_deductions),
        total_deductions: round_money(total_deductions),
        bonus: round_money(bonus),
        net_salary: round_money(net_salary),
        tasks_completed,
        attendance,
        employee,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::attendance_sync::{mark_attendance, MarkAttendance};
    use crate::engine::ledger::{add_manual_deduction, NewDeduction};
    use crate::engine::test_support::{insert_employee, set_branch_setting, test_pool};
    use crate::model::attendance::AttendanceStatus;
    use crate::model::deduction::DeductionType;

    struct FixedTasks(i64);

    impl TaskSource for FixedTasks {
        async fn bonus_units(
            &self,
            _employee_id: i64,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<i64, EngineError> {
            Ok(self.0)
        }
    }

    async fn mark(pool: &SqlitePool, employee_id: i64, date: NaiveDate, status: AttendanceStatus) {
        mark_attendance(
            pool,
            MarkAttendance {
                employee_id,
                branch_id: 1,
                date,
                status,
                check_in: None,
                check_out: None,
                note: String::new(),
                marked_by: 1,
            },
        )
        .await
        .unwrap();
    }

    #[test]
    fn month_bounds_use_true_calendar_length() {
        let (start, end) = month_bounds(2, 2024).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (start, end) = month_bounds(12, 2026).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());

        assert!(month_bounds(13, 2026).is_err());
    }

    #[tokio::test]
    async fn unknown_employee_is_not_found() {
        let pool = test_pool().await;
        let err = compute_monthly_salary(&pool, &FixedTasks(0), 99, 1, 2026)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound("employee")));
    }

    #[tokio::test]
    async fn january_scenario_breaks_down_as_expected() {
        let pool = test_pool().await;
        set_branch_setting(&pool, 1, "bonus_per_task", "50").await;
        let employee_id = insert_employee(&pool, 1, 20000.0).await;

        mark(
            &pool,
            employee_id,
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            AttendanceStatus::HalfDay,
        )
        .await;
        mark(
            &pool,
            employee_id,
            NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
            AttendanceStatus::HalfDay,
        )
        .await;
        mark(
            &pool,
            employee_id,
            NaiveDate::from_ymd_opt(2026, 1, 13).unwrap(),
            AttendanceStatus::FullDay,
        )
        .await;

        add_manual_deduction(
            &pool,
            NewDeduction {
                employee_id,
                branch_id: 1,
                kind: DeductionType::Advance,
                amount: 1000.0,
                date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
                note: "festival advance".into(),
                created_by: 1,
            },
        )
        .await
        .unwrap();

        let breakdown = compute_monthly_salary(&pool, &FixedTasks(10), employee_id, 1, 2026)
            .await
            .unwrap();

        assert_eq!(breakdown.gross_salary, 20000.0);
        assert_eq!(breakdown.half_day_deduction, 666.67);
        assert_eq!(breakdown.other_deductions, 1000.0);
        assert_eq!(breakdown.total_deductions, 1666.67);
        assert_eq!(breakdown.bonus, 500.0);
        assert_eq!(breakdown.net_salary, 18833.33);
        assert_eq!(breakdown.tasks_completed, 10);
        assert_eq!(breakdown.attendance.half_days, 2);
        assert_eq!(breakdown.attendance.full_days, 1);
        assert_eq!(breakdown.attendance.total_days, 3);
    }

    #[tokio::test]
    async fn net_salary_never_goes_negative() {
        let pool = test_pool().await;
        let employee_id = insert_employee(&pool, 1, 1000.0).await;

        add_manual_deduction(
            &pool,
            NewDeduction {
                employee_id,
                branch_id: 1,
                kind: DeductionType::Loan,
                amount: 5000.0,
                date: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
                note: String::new(),
                created_by: 1,
            },
        )
        .await
        .unwrap();

        let breakdown = compute_monthly_salary(&pool, &FixedTasks(0), employee_id, 1, 2026)
            .await
            .unwrap();
        assert_eq!(breakdown.net_salary, 0.0);
    }

    #[tokio::test]
    async fn open_deductions_carry_across_months() {
        let pool = test_pool().await;
        let employee_id = insert_employee(&pool, 1, 20000.0).await;

        // November advance, still open when January is calculated.
        add_manual_deduction(
            &pool,
            NewDeduction {
                employee_id,
                branch_id: 1,
                kind: DeductionType::Advance,
                amount: 750.0,
                date: NaiveDate::from_ymd_opt(2025, 11, 20).unwrap(),
                note: String::new(),
                created_by: 1,
            },
        )
        .await
        .unwrap();

        // Dated after the period end, so out of scope for January.
        add_manual_deduction(
            &pool,
            NewDeduction {
                employee_id,
                branch_id: 1,
                kind: DeductionType::Advance,
                amount: 999.0,
                date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
                note: String::new(),
                created_by: 1,
            },
        )
        .await
        .unwrap();

        let breakdown = compute_monthly_salary(&pool, &FixedTasks(0), employee_id, 1, 2026)
            .await
            .unwrap();
        assert_eq!(breakdown.other_deductions, 750.0);
        assert_eq!(breakdown.half_day_deduction, 0.0);
    }

    #[tokio::test]
    async fn sql_task_source_sums_bonus_applicable_units() {
        let pool = test_pool().await;
        let employee_id = insert_employee(&pool, 1, 20000.0).await;

        sqlx::query(
            "INSERT INTO tasks (employee_id, branch_id, date, count, bonus_applicable) VALUES
             (?, 1, '2026-01-05', 4, 1),
             (?, 1, '2026-01-09', 6, 1),
             (?, 1, '2026-01-11', 3, 0),
             (?, 1, '2026-02-01', 8, 1)",
        )
        .bind(employee_id)
        .bind(employee_id)
        .bind(employee_id)
        .bind(employee_id)
        .execute(&pool)
        .await
        .unwrap();

        let source = SqlTaskSource::new(&pool);
        let units = source
            .bonus_units(
                employee_id,
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(units, 10);
    }
}
