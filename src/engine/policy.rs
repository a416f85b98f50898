use sqlx::{Executor, Sqlite};
use tracing::warn;

pub const DEFAULT_HALF_DAY_PERCENT: f64 = 50.0;
pub const DEFAULT_BONUS_PER_TASK: f64 = 0.0;

/// Fixed divisor for the daily-rate approximation. Deliberately NOT the real
/// day count of the month; historical records were produced with /30 and the
/// payroll period itself uses the true calendar length.
pub const DAILY_RATE_DIVISOR: f64 = 30.0;

/// Per-branch numeric policy, loaded fresh for every engine operation so a
/// settings change is never served stale into a money calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchPolicy {
    pub half_day_deduction_percent: f64,
    pub bonus_per_task: f64,
}

impl Default for BranchPolicy {
    fn default() -> Self {
        Self {
            half_day_deduction_percent: DEFAULT_HALF_DAY_PERCENT,
            bonus_per_task: DEFAULT_BONUS_PER_TASK,
        }
    }
}

impl BranchPolicy {
    /// Read the branch's settings rows, falling back to defaults for keys
    /// that are missing or fail to parse as numbers.
    pub async fn load<'e, E>(executor: E, branch_id: i64) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT setting_key, setting_value FROM branch_settings WHERE branch_id = ?",
        )
        .bind(branch_id)
        .fetch_all(executor)
        .await?;

        let mut policy = BranchPolicy::default();
        for (key, value) in rows {
            match key.as_str() {
                "half_day_deduction_percent" => {
                    policy.half_day_deduction_percent =
                        parse_or_default(branch_id, &key, &value, DEFAULT_HALF_DAY_PERCENT);
                }
                "bonus_per_task" => {
                    policy.bonus_per_task =
                        parse_or_default(branch_id, &key, &value, DEFAULT_BONUS_PER_TASK);
                }
                _ => {}
            }
        }
        Ok(policy)
    }

    /// Half-day deduction for one date: `monthly_salary / 30 * percent / 100`.
    pub fn half_day_amount(&self, monthly_salary: f64) -> f64 {
        let daily_salary = monthly_salary / DAILY_RATE_DIVISOR;
        daily_salary * self.half_day_deduction_percent / 100.0
    }
}

fn parse_or_default(branch_id: i64, key: &str, value: &str, default: f64) -> f64 {
    match value.parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            warn!(branch_id, key, value, "Non-numeric branch setting, using default");
            default
        }
    }
}
