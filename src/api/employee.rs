use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::model::employee::{Employee, EmployeeStatus};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = 2)]
    pub branch_id: i64,

    #[schema(example = "Ravi Kumar")]
    pub name: String,

    #[schema(example = "+919812345678")]
    pub phone: Option<String>,

    #[schema(example = 28)]
    pub age: Option<i64>,

    #[schema(example = "stylist")]
    pub role: String,

    #[schema(example = 20000.0)]
    pub monthly_salary: f64,

    #[schema(example = "2024-03-01", value_type = String, format = "date")]
    pub join_date: NaiveDate,

    #[schema(example = "active")]
    pub status: Option<EmployeeStatus>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub role: Option<String>,
    #[schema(example = 22000.0)]
    pub monthly_salary: Option<f64>,
    #[schema(example = "inactive")]
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    #[schema(example = 2)]
    pub branch_id: Option<i64>,
    /// active (default), inactive, or all
    #[schema(example = "active")]
    pub status: Option<String>,
    /// Matches name, phone, or role
    #[schema(example = "ravi")]
    pub search: Option<String>,
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 25)]
    pub per_page: Option<u32>,
}

/// Create employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Invalid salary"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    if !(payload.monthly_salary > 0.0) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "monthly_salary must be positive"
        })));
    }

    let status = payload.status.unwrap_or(EmployeeStatus::Active);
    let id = sqlx::query(
        r#"
        INSERT INTO employees (branch_id, name, phone, age, role, monthly_salary, join_date, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.branch_id)
    .bind(&payload.name)
    .bind(&payload.phone)
    .bind(payload.age)
    .bind(&payload.role)
    .bind(payload.monthly_salary)
    .bind(payload.join_date)
    .bind(status)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create employee");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?
    .last_insert_rowid();

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to fetch created employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(employee))
}

/// Get one employee
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    params(("id", description = "Employee ID")),
    responses(
        (status = 200, description = "Employee", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to fetch employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match employee {
        Some(e) => Ok(HttpResponse::Ok().json(e)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "employee not found"
        }))),
    }
}

/// List employees with branch/status/search filters
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Employees", body = [Employee]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    pool: web::Data<SqlitePool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(25).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // status "all" lifts the filter; anything else matches the column.
    let status = match query.status.as_deref() {
        Some("all") => None,
        Some(other) => Some(other.to_string()),
        None => Some("active".to_string()),
    };
    let search = query.search.as_ref().map(|s| format!("%{s}%"));

    let rows = sqlx::query_as::<_, Employee>(
        r#"
        SELECT * FROM employees
        WHERE (?1 IS NULL OR branch_id = ?1)
          AND (?2 IS NULL OR status = ?2)
          AND (?3 IS NULL OR name LIKE ?3 OR phone LIKE ?3 OR role LIKE ?3)
        ORDER BY created_at DESC
        LIMIT ?4 OFFSET ?5
        "#,
    )
    .bind(query.branch_id)
    .bind(status)
    .bind(search)
    .bind(per_page as i64)
    .bind(offset as i64)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch employee list");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(rows))
}

/// Update employee (partial)
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}",
    params(("id", description = "Employee ID")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateEmployee>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();

    let current = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to fetch employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let current = match current {
        Some(c) => c,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "employee not found"
            })));
        }
    };

    let name = payload.name.clone().unwrap_or(current.name);
    let phone = payload.phone.clone().or(current.phone);
    let age = payload.age.or(current.age);
    let role = payload.role.clone().unwrap_or(current.role);
    let monthly_salary = payload.monthly_salary.unwrap_or(current.monthly_salary);
    let status = payload.status.unwrap_or(current.status);

    if !(monthly_salary > 0.0) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "monthly_salary must be positive"
        })));
    }

    sqlx::query(
        r#"
        UPDATE employees
        SET name = ?, phone = ?, age = ?, role = ?, monthly_salary = ?, status = ?,
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(&name)
    .bind(&phone)
    .bind(age)
    .bind(&role)
    .bind(monthly_salary)
    .bind(status)
    .bind(id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Failed to update employee");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let updated = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to fetch updated employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deactivate employee (soft delete, records are kept)
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    params(("id", description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deactivated"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();

    let result = sqlx::query(
        "UPDATE employees SET status = 'inactive', updated_at = datetime('now') WHERE id = ?",
    )
    .bind(id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Failed to deactivate employee");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "employee not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deactivated"
    })))
}
