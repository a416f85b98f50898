use actix_web::web::Data;
use actix_web::{test, App};
use serde_json::{json, Value};

use branchpay::config::Config;
use branchpay::db::init_db;
use branchpay::routes;

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        rate_mutation_per_min: 10_000,
        rate_read_per_min: 10_000,
        api_prefix: "/api/v1".to_string(),
    }
}

macro_rules! build_app {
    ($pool:expr) => {{
        let config = test_config();
        test::init_service(
            App::new()
                .app_data(Data::new($pool.clone()))
                .configure(|cfg| routes::configure(cfg, config)),
        )
        .await
    }};
}

macro_rules! send {
    ($app:expr, $method:ident, $uri:expr) => {{
        let req = test::TestRequest::$method()
            .uri($uri)
            .peer_addr("127.0.0.1:9000".parse().unwrap())
            .to_request();
        test::call_service(&$app, req).await
    }};
    ($app:expr, $method:ident, $uri:expr, $body:expr) => {{
        let req = test::TestRequest::$method()
            .uri($uri)
            .peer_addr("127.0.0.1:9000".parse().unwrap())
            .set_json($body)
            .to_request();
        test::call_service(&$app, req).await
    }};
}

#[actix_web::test]
async fn full_pay_cycle_over_http() {
    let pool = init_db("sqlite::memory:").await.unwrap();
    let app = build_app!(pool);

    // Branch pays 50 per bonus task.
    let resp = send!(
        app,
        put,
        "/api/v1/settings/1",
        json!({ "bonus_per_task": 50.0 })
    );
    assert!(resp.status().is_success());

    let resp = send!(
        app,
        post,
        "/api/v1/employees",
        json!({
            "branch_id": 1,
            "name": "Ravi Kumar",
            "role": "stylist",
            "monthly_salary": 20000.0,
            "join_date": "2024-03-01"
        })
    );
    assert_eq!(resp.status(), 201);
    let employee: Value = test::read_body_json(resp).await;
    let employee_id = employee["id"].as_i64().unwrap();

    for date in ["2026-01-05", "2026-01-12"] {
        let resp = send!(
            app,
            post,
            "/api/v1/attendance",
            json!({
                "employee_id": employee_id,
                "branch_id": 1,
                "date": date,
                "status": "half_day",
                "marked_by": 3
            })
        );
        assert!(resp.status().is_success());
    }

    let resp = send!(
        app,
        post,
        "/api/v1/deductions",
        json!({
            "employee_id": employee_id,
            "branch_id": 1,
            "type": "advance",
            "amount": 1000.0,
            "date": "2026-01-10",
            "note": "festival advance",
            "created_by": 3
        })
    );
    assert_eq!(resp.status(), 201);

    sqlx::query(
        "INSERT INTO tasks (employee_id, branch_id, date, count, bonus_applicable)
         VALUES (?, 1, '2026-01-20', 10, 1)",
    )
    .bind(employee_id)
    .execute(&pool)
    .await
    .unwrap();

    let uri = format!("/api/v1/payroll/{employee_id}/breakdown?month=1&year=2026");
    let resp = send!(app, get, &uri);
    assert!(resp.status().is_success());
    let breakdown: Value = test::read_body_json(resp).await;
    assert_eq!(breakdown["half_day_deduction"], json!(666.67));
    assert_eq!(breakdown["other_deductions"], json!(1000.0));
    assert_eq!(breakdown["total_deductions"], json!(1666.67));
    assert_eq!(breakdown["bonus"], json!(500.0));
    assert_eq!(breakdown["net_salary"], json!(18833.33));
    assert_eq!(breakdown["tasks_completed"], json!(10));

    let uri = format!("/api/v1/payroll/{employee_id}/settle");
    let resp = send!(
        app,
        post,
        &uri,
        json!({
            "branch_id": 1,
            "period_start": "2026-01-01",
            "period_end": "2026-01-31",
            "gross_salary": 20000.0,
            "total_deductions": 1666.67,
            "bonuses": 500.0,
            "net_paid": 18833.33,
            "paid_on": "2026-02-01",
            "payment_method": "bank_transfer",
            "created_by": 3
        })
    );
    assert_eq!(resp.status(), 201);

    let uri = format!("/api/v1/payroll/{employee_id}/payments");
    let resp = send!(app, get, &uri);
    let payments: Value = test::read_body_json(resp).await;
    assert_eq!(payments.as_array().unwrap().len(), 1);

    // The advance is retired, the half-day rows are not.
    let uri = format!("/api/v1/deductions?employee_id={employee_id}&include_repaid=true");
    let resp = send!(app, get, &uri);
    let deductions: Value = test::read_body_json(resp).await;
    for d in deductions.as_array().unwrap() {
        match d["type"].as_str().unwrap() {
            "advance" => assert_eq!(d["is_repaid"], json!(true)),
            "half_day" => assert_eq!(d["is_repaid"], json!(false)),
            other => panic!("unexpected deduction type {other}"),
        }
    }
}

#[actix_web::test]
async fn half_day_type_is_rejected_on_the_manual_path() {
    let pool = init_db("sqlite::memory:").await.unwrap();
    let app = build_app!(pool);

    sqlx::query(
        "INSERT INTO employees (branch_id, name, role, monthly_salary, join_date)
         VALUES (1, 'X', 'staff', 10000, '2024-01-01')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let resp = send!(
        app,
        post,
        "/api/v1/deductions",
        json!({
            "employee_id": 1,
            "branch_id": 1,
            "type": "half_day",
            "amount": 100.0,
            "date": "2026-01-10",
            "created_by": 3
        })
    );
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn unknown_employee_yields_404_breakdown() {
    let pool = init_db("sqlite::memory:").await.unwrap();
    let app = build_app!(pool);

    let resp = send!(app, get, "/api/v1/payroll/42/breakdown?month=1&year=2026");
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn settings_defaults_are_served_when_unset() {
    let pool = init_db("sqlite::memory:").await.unwrap();
    let app = build_app!(pool);

    let resp = send!(app, get, "/api/v1/settings/7");
    assert!(resp.status().is_success());
    let policy: Value = test::read_body_json(resp).await;
    assert_eq!(policy["half_day_deduction_percent"], json!(50.0));
    assert_eq!(policy["bonus_per_task"], json!(0.0));
}

#[actix_web::test]
async fn deactivated_employee_disappears_from_daily_report() {
    let pool = init_db("sqlite::memory:").await.unwrap();
    let app = build_app!(pool);

    let resp = send!(
        app,
        post,
        "/api/v1/employees",
        json!({
            "branch_id": 1,
            "name": "Ravi Kumar",
            "role": "stylist",
            "monthly_salary": 20000.0,
            "join_date": "2024-03-01"
        })
    );
    assert_eq!(resp.status(), 201);
    let employee: Value = test::read_body_json(resp).await;
    let employee_id = employee["id"].as_i64().unwrap();

    let resp = send!(app, get, "/api/v1/attendance/daily-report?branch_id=1&date=2026-01-05");
    let report: Value = test::read_body_json(resp).await;
    assert_eq!(report.as_array().unwrap().len(), 1);
    assert_eq!(report[0]["attendance_status"], json!("not_marked"));

    let uri = format!("/api/v1/employees/{employee_id}");
    let resp = send!(app, delete, &uri);
    assert!(resp.status().is_success());

    let resp = send!(app, get, "/api/v1/attendance/daily-report?branch_id=1&date=2026-01-05");
    let report: Value = test::read_body_json(resp).await;
    assert!(report.as_array().unwrap().is_empty());

    // Soft delete: the record itself is still readable.
    let uri = format!("/api/v1/employees/{employee_id}");
    let resp = send!(app, get, &uri);
    assert!(resp.status().is_success());
    let employee: Value = test::read_body_json(resp).await;
    assert_eq!(employee["status"], json!("inactive"));
}
