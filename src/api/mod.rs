pub mod attendance;
pub mod deduction;
pub mod employee;
pub mod payroll;
pub mod settings;

use actix_web::HttpResponse;
use serde_json::json;
use tracing::error;

use crate::error::EngineError;

/// Map an engine failure to the transport response. Callers can tell
/// "nothing happened" (400/404) from "transaction aborted" (500 settlement)
/// from "inconsistent state" (409).
pub(crate) fn engine_error_response(e: EngineError) -> HttpResponse {
    match e {
        EngineError::NotFound(what) => HttpResponse::NotFound().json(json!({
            "message": format!("{what} not found")
        })),
        EngineError::InvalidInput(reason) => HttpResponse::BadRequest().json(json!({
            "message": reason
        })),
        EngineError::Conflict(reason) => HttpResponse::Conflict().json(json!({
            "message": reason
        })),
        EngineError::SettlementFailed(e) => {
            error!(error = %e, "Settlement rolled back");
            HttpResponse::InternalServerError().json(json!({
                "message": "Settlement failed, no changes were applied"
            }))
        }
        EngineError::Database(e) => {
            error!(error = %e, "Database error");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}
