use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::infra::app_state::AppState;

pub async fn ping_handler() -> Json<Value> {
    info!("Ping endpoint called");
    Json(json!({
        "status": "ok",
        "message": "Playmark server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut health_status = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "storage": state.config.storage.to_string(),
        "checks": {}
    });

    let Some(db) = state.postgres.as_ref() else {
        health_status["checks"]["storage"] = json!({
            "status": "healthy",
            "type": "memory"
        });
        return Ok(Json(health_status));
    };

    match sqlx::query("SELECT 1").execute(db.pool()).await {
        Ok(_) => {
            let stats = db.pool_stats();
            health_status["checks"]["database"] = json!({
                "status": "healthy",
                "pool_size": stats.size,
                "idle": stats.idle,
                "max_size": stats.max_size
            });
            Ok(Json(health_status))
        }
        Err(e) => {
            warn!(error = %e, "health check query failed");
            health_status["checks"]["database"] = json!({
                "status": "unhealthy",
                "error": e.to_string()
            });
            health_status["status"] = json!("unhealthy");
            Err((StatusCode::SERVICE_UNAVAILABLE, Json(health_status)))
        }
    }
}
