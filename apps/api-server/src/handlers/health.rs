//! Liveness and health check endpoints.

use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Serialize)]
pub struct LivenessResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET / - liveness message.
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(LivenessResponse {
        message: "Blog Backend API is running!",
    })
}

/// GET /api/health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { status: "OK" })
}
