/// Health, readiness and liveness endpoints
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

#[derive(Serialize, Clone)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    status: ComponentStatus,
    checks: HashMap<String, ComponentCheck>,
    timestamp: String,
}

pub async fn health_summary(service: web::Data<PostService>) -> HttpResponse {
    match service.check_store().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "post-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => {
            tracing::warn!("health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "service": "post-service"
            }))
        }
    }
}

pub async fn readiness_summary(service: web::Data<PostService>) -> HttpResponse {
    let mut checks = HashMap::new();

    let start = Instant::now();
    let store_result = service.check_store().await;
    let latency_ms = Some(start.elapsed().as_millis() as u64);
    let ready = store_result.is_ok();

    let store_check = match store_result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "Post store reachable".to_string(),
            latency_ms,
        },
        Err(e) => {
            tracing::warn!("readiness check failed: {}", e);
            ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: "Post store unreachable".to_string(),
                latency_ms,
            }
        }
    };
    checks.insert("post_store".to_string(), store_check);

    let status = if ready {
        ComponentStatus::Healthy
    } else {
        ComponentStatus::Unhealthy
    };

    let response = ReadinessResponse {
        ready,
        status,
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
