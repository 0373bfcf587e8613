//! Health Check Endpoint
//!
//! # Interview Q&A
//!
//! Q: 저장소 연결 상태도 체크하는 이유는?
//! A: "깊은 헬스체크"(deep health check) 패턴
//!    - 단순 200 OK: 프로세스 살아있음
//!    - 저장소 체크: 실제로 대출을 읽고 쓸 수 있는 상태
//!
//! Q: Customer / Payment 서비스는 왜 체크하지 않는가?
//! A: 외부 서비스 장애가 이 서비스의 재시작 사유는 아님
//!    - 조회 API는 외부 서비스 없이도 동작

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Health check 응답
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct DatabaseStatus {
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let started = std::time::Instant::now();
    let database = match state.loans.store_health().await {
        Ok(()) => DatabaseStatus {
            connected: true,
            latency_ms: Some(started.elapsed().as_millis() as u64),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Loan store health check failed");
            DatabaseStatus {
                connected: false,
                latency_ms: None,
            }
        }
    };

    Json(HealthResponse {
        status: if database.connected { "healthy" } else { "degraded" }.to_string(),
        version: state.config.build_version.clone(),
        database,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
