//! Loan Service Server
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Gateway / Sibling Services                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum Web Server                         │
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                      Routes Layer                        ││
//! │  │  /health  /api/loans/*  /api/loans/payment/*            ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Services Layer                        ││
//! │  │  LoanService   amortization   lifecycle                 ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Data Layer                            ││
//! │  │  PostgreSQL Repository (loans)                          ││
//! │  └─────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────┘
//!                 │                              │
//!                 ▼                              ▼
//!        Customer Service                 Payment Service
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loan_service::{
    routes,
    services::{HttpCustomerDirectory, HttpPaymentExecutor},
    AppState, Config, Database, LoanService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    // RUST_LOG=debug,sqlx=warn 형태로 레벨 제어 가능
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "loan_service=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting loan service");

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!(environment = ?config.environment, "Configuration loaded");

    // 데이터베이스 연결
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connected");

    // 마이그레이션 실행
    db.run_migrations().await?;
    tracing::info!("Migrations completed");

    // 외부 서비스 클라이언트
    let customers = HttpCustomerDirectory::new(&config.customer_service_url, config.upstream_timeout)?;
    let payments = HttpPaymentExecutor::new(&config.payment_service_url, config.upstream_timeout)?;
    tracing::info!(
        customer_service = %config.customer_service_url,
        payment_service = %config.payment_service_url,
        "Upstream clients ready"
    );

    // 앱 상태 구성
    let loans = LoanService::new(Arc::new(db), Arc::new(customers), Arc::new(payments));
    let cors = cors_layer(&config);
    let state = AppState {
        loans: Arc::new(loans),
        config: Arc::new(config.clone()),
    };

    // 라우터 구성
    let app = routes::create_router(state).layer(cors);

    // 서버 시작
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS 설정
///
/// 프로덕션에서는 `ALLOWED_ORIGINS`의 도메인만, 개발 환경에서는 localhost 허용
fn cors_layer(config: &Config) -> CorsLayer {
    if config.is_production() {
        let allowed_origins = std::env::var("ALLOWED_ORIGINS").unwrap_or_default();
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::PUT])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = ["http://localhost:3000", "http://127.0.0.1:3000"]
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
