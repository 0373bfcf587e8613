//! Loan Service Library
//!
//! # Overview
//!
//! 대출 생애주기(상태 머신)와 상환 반영을 담당하는 마이크로서비스.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                         API                              │
//! │                                                          │
//! │  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐    │
//! │  │ Routes  │  │Services │  │   DB    │  │  Types  │    │
//! │  └────┬────┘  └────┬────┘  └────┬────┘  └────┬────┘    │
//! │       │            │            │            │          │
//! │       └────────────┴────────────┴────────────┘          │
//! │                         │                                │
//! └─────────────────────────┼────────────────────────────────┘
//!                           │ JSON / HTTP
//!                 ┌─────────┴──────────┐
//!                 ▼                    ▼
//!        ┌────────────────┐   ┌────────────────┐
//!        │Customer Service│   │Payment Service │
//!        └────────────────┘   └────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: 환경 설정 관리
//! - `error`: 에러 타입 및 처리
//! - `routes`: HTTP 엔드포인트 핸들러
//! - `services`: 비즈니스 로직 (EMI, 상태 머신, 상환 반영, 외부 서비스 클라이언트)
//! - `db`: 대출 레코드 저장소
//! - `types`: 공통 타입 정의
//!
//! ## Usage
//!
//! ```rust,ignore
//! use loan_service::{config::Config, db::Database, services::LoanService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let db = Database::connect(&config.database_url).await?;
//!
//!     // ... 서버 시작
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod db;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use error::{ApiError, LoanError};
pub use db::Database;
pub use services::LoanService;

/// 애플리케이션 전역 상태
#[derive(Clone)]
pub struct AppState {
    pub loans: Arc<LoanService>,
    pub config: Arc<Config>,
}
