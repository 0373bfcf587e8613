//! API Routes Module
//!
//! 모든 HTTP 엔드포인트 정의
//!
//! # Routes
//! - `/health` - 헬스 체크
//! - `/api/loans/*` - 대출 생성 / 조회 / 상태 변경
//! - `/api/loans/payment/*` - 상환 및 결제 내역
//! - `/api/loans/build-info`, `/api/loans/contact-info` - 운영 정보

pub mod health;
pub mod info;
pub mod loans;
pub mod payments;

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// 라우터 생성
///
/// # Route Structure
///
/// ```text
/// GET   /health                          - 서버 상태 확인
///
/// POST  /api/loans/create                - 대출 생성
/// PATCH /api/loans/update/:loan_id       - 상태 변경
/// GET   /api/loans/:loan_id              - 대출 조회
/// GET   /api/loans/:loan_id/customer     - 차주 정보
/// GET   /api/loans/all                   - 전체 대출
/// GET   /api/loans/customer/:customer_id - 고객별 대출
///
/// POST  /api/loans/payment/:loan_id      - 상환
/// GET   /api/loans/payment/:loan_id      - 결제 내역
///
/// PATCH /api/loans/approve/:loan_id      - (미구현)
/// PUT   /api/loans/cancel/:loan_id       - (미구현)
/// ```
///
/// CORS 레이어는 환경별로 main에서 추가
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))

        // Loans
        .route("/api/loans/create", post(loans::create_loan))
        .route("/api/loans/update/:loan_id", patch(loans::update_loan_status))
        .route("/api/loans/all", get(loans::get_all_loans))
        .route("/api/loans/customer/:customer_id", get(loans::get_loans_by_customer_id))
        .route("/api/loans/:loan_id", get(loans::get_loan_by_id))
        .route("/api/loans/:loan_id/customer", get(loans::get_loan_customer))
        .route("/api/loans/approve/:loan_id", patch(loans::approve_loan))
        .route("/api/loans/cancel/:loan_id", put(loans::cancel_loan))

        // Payments
        .route(
            "/api/loans/payment/:loan_id",
            post(payments::make_payment).get(payments::get_loan_payments),
        )

        // Info
        .route("/api/loans/build-info", get(info::build_info))
        .route("/api/loans/contact-info", get(info::contact_info))

        // 미들웨어
        .layer(TraceLayer::new_for_http())

        // 상태 주입
        .with_state(state)
}
