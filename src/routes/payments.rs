//! Repayment Endpoints
//!
//! # Interview Q&A
//!
//! Q: Payment 서비스 장애 시 응답은?
//! A: 417 (Expectation Failed)
//!    - 전송 실패, 또는 PAID 이후 대출 저장 실패 모두 `false`로 돌아옴
//!    - Payment 서비스가 PAID가 아닌 상태를 주면 422 (PAYMENT_FAILED)
//!
//! Q: 결제 내역은 누가 소유하는가?
//! A: Payment 서비스. 이 서비스는 대출 ID로 조회만 위임함

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::ApiError,
    services::{PaymentResult, PaymentSubmission},
    types::ResponseDto,
    AppState,
};

/// POST /api/loans/payment/:loan_id
///
/// # Request
///
/// ```json
/// {
///   "customerId": "C1",
///   "amount": 1066.19,
///   "paymentMethod": "CARD",
///   "paymentDate": "2024-10-01"
/// }
/// ```
pub async fn make_payment(
    State(state): State<AppState>,
    Path(loan_id): Path<i64>,
    payload: Result<Json<PaymentSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<ResponseDto>), ApiError> {
    let Json(submission) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if state.loans.make_payment(loan_id, submission).await? {
        Ok((StatusCode::OK, Json(ResponseDto::ok())))
    } else {
        Ok((StatusCode::EXPECTATION_FAILED, Json(ResponseDto::payment_failed())))
    }
}

/// GET /api/loans/payment/:loan_id
pub async fn get_loan_payments(
    State(state): State<AppState>,
    Path(loan_id): Path<i64>,
) -> Result<Json<Vec<PaymentResult>>, ApiError> {
    Ok(Json(state.loans.get_loan_payments(loan_id).await?))
}
