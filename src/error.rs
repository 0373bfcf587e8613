//! Error Handling Module
//!
//! Provides type-safe error handling with proper HTTP status code mapping.
//! Uses thiserror for domain errors and integrates with tracing for structured logging.
//!
//! 에러는 세 계층으로 나뉨:
//! - `UpstreamError`: Customer / Payment 서비스 호출 실패
//! - `LoanError`: 대출 도메인 에러 (서비스 레이어 반환 타입)
//! - `ApiError`: HTTP 응답으로 변환되는 에러

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::types::LoanStatus;

/// 외부 서비스 호출 에러
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// 원격 서비스가 404 응답
    #[error("resource not found")]
    NotFound,

    #[error("request timed out")]
    Timeout,

    /// 연결 실패 등 전송 계층 에러
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            if status == reqwest::StatusCode::NOT_FOUND {
                UpstreamError::NotFound
            } else {
                UpstreamError::Status(status.as_u16())
            }
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

/// 대출 도메인 에러
#[derive(Debug, Error)]
pub enum LoanError {
    #[error("loan not found with id {0}")]
    LoanNotFound(i64),

    #[error("customer not found with id {0}")]
    CustomerNotFound(String),

    #[error("invalid loan status transition: {from} -> {to}")]
    InvalidLoanStatusTransition { from: LoanStatus, to: LoanStatus },

    #[error("payment failed with status {status}")]
    PaymentFailed { status: String },

    #[error("{service} unavailable: {reason}")]
    UpstreamUnavailable { service: &'static str, reason: UpstreamError },

    #[error("invalid loan parameters: {0}")]
    InvalidLoanParameters(String),

    /// 아직 구현되지 않은 기능 (approve / cancel)
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// 낙관적 버전 체크 실패
    #[error("loan {0} was modified concurrently")]
    ConcurrentModification(i64),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("record store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// API 에러 타입
///
/// # Design Decision
///
/// 각 에러 variant는 적절한 HTTP 상태 코드에 매핑됨
/// - 클라이언트 에러: 4xx (잘못된 요청, 존재하지 않는 리소스 등)
/// - 서버 에러: 5xx (내부 오류, 외부 서비스 장애)
///
/// 민감한 내부 정보는 클라이언트에 노출하지 않음
#[derive(Debug, Error)]
pub enum ApiError {
    // ============ 400 Bad Request ============
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ============ 404 Not Found ============
    #[error("Resource not found: {0}")]
    NotFound(String),

    // ============ 409 Conflict ============
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ 422 Unprocessable Entity ============
    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    // ============ 500 Internal Server Error ============
    #[error("Database error: {0}")]
    DatabaseError(String),

    // ============ 501 Not Implemented ============
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    // ============ 503 Service Unavailable ============
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// API 에러 응답 구조
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            // 4xx 클라이언트 에러
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                msg.clone(),
                None,
            ),
            ApiError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Validation failed".to_string(),
                Some(msg.clone()),
            ),
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} not found", resource),
                None,
            ),
            ApiError::Conflict(msg) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                msg.clone(),
                None,
            ),
            ApiError::InvalidTransition(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_STATUS_TRANSITION",
                "Invalid loan status".to_string(),
                Some(msg.clone()),
            ),
            ApiError::PaymentFailed(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "PAYMENT_FAILED",
                "Payment failed".to_string(),
                Some(msg.clone()),
            ),

            // 5xx 서버 에러
            ApiError::DatabaseError(_) => {
                // 내부 에러는 클라이언트에 상세 정보 노출 안 함
                tracing::error!("Database error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error occurred".to_string(),
                    None,
                )
            }
            ApiError::NotImplemented(operation) => (
                StatusCode::NOT_IMPLEMENTED,
                "NOT_IMPLEMENTED",
                format!("{} is not implemented", operation),
                None,
            ),
            ApiError::ServiceUnavailable(service) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                format!("{} is currently unavailable", service),
                None,
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// 도메인 에러를 HTTP 에러로 변환
impl From<LoanError> for ApiError {
    fn from(err: LoanError) -> Self {
        match err {
            LoanError::LoanNotFound(id) => ApiError::NotFound(format!("Loan {}", id)),
            LoanError::CustomerNotFound(id) => ApiError::NotFound(format!("Customer {}", id)),
            err @ LoanError::InvalidLoanStatusTransition { .. } => {
                ApiError::InvalidTransition(err.to_string())
            }
            LoanError::PaymentFailed { status } => ApiError::PaymentFailed(status),
            LoanError::UpstreamUnavailable { service, reason } => {
                tracing::error!(service, error = %reason, "Upstream call failed");
                ApiError::ServiceUnavailable(service.to_string())
            }
            LoanError::InvalidLoanParameters(msg) => ApiError::ValidationError(msg),
            LoanError::NotImplemented(operation) => ApiError::NotImplemented(operation.to_string()),
            LoanError::ConcurrentModification(id) => {
                ApiError::Conflict(format!("Loan {} was modified concurrently", id))
            }
            LoanError::Validation(msg) => ApiError::ValidationError(msg),
            LoanError::Store(err) => ApiError::DatabaseError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: LoanError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_domain_error_status_mapping() {
        assert_eq!(status_of(LoanError::LoanNotFound(7)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(LoanError::CustomerNotFound("C9".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(LoanError::InvalidLoanStatusTransition {
                from: LoanStatus::Pending,
                to: LoanStatus::Active,
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(LoanError::NotImplemented("approveLoan")),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            status_of(LoanError::UpstreamUnavailable {
                service: "customer-service",
                reason: UpstreamError::Timeout,
            }),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(LoanError::ConcurrentModification(1)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(LoanError::Store(anyhow::anyhow!("connection reset"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_transition_error_message() {
        let err = LoanError::InvalidLoanStatusTransition {
            from: LoanStatus::Completed,
            to: LoanStatus::Active,
        };
        assert_eq!(err.to_string(), "invalid loan status transition: COMPLETED -> ACTIVE");
    }
}
