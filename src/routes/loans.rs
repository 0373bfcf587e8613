//! Loan Endpoints
//!
//! Loan creation, lookup and status transitions.
//! `update` / `approve` / `cancel` report `true` as 200 and `false` as 417 so
//! callers can treat both failure shapes the same way for retries.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    db::Loan,
    error::ApiError,
    services::{CustomerRecord, LoanApplication},
    types::{LoanStatus, ResponseDto},
    AppState,
};

// ============ Request/Response Types ============

/// 상태 변경 요청
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub loan_status: String,
}

/// 대출 조회 응답
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoanView {
    pub loan_id: i64,
    pub customer_id: String,
    pub loan_type: String,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub loan_status: LoanStatus,
    pub loan_duration: i32,
    pub start_date: NaiveDate,
    pub emi: f64,
    pub amount_paid: f64,
    pub outstanding_amount: f64,
    pub last_payment_date: Option<NaiveDate>,
    pub repayment_due_date: Option<NaiveDate>,
}

impl From<Loan> for LoanView {
    fn from(loan: Loan) -> Self {
        Self {
            loan_id: loan.loan_id,
            customer_id: loan.customer_id,
            loan_type: loan.loan_type,
            loan_amount: loan.loan_amount,
            interest_rate: loan.interest_rate,
            loan_status: loan.status,
            loan_duration: loan.loan_duration,
            start_date: loan.start_date,
            emi: loan.emi,
            amount_paid: loan.amount_paid,
            outstanding_amount: loan.outstanding_amount,
            last_payment_date: loan.last_payment_date,
            repayment_due_date: loan.repayment_due_date,
        }
    }
}

type Outcome = (StatusCode, Json<ResponseDto>);

fn update_outcome(updated: bool) -> Outcome {
    if updated {
        (StatusCode::OK, Json(ResponseDto::ok()))
    } else {
        (StatusCode::EXPECTATION_FAILED, Json(ResponseDto::update_failed()))
    }
}

// ============ Handlers ============

/// POST /api/loans/create
///
/// # Request
///
/// ```json
/// {
///   "customerId": "C1",
///   "loanType": "PERSONAL",
///   "loanAmount": 12000,
///   "interestRate": 12,
///   "loanDuration": 12
/// }
/// ```
pub async fn create_loan(
    State(state): State<AppState>,
    payload: Result<Json<LoanApplication>, JsonRejection>,
) -> Result<Outcome, ApiError> {
    let Json(application) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    state.loans.create_loan(application).await?;

    Ok((StatusCode::CREATED, Json(ResponseDto::created())))
}

/// PATCH /api/loans/update/:loan_id
pub async fn update_loan_status(
    State(state): State<AppState>,
    Path(loan_id): Path<i64>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Outcome, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if req.loan_status.trim().is_empty() {
        return Err(ApiError::ValidationError(
            "Loan status cannot be null or empty".to_string(),
        ));
    }
    let requested = req
        .loan_status
        .parse::<LoanStatus>()
        .map_err(ApiError::ValidationError)?;

    let updated = state.loans.update_loan_status(loan_id, requested).await?;
    Ok(update_outcome(updated))
}

/// GET /api/loans/:loan_id
pub async fn get_loan_by_id(
    State(state): State<AppState>,
    Path(loan_id): Path<i64>,
) -> Result<Json<LoanView>, ApiError> {
    let loan = state.loans.get_loan_by_id(loan_id).await?;
    Ok(Json(loan.into()))
}

/// GET /api/loans/all
pub async fn get_all_loans(
    State(state): State<AppState>,
) -> Result<Json<Vec<LoanView>>, ApiError> {
    let loans = state.loans.get_all_loans().await?;
    Ok(Json(loans.into_iter().map(LoanView::from).collect()))
}

/// GET /api/loans/customer/:customer_id
pub async fn get_loans_by_customer_id(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Vec<LoanView>>, ApiError> {
    let loans = state.loans.get_loans_by_customer_id(&customer_id).await?;
    Ok(Json(loans.into_iter().map(LoanView::from).collect()))
}

/// GET /api/loans/:loan_id/customer
pub async fn get_loan_customer(
    State(state): State<AppState>,
    Path(loan_id): Path<i64>,
) -> Result<Json<CustomerRecord>, ApiError> {
    Ok(Json(state.loans.get_loan_customer(loan_id).await?))
}

/// PATCH /api/loans/approve/:loan_id
pub async fn approve_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<i64>,
) -> Result<Outcome, ApiError> {
    let approved = state.loans.approve_loan(loan_id).await?;
    Ok(update_outcome(approved))
}

/// PUT /api/loans/cancel/:loan_id
pub async fn cancel_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<i64>,
) -> Result<Outcome, ApiError> {
    let cancelled = state.loans.cancel_loan(loan_id).await?;
    Ok(update_outcome(cancelled))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::db::LoanRepository;
    use crate::routes::test_support::{send, test_app};
    use crate::types::LoanStatus;

    fn loan_request(customer_id: &str) -> serde_json::Value {
        json!({
            "customerId": customer_id,
            "loanType": "PERSONAL",
            "loanAmount": 12000.0,
            "interestRate": 12.0,
            "loanDuration": 12
        })
    }

    #[tokio::test]
    async fn test_create_and_fetch_loan() {
        let app = test_app();

        let (status, body) =
            send(&app.router, "POST", "/api/loans/create", Some(loan_request("C1"))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["statusCode"], "201");

        let (status, body) = send(&app.router, "GET", "/api/loans/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["loanStatus"], "PENDING");
        assert_eq!(body["customerId"], "C1");
        assert_eq!(body["amountPaid"], 0.0);
        let emi = body["emi"].as_f64().unwrap();
        assert!((emi - 1066.19).abs() < 0.01);

        let (_, all) = send(&app.router, "GET", "/api/loans/all", None).await;
        assert_eq!(all.as_array().unwrap().len(), 1);

        let (_, by_customer) = send(&app.router, "GET", "/api/loans/customer/C1", None).await;
        assert_eq!(by_customer.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_loan_unknown_customer_is_404() {
        let app = test_app();

        let (status, body) =
            send(&app.router, "POST", "/api/loans/create", Some(loan_request("C404"))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(app.repo.count(), 0);
    }

    #[tokio::test]
    async fn test_create_loan_validation() {
        let app = test_app();
        let mut request = loan_request("C1");
        request["loanAmount"] = json!(-1.0);

        let (status, body) = send(&app.router, "POST", "/api/loans/create", Some(request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) =
            send(&app.router, "POST", "/api/loans/create", Some(json!({"customerId": "C1"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_status_update_codes() {
        let app = test_app();
        send(&app.router, "POST", "/api/loans/create", Some(loan_request("C1"))).await;

        let (status, _) = send(
            &app.router,
            "PATCH",
            "/api/loans/update/1",
            Some(json!({"loanStatus": "APPROVED"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // APPROVED -> ACTIVE 는 불법 전이
        let (status, body) = send(
            &app.router,
            "PATCH",
            "/api/loans/update/1",
            Some(json!({"loanStatus": "ACTIVE"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "INVALID_STATUS_TRANSITION");

        let (status, _) = send(
            &app.router,
            "PATCH",
            "/api/loans/update/1",
            Some(json!({"loanStatus": "FINISHED"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let stored = app.repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.status, LoanStatus::Approved);
    }

    #[tokio::test]
    async fn test_unfinished_completion_is_417() {
        let app = test_app();
        send(&app.router, "POST", "/api/loans/create", Some(loan_request("C1"))).await;
        let mut loan = app.repo.find_by_id(1).await.unwrap().unwrap();
        loan.status = LoanStatus::Active;
        app.repo.put(loan);

        let (status, body) = send(
            &app.router,
            "PATCH",
            "/api/loans/update/1",
            Some(json!({"loanStatus": "COMPLETED"})),
        )
        .await;

        assert_eq!(status, StatusCode::EXPECTATION_FAILED);
        assert_eq!(body["statusCode"], "417");
    }

    #[tokio::test]
    async fn test_unknown_loan_is_404() {
        let app = test_app();
        let (status, _) = send(&app.router, "GET", "/api/loans/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_loan_customer_lookup() {
        let app = test_app();
        send(&app.router, "POST", "/api/loans/create", Some(loan_request("C1"))).await;

        let (status, body) = send(&app.router, "GET", "/api/loans/1/customer", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "C1");
        assert!(body["firstName"].is_string());
    }

    #[tokio::test]
    async fn test_approve_and_cancel_are_501() {
        let app = test_app();

        let (status, body) = send(&app.router, "PATCH", "/api/loans/approve/1", None).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body["code"], "NOT_IMPLEMENTED");

        let (status, _) = send(&app.router, "PUT", "/api/loans/cancel/1", None).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    }
}
