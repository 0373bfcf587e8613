//! Payment Executor Client
//!
//! Payment 서비스 (`/api/payments`) 연동.
//!
//! ```text
//! POST {base}/api/payments/make-payment  body: PaymentRequest -> PaymentResult
//! GET  {base}/api/payments/loan/{loanId}                      -> [PaymentResult]
//! ```
//!
//! 멱등성 키가 없으므로 재시도는 호출자가 결정 (이 클라이언트는 재시도하지 않음).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

/// Payment 서비스 결제 상태 중 성공 값
pub const PAYMENT_STATUS_PAID: &str = "PAID";

/// 결제 요청
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub loan_id: i64,
    pub customer_id: String,
    pub amount: f64,
    pub payment_method: String,
    pub payment_date: NaiveDate,
}

/// 결제 결과 (Payment 서비스 소유 레코드)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub amount: f64,
    pub payment_method: String,
    pub payment_date: String,
    /// PAID / FAILED / ...
    pub status: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

impl PaymentResult {
    pub fn is_paid(&self) -> bool {
        self.status == PAYMENT_STATUS_PAID
    }
}

#[async_trait]
pub trait PaymentExecutor: Send + Sync {
    async fn make_payment(&self, request: &PaymentRequest) -> Result<PaymentResult, UpstreamError>;
    async fn get_payments_by_loan(&self, loan_id: i64) -> Result<Vec<PaymentResult>, UpstreamError>;
}

/// HTTP 구현
pub struct HttpPaymentExecutor {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpPaymentExecutor {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build payment-service HTTP client")?;

        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid payment-service URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Payment-service URL cannot be a base: {}", base_url);
        }

        Ok(Self { base_url, client })
    }

    /// `{base}/api/payments/{segments..}`
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["api", "payments"]).extend(segments);
        }
        url
    }
}

#[async_trait]
impl PaymentExecutor for HttpPaymentExecutor {
    async fn make_payment(&self, request: &PaymentRequest) -> Result<PaymentResult, UpstreamError> {
        let url = self.endpoint(&["make-payment"]);
        tracing::debug!(%url, loan_id = request.loan_id, amount = request.amount, "Submitting payment");

        let result = self
            .client
            .post(url)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<PaymentResult>()
            .await?;

        Ok(result)
    }

    async fn get_payments_by_loan(&self, loan_id: i64) -> Result<Vec<PaymentResult>, UpstreamError> {
        let url = self.endpoint(&["loan", &loan_id.to_string()]);
        tracing::debug!(%url, "Fetching payments");

        let payments = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<PaymentResult>>()
            .await?;

        Ok(payments)
    }
}
