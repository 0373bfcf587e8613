//! Loan Service
//!
//! 대출 생성 / 상태 변경 / 상환 반영을 담당하는 서비스 레이어.
//!
//! # Flow
//!
//! ```text
//! create_loan:    validate ─▶ customer gate ─▶ EMI ─▶ insert (PENDING)
//! update_status:  lock ─▶ load ─▶ state machine ─▶ update
//! make_payment:   validate ─▶ lock ─▶ load ─▶ payment service ─▶ amount_paid += ─▶ update
//! ```
//!
//! 각 단계는 `Result`를 반환하고 실패 시 즉시 중단. 단계 간 분산 트랜잭션 없음:
//! 고객 확인 후 저장 전에 실패하면 대출은 생성되지 않은 상태로 남음.
//!
//! # Interview Q&A
//!
//! Q: 결제는 성공했는데 대출 저장이 실패하면?
//! A: `false` 반환 + error 로그 (보상 트랜잭션 없음)
//!    - Payment 서비스에는 결제 기록이 남아 있음
//!    - 멱등성 키가 없으므로 재시도 시 이중 반영 가능 → 운영자가 대사 필요

use std::sync::Arc;

use chrono::{Months, NaiveDate, Utc};
use serde::Deserialize;

use crate::db::{Loan, LoanRepository, NewLoan};
use crate::error::{LoanError, UpstreamError};
use crate::services::amortization::compute_emi;
use crate::services::customer_directory::{CustomerDirectory, CustomerRecord};
use crate::services::lifecycle;
use crate::services::locks::LoanLocks;
use crate::services::payment_executor::{PaymentExecutor, PaymentRequest, PaymentResult};
use crate::types::LoanStatus;

const CUSTOMER_SERVICE: &str = "customer-service";
const PAYMENT_SERVICE: &str = "payment-service";

/// 대출 신청
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    pub customer_id: String,
    pub loan_type: String,
    pub loan_amount: f64,
    /// 연이율 (%)
    pub interest_rate: f64,
    /// 개월
    pub loan_duration: i32,
}

impl LoanApplication {
    pub fn validate(&self) -> Result<(), LoanError> {
        let mut errors = Vec::new();
        if self.customer_id.trim().is_empty() {
            errors.push("customerId cannot be null or empty");
        } else if self.customer_id.contains('/') {
            errors.push("customerId must not contain '/'");
        }
        if self.loan_type.trim().is_empty() {
            errors.push("loanType cannot be null or empty");
        }
        if self.loan_amount <= 0.0 || !self.loan_amount.is_finite() {
            errors.push("loanAmount must be a positive number");
        }
        if self.interest_rate <= 0.0 || !self.interest_rate.is_finite() {
            errors.push("interestRate must be a positive number");
        }
        if self.loan_duration <= 0 {
            errors.push("loanDuration must be a positive number");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LoanError::Validation(errors.join(", ")))
        }
    }
}

/// 상환 요청 (loanId는 경로에서)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSubmission {
    pub customer_id: String,
    pub amount: f64,
    pub payment_method: String,
    pub payment_date: NaiveDate,
}

impl PaymentSubmission {
    pub fn validate(&self, today: NaiveDate) -> Result<(), LoanError> {
        let mut errors = Vec::new();
        if self.customer_id.trim().is_empty() {
            errors.push("customerId cannot be null or empty");
        }
        if self.amount <= 0.0 || !self.amount.is_finite() {
            errors.push("amount must be a positive number");
        }
        if self.payment_method.trim().is_empty() {
            errors.push("paymentMethod cannot be null or empty");
        }
        if self.payment_date > today {
            errors.push("paymentDate must be in the past or present");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LoanError::Validation(errors.join(", ")))
        }
    }
}

pub struct LoanService {
    repository: Arc<dyn LoanRepository>,
    customers: Arc<dyn CustomerDirectory>,
    payments: Arc<dyn PaymentExecutor>,
    locks: LoanLocks,
}

impl LoanService {
    pub fn new(
        repository: Arc<dyn LoanRepository>,
        customers: Arc<dyn CustomerDirectory>,
        payments: Arc<dyn PaymentExecutor>,
    ) -> Self {
        Self {
            repository,
            customers,
            payments,
            locks: LoanLocks::new(),
        }
    }

    /// 대출 생성 (PENDING)
    pub async fn create_loan(&self, application: LoanApplication) -> Result<Loan, LoanError> {
        application.validate()?;
        self.ensure_customer_exists(&application.customer_id).await?;

        let emi = compute_emi(
            application.loan_amount,
            application.interest_rate,
            application.loan_duration,
        )?;

        let start_date = today();
        let new_loan = NewLoan {
            customer_id: application.customer_id,
            loan_type: application.loan_type,
            loan_amount: application.loan_amount,
            interest_rate: application.interest_rate,
            loan_duration: application.loan_duration,
            emi,
            status: LoanStatus::Pending,
            amount_paid: 0.0,
            outstanding_amount: emi * application.loan_duration as f64,
            start_date,
            repayment_due_date: start_date.checked_add_months(Months::new(1)),
        };

        let loan = self.repository.insert(new_loan).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to create loan");
            LoanError::Store(e)
        })?;

        tracing::info!(
            loan_id = loan.loan_id,
            customer_id = %loan.customer_id,
            emi = loan.emi,
            "Loan created"
        );
        Ok(loan)
    }

    /// 상태 변경
    ///
    /// `Ok(true)`: 상태 변경됨, `Ok(false)`: ACTIVE → COMPLETED 요청이지만 상환 미완료
    pub async fn update_loan_status(
        &self,
        loan_id: i64,
        requested: LoanStatus,
    ) -> Result<bool, LoanError> {
        let _guard = self.locks.acquire(loan_id).await;
        let mut loan = self.load(loan_id).await?;

        let transition = lifecycle::next_status(&loan, requested).map_err(|e| {
            tracing::warn!(loan_id, from = %loan.status, to = %requested, "Rejected status transition");
            e
        })?;

        if !transition.occurred() {
            tracing::info!(
                loan_id,
                amount_paid = loan.amount_paid,
                obligation = loan.total_obligation(),
                "Loan not paid in full, remains ACTIVE"
            );
            return Ok(false);
        }

        let from = loan.status;
        loan.status = transition.status();
        self.persist(&loan).await?;

        tracing::info!(loan_id, %from, to = %loan.status, "Loan status updated");
        Ok(true)
    }

    pub async fn get_loan_by_id(&self, loan_id: i64) -> Result<Loan, LoanError> {
        self.load(loan_id).await
    }

    pub async fn get_all_loans(&self) -> Result<Vec<Loan>, LoanError> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn get_loans_by_customer_id(&self, customer_id: &str) -> Result<Vec<Loan>, LoanError> {
        Ok(self.repository.find_by_customer_id(customer_id).await?)
    }

    /// 상환 반영
    ///
    /// - Payment 서비스 통신 실패: `Ok(false)` (재시도 없음)
    /// - PAID 이외 상태: `Err(PaymentFailed)`, 대출 변경 없음
    /// - PAID: `amount_paid += amount` 저장 후 `Ok(true)`
    ///   (응답 금액이 음수 / NaN 이면 `Err(PaymentFailed)`, `amount_paid`는 감소하지 않음)
    ///
    /// `outstanding_amount`는 갱신하지 않음.
    pub async fn make_payment(
        &self,
        loan_id: i64,
        submission: PaymentSubmission,
    ) -> Result<bool, LoanError> {
        submission.validate(today())?;

        let _guard = self.locks.acquire(loan_id).await;
        let mut loan = self.load(loan_id).await?;

        let request = PaymentRequest {
            loan_id,
            customer_id: submission.customer_id,
            amount: submission.amount,
            payment_method: submission.payment_method,
            payment_date: submission.payment_date,
        };

        let payment = match self.payments.make_payment(&request).await {
            Ok(payment) => payment,
            Err(e) => {
                tracing::error!(loan_id, error = %e, "Payment failed for loan");
                return Ok(false);
            }
        };

        if !payment.is_paid() {
            tracing::warn!(loan_id, status = %payment.status, "Payment was not completed");
            return Err(LoanError::PaymentFailed {
                status: payment.status,
            });
        }

        if !payment.amount.is_finite() || payment.amount < 0.0 {
            tracing::error!(loan_id, amount = payment.amount, "Payment service reported an invalid amount");
            return Err(LoanError::PaymentFailed {
                status: format!("{} with invalid amount {}", payment.status, payment.amount),
            });
        }

        loan.amount_paid += payment.amount;
        loan.last_payment_date = Some(request.payment_date);

        match self.persist(&loan).await {
            Ok(saved) => {
                tracing::info!(
                    loan_id,
                    amount = payment.amount,
                    amount_paid = saved.amount_paid,
                    transaction_id = ?payment.transaction_id,
                    "Payment applied"
                );
                Ok(true)
            }
            Err(e) => {
                tracing::error!(
                    loan_id,
                    transaction_id = ?payment.transaction_id,
                    error = %e,
                    "Payment accepted but loan could not be saved"
                );
                Ok(false)
            }
        }
    }

    /// 대출의 결제 내역 (Payment 서비스 조회)
    ///
    /// Payment 서비스가 404를 주면 빈 목록 ("결제 없음"과 "모르는 대출"을 구분하지 않음)
    pub async fn get_loan_payments(&self, loan_id: i64) -> Result<Vec<PaymentResult>, LoanError> {
        self.load(loan_id).await?;

        match self.payments.get_payments_by_loan(loan_id).await {
            Ok(payments) => Ok(payments),
            Err(UpstreamError::NotFound) => {
                tracing::warn!(loan_id, "Unable to get payments for loan");
                Ok(Vec::new())
            }
            Err(reason) => Err(LoanError::UpstreamUnavailable {
                service: PAYMENT_SERVICE,
                reason,
            }),
        }
    }

    /// 대출 차주의 고객 정보
    pub async fn get_loan_customer(&self, loan_id: i64) -> Result<CustomerRecord, LoanError> {
        let loan = self.load(loan_id).await?;

        match self.customers.get_customer(&loan.customer_id).await {
            Ok(customer) => Ok(customer),
            Err(UpstreamError::NotFound) => Err(LoanError::CustomerNotFound(loan.customer_id)),
            Err(reason) => Err(LoanError::UpstreamUnavailable {
                service: CUSTOMER_SERVICE,
                reason,
            }),
        }
    }

    pub async fn approve_loan(&self, loan_id: i64) -> Result<bool, LoanError> {
        tracing::debug!(loan_id, "approveLoan requested");
        Err(LoanError::NotImplemented("approveLoan"))
    }

    pub async fn cancel_loan(&self, loan_id: i64) -> Result<bool, LoanError> {
        tracing::debug!(loan_id, "cancelLoan requested");
        Err(LoanError::NotImplemented("cancelLoan"))
    }

    /// 저장소 health check
    pub async fn store_health(&self) -> anyhow::Result<()> {
        self.repository.health_check().await
    }

    // ============ Helpers ============

    async fn ensure_customer_exists(&self, customer_id: &str) -> Result<(), LoanError> {
        match self.customers.customer_exists(customer_id).await {
            Ok(true) => Ok(()),
            Ok(false) | Err(UpstreamError::NotFound) => {
                tracing::warn!(customer_id, "Customer not found");
                Err(LoanError::CustomerNotFound(customer_id.to_string()))
            }
            Err(reason) => Err(LoanError::UpstreamUnavailable {
                service: CUSTOMER_SERVICE,
                reason,
            }),
        }
    }

    async fn load(&self, loan_id: i64) -> Result<Loan, LoanError> {
        self.repository
            .find_by_id(loan_id)
            .await?
            .ok_or(LoanError::LoanNotFound(loan_id))
    }

    async fn persist(&self, loan: &Loan) -> Result<Loan, LoanError> {
        self.repository
            .update(loan)
            .await?
            .ok_or(LoanError::ConcurrentModification(loan.loan_id))
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
