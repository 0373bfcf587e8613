//! Services Module
//!
//! 비즈니스 로직을 담당하는 서비스 레이어
//!
//! # Services
//! - `LoanService`: 대출 생성 / 상태 변경 / 상환 반영
//! - `amortization`: EMI 계산
//! - `lifecycle`: 대출 상태 머신
//! - `CustomerDirectory`: Customer 서비스 연동
//! - `PaymentExecutor`: Payment 서비스 연동

pub mod amortization;
pub mod lifecycle;
mod customer_directory;
mod loan_service;
mod locks;
mod payment_executor;

pub use amortization::compute_emi;
pub use customer_directory::{CustomerDirectory, CustomerRecord, HttpCustomerDirectory};
pub use loan_service::{LoanApplication, LoanService, PaymentSubmission};
pub use payment_executor::{
    HttpPaymentExecutor, PaymentExecutor, PaymentRequest, PaymentResult, PAYMENT_STATUS_PAID,
};

#[cfg(test)]
pub use customer_directory::mock::StubCustomerDirectory;
#[cfg(test)]
pub use payment_executor::mock::{PaymentOutcome, StubPaymentExecutor};

/// 테스트용 HTTP 서버를 임의 포트로 띄우고 base URL 반환
#[cfg(test)]
pub(crate) async fn spawn_stub_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
