//! Repository Pattern Implementation
//!
//! # Interview Q&A
//!
//! Q: Repository 패턴이란?
//! A: 데이터 접근 로직을 추상화하는 패턴
//!
//!    장점:
//!    - 비즈니스 로직과 데이터 접근 분리
//!    - 테스트 시 Mock 구현 쉬움
//!    - DB 교체 시 영향 최소화
//!
//! Q: 동시 상환 요청이 같은 대출의 `amount_paid`를 덮어쓰면?
//! A: lost update 방지를 위해 `version` 컬럼 사용
//!
//!    ```sql
//!    UPDATE loans SET ..., version = version + 1
//!    WHERE loan_id = $1 AND version = $2
//!    ```
//!
//!    - 영향받은 row가 0이면 다른 요청이 먼저 저장한 것
//!    - 호출자는 `ConcurrentModification`으로 처리

use async_trait::async_trait;
use anyhow::Result;

use super::models::{Loan, NewLoan};

/// Loan Repository 인터페이스
///
/// PostgreSQL 구현은 db/mod.rs의 `Database` 구조체에 있음
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// 신규 대출 저장, ID가 부여된 레코드 반환
    async fn insert(&self, loan: NewLoan) -> Result<Loan>;

    /// 기존 대출 저장
    ///
    /// `loan.version`이 저장된 버전과 다르면 `Ok(None)` (stale write)
    async fn update(&self, loan: &Loan) -> Result<Option<Loan>>;

    async fn find_by_id(&self, loan_id: i64) -> Result<Option<Loan>>;
    async fn find_all(&self) -> Result<Vec<Loan>>;
    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Vec<Loan>>;

    /// Health check
    async fn health_check(&self) -> Result<()>;
}

// 테스트용 Mock 구현:
