//! Database Module
//!
//! # Interview Q&A
//!
//! Q: 왜 PostgreSQL을 선택했는가?
//! A: 대출 잔액/상태는 금융 데이터
//!
//!    1. ACID 트랜잭션: 단일 UPDATE 단위의 원자성 보장
//!    2. 인덱싱: 고객별 대출 조회 최적화
//!    3. 생태계: SQLx 등 Rust 라이브러리 지원
//!
//! Q: 커넥션 풀은 어떻게 관리하는가?
//! A: SQLx의 PgPool 사용
//!    - 최소/최대 커넥션 수 설정
//!    - 커넥션 재사용 (오버헤드 감소)
//!    - 타임아웃 처리

mod models;
mod repository;

pub use models::*;
pub use repository::LoanRepository;

#[cfg(test)]
pub use repository::mock;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

const LOAN_COLUMNS: &str = r#"
    loan_id,
    customer_id,
    loan_type,
    loan_amount,
    interest_rate,
    loan_duration,
    emi,
    loan_status,
    amount_paid,
    outstanding_amount,
    start_date,
    last_payment_date,
    repayment_due_date,
    version
"#;

/// 데이터베이스 연결 및 쿼리 담당
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 데이터베이스 연결
    ///
    /// # Connection Pool Settings
    ///
    /// - max_connections: 10 (트래픽에 따라 조정)
    /// - min_connections: 1 (idle 시 최소 유지)
    /// - acquire_timeout: 3초 (커넥션 획득 대기)
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// 마이그레이션 실행
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await?;
        Ok(())
    }

    async fn fetch_loans(&self, filter: &str, customer_id: Option<&str>) -> Result<Vec<Loan>> {
        let sql = format!("SELECT {} FROM loans {} ORDER BY loan_id", LOAN_COLUMNS, filter);
        let mut query = sqlx::query_as::<_, LoanRow>(&sql);
        if let Some(customer_id) = customer_id {
            query = query.bind(customer_id);
        }

        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Loan::try_from)
            .collect()
    }
}

#[async_trait]
impl LoanRepository for Database {
    async fn insert(&self, loan: NewLoan) -> Result<Loan> {
        let sql = format!(
            r#"
            INSERT INTO loans (
                customer_id, loan_type, loan_amount, interest_rate, loan_duration,
                emi, loan_status, amount_paid, outstanding_amount,
                start_date, repayment_due_date, version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 0)
            RETURNING {}
            "#,
            LOAN_COLUMNS
        );

        let row = sqlx::query_as::<_, LoanRow>(&sql)
            .bind(&loan.customer_id)
            .bind(&loan.loan_type)
            .bind(loan.loan_amount)
            .bind(loan.interest_rate)
            .bind(loan.loan_duration)
            .bind(loan.emi)
            .bind(loan.status.as_str())
            .bind(loan.amount_paid)
            .bind(loan.outstanding_amount)
            .bind(loan.start_date)
            .bind(loan.repayment_due_date)
            .fetch_one(&self.pool)
            .await?;

        Loan::try_from(row)
    }

    async fn update(&self, loan: &Loan) -> Result<Option<Loan>> {
        // 원금/이율/기간/EMI/시작일은 불변이므로 갱신 대상에서 제외
        let sql = format!(
            r#"
            UPDATE loans SET
                loan_status = $3,
                amount_paid = $4,
                outstanding_amount = $5,
                last_payment_date = $6,
                repayment_due_date = $7,
                version = version + 1,
                updated_at = NOW()
            WHERE loan_id = $1 AND version = $2
            RETURNING {}
            "#,
            LOAN_COLUMNS
        );

        let row = sqlx::query_as::<_, LoanRow>(&sql)
            .bind(loan.loan_id)
            .bind(loan.version)
            .bind(loan.status.as_str())
            .bind(loan.amount_paid)
            .bind(loan.outstanding_amount)
            .bind(loan.last_payment_date)
            .bind(loan.repayment_due_date)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Loan::try_from).transpose()
    }

    async fn find_by_id(&self, loan_id: i64) -> Result<Option<Loan>> {
        let sql = format!("SELECT {} FROM loans WHERE loan_id = $1", LOAN_COLUMNS);
        let row = sqlx::query_as::<_, LoanRow>(&sql)
            .bind(loan_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Loan::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Loan>> {
        self.fetch_loans("", None).await
    }

    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Vec<Loan>> {
        self.fetch_loans("WHERE customer_id = $1", Some(customer_id)).await
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
