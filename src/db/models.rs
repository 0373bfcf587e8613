//! Database Models
//!
//! Loan records as persisted by the record store.
//! Principal, rate, term and EMI are fixed at origination; status and balances
//! change in place over the life of the loan.

use chrono::NaiveDate;
use sqlx::FromRow;

use crate::types::LoanStatus;

/// 대출 레코드
#[derive(Debug, Clone, PartialEq)]
pub struct Loan {
    /// 시스템이 부여하는 ID (불변)
    pub loan_id: i64,

    /// Customer 서비스의 고객 ID (생성 시점에만 존재 확인)
    pub customer_id: String,

    /// 자유 형식 분류 (PERSONAL, HOME, ...)
    pub loan_type: String,

    /// 원금
    pub loan_amount: f64,

    /// 연이율 (%)
    pub interest_rate: f64,

    /// 상환 기간 (개월)
    pub loan_duration: i32,

    /// 월 상환액 (생성 시 계산, 이후 불변)
    pub emi: f64,

    pub status: LoanStatus,

    /// 성공한 상환액 누적 (감소하지 않음)
    pub amount_paid: f64,

    /// 생성 시 총 상환 의무액 (emi * duration), 상환 시 갱신하지 않음
    pub outstanding_amount: f64,

    pub start_date: NaiveDate,
    pub last_payment_date: Option<NaiveDate>,
    pub repayment_due_date: Option<NaiveDate>,

    /// 낙관적 잠금용 버전 (저장 시마다 +1)
    pub version: i64,
}

impl Loan {
    /// 전체 상환 의무액 (emi * 기간)
    pub fn total_obligation(&self) -> f64 {
        self.emi * self.loan_duration as f64
    }
}

/// 신규 대출 (ID / 버전 부여 전)
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub customer_id: String,
    pub loan_type: String,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub loan_duration: i32,
    pub emi: f64,
    pub status: LoanStatus,
    pub amount_paid: f64,
    pub outstanding_amount: f64,
    pub start_date: NaiveDate,
    pub repayment_due_date: Option<NaiveDate>,
}

impl NewLoan {
    pub fn into_loan(self, loan_id: i64) -> Loan {
        Loan {
            loan_id,
            customer_id: self.customer_id,
            loan_type: self.loan_type,
            loan_amount: self.loan_amount,
            interest_rate: self.interest_rate,
            loan_duration: self.loan_duration,
            emi: self.emi,
            status: self.status,
            amount_paid: self.amount_paid,
            outstanding_amount: self.outstanding_amount,
            start_date: self.start_date,
            last_payment_date: None,
            repayment_due_date: self.repayment_due_date,
            version: 0,
        }
    }
}

/// `loans` 테이블 row (status는 TEXT로 저장)
#[derive(Debug, Clone, FromRow)]
pub(crate) struct LoanRow {
    pub loan_id: i64,
    pub customer_id: String,
    pub loan_type: String,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub loan_duration: i32,
    pub emi: f64,
    pub loan_status: String,
    pub amount_paid: f64,
    pub outstanding_amount: f64,
    pub start_date: NaiveDate,
    pub last_payment_date: Option<NaiveDate>,
    pub repayment_due_date: Option<NaiveDate>,
    pub version: i64,
}

impl TryFrom<LoanRow> for Loan {
    type Error = anyhow::Error;

    fn try_from(row: LoanRow) -> anyhow::Result<Self> {
        let status = row
            .loan_status
            .parse::<LoanStatus>()
            .map_err(|e| anyhow::anyhow!("loan {}: {}", row.loan_id, e))?;

        Ok(Loan {
            loan_id: row.loan_id,
            customer_id: row.customer_id,
            loan_type: row.loan_type,
            loan_amount: row.loan_amount,
            interest_rate: row.interest_rate,
            loan_duration: row.loan_duration,
            emi: row.emi,
            status,
            amount_paid: row.amount_paid,
            outstanding_amount: row.outstanding_amount,
            start_date: row.start_date,
            last_payment_date: row.last_payment_date,
            repayment_due_date: row.repayment_due_date,
            version: row.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> LoanRow {
        LoanRow {
            loan_id: 42,
            customer_id: "C1".to_string(),
            loan_type: "PERSONAL".to_string(),
            loan_amount: 12000.0,
            interest_rate: 12.0,
            loan_duration: 12,
            emi: 1066.19,
            loan_status: status.to_string(),
            amount_paid: 0.0,
            outstanding_amount: 12794.28,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            last_payment_date: None,
            repayment_due_date: None,
            version: 3,
        }
    }

    #[test]
    fn test_row_conversion() {
        let loan = Loan::try_from(row("IN_ARREARS")).unwrap();
        assert_eq!(loan.status, LoanStatus::InArrears);
        assert_eq!(loan.version, 3);
    }

    #[test]
    fn test_row_with_unknown_status_is_rejected() {
        let err = Loan::try_from(row("LOST")).unwrap_err();
        assert!(err.to_string().contains("loan 42"));
    }
}
