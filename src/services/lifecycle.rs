//! Loan Lifecycle State Machine
//!
//! # Transition Table
//!
//! ```text
//! PENDING ──▶ APPROVED ──▶ DISBURSED ──▶ ACTIVE ──▶ COMPLETED
//!                                          │  ▲
//!                                          └──┘  상환 미완료 시 ACTIVE 유지
//! ```
//!
//! 위 4개 전이 외의 모든 `(from, to)` 조합은 `InvalidLoanStatusTransition`.
//! 종료 상태(COMPLETED, REJECTED, CANCELLED, CLOSED, SETTLED, DEFAULTED)에서는
//! 나가는 전이가 없음.
//!
//! # Completion Guard
//!
//! ACTIVE → COMPLETED 는 `amount_paid == emi * duration` 일 때만 성립.
//! 부동소수점 정확 일치 비교이므로 누적 상환액이 1e-9 만 달라도 ACTIVE 유지.

use crate::db::Loan;
use crate::error::LoanError;
use crate::types::LoanStatus;

/// 상태 전이 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// 요청한 상태로 변경됨
    Applied(LoanStatus),
    /// 합법적인 요청이지만 완료 조건 미충족으로 현재 상태 유지
    Held(LoanStatus),
}

impl Transition {
    /// 실제로 상태가 바뀌었는지
    pub fn occurred(&self) -> bool {
        matches!(self, Transition::Applied(_))
    }

    pub fn status(&self) -> LoanStatus {
        match self {
            Transition::Applied(status) | Transition::Held(status) => *status,
        }
    }
}

/// 요청된 전이를 검증하고 다음 상태를 결정
///
/// 순수 함수: `loan`은 읽기만 함. 저장은 호출자 책임.
pub fn next_status(loan: &Loan, requested: LoanStatus) -> Result<Transition, LoanError> {
    use LoanStatus::*;

    match (loan.status, requested) {
        (Pending, Approved) | (Approved, Disbursed) | (Disbursed, Active) => {
            Ok(Transition::Applied(requested))
        }
        (Active, Completed) => {
            if is_paid_in_full(loan) {
                Ok(Transition::Applied(Completed))
            } else {
                Ok(Transition::Held(Active))
            }
        }
        (from, to) => Err(LoanError::InvalidLoanStatusTransition { from, to }),
    }
}

/// 누적 상환액이 전체 상환 의무액과 정확히 일치하는지
#[allow(clippy::float_cmp)]
pub fn is_paid_in_full(loan: &Loan) -> bool {
    loan.total_obligation() == loan.amount_paid
}
