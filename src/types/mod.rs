//! Common Types Module
//!
//! 애플리케이션 전반에서 사용되는 공통 타입 정의

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 대출 상태
///
/// 저장소와 wire 포맷 모두 `SCREAMING_SNAKE_CASE` 문자열 사용 (예: `IN_ARREARS`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    /// 신청 접수, 심사 전
    Pending,
    /// 승인됨, 아직 지급 전
    Approved,
    /// 대출금 지급 완료
    Disbursed,
    /// 상환 진행 중
    Active,
    /// 전액 상환
    Completed,
    Defaulted,
    /// 연체 (default 이전 단계)
    InArrears,
    Rejected,
    Cancelled,
    Closed,
    Settled,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 11] = [
        LoanStatus::Pending,
        LoanStatus::Approved,
        LoanStatus::Disbursed,
        LoanStatus::Active,
        LoanStatus::Completed,
        LoanStatus::Defaulted,
        LoanStatus::InArrears,
        LoanStatus::Rejected,
        LoanStatus::Cancelled,
        LoanStatus::Closed,
        LoanStatus::Settled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "PENDING",
            LoanStatus::Approved => "APPROVED",
            LoanStatus::Disbursed => "DISBURSED",
            LoanStatus::Active => "ACTIVE",
            LoanStatus::Completed => "COMPLETED",
            LoanStatus::Defaulted => "DEFAULTED",
            LoanStatus::InArrears => "IN_ARREARS",
            LoanStatus::Rejected => "REJECTED",
            LoanStatus::Cancelled => "CANCELLED",
            LoanStatus::Closed => "CLOSED",
            LoanStatus::Settled => "SETTLED",
        }
    }

    /// 더 이상 전이가 없는 종료 상태
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LoanStatus::Completed
                | LoanStatus::Rejected
                | LoanStatus::Cancelled
                | LoanStatus::Closed
                | LoanStatus::Settled
                | LoanStatus::Defaulted
        )
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        LoanStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("Unknown loan status: {}", s))
    }
}

/// 단순 처리 결과 응답 (`{"statusCode": "201", "statusMsg": "..."}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDto {
    pub status_code: String,
    pub status_msg: String,
}

impl ResponseDto {
    pub const MESSAGE_201: &'static str = "Loan created successfully";
    pub const MESSAGE_200: &'static str = "Request processed successfully";
    pub const MESSAGE_417_UPDATE: &'static str =
        "Update operation failed. Please try again or contact Dev team";
    pub const MESSAGE_417_PAYMENT: &'static str =
        "Payment operation failed. Please try again or contact Dev team";

    pub fn new(status_code: &str, status_msg: &str) -> Self {
        Self {
            status_code: status_code.to_string(),
            status_msg: status_msg.to_string(),
        }
    }

    pub fn created() -> Self {
        Self::new("201", Self::MESSAGE_201)
    }

    pub fn ok() -> Self {
        Self::new("200", Self::MESSAGE_200)
    }

    pub fn update_failed() -> Self {
        Self::new("417", Self::MESSAGE_417_UPDATE)
    }

    pub fn payment_failed() -> Self {
        Self::new("417", Self::MESSAGE_417_PAYMENT)
    }
}

/// 운영 담당자 연락처 (`GET /api/loans/contact-info`)
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub message: String,
    pub contact_details: HashMap<String, String>,
    pub on_call_support: Vec<String>,
}
