//! Amortization Calculator
//!
//! 원리금 균등 상환(EMI) 계산
//!
//! ```text
//! r   = 연이율 / 12 / 100
//! EMI = P * r * (1 + r)^n / ((1 + r)^n - 1)
//! ```
//!
//! 구현은 같은 식을 `EMI = P * r / (1 - (1 + r)^-n)` 로 바꿔
//! `ln_1p` / `exp_m1` 로 계산. `1 + r` 이 1.0 으로 반올림되는 아주 작은 이율이나
//! `(1 + r)^n` 이 overflow 하는 큰 이율에서도 유한한 값이 나옴.
//!
//! 이율이 0이면 (또는 분모가 0으로 underflow 하면) `P / n` 으로 처리.

use crate::error::LoanError;

/// 월 상환액 계산
///
/// 입력 범위(양수) 검증은 호출자 책임. NaN / 무한대 입력 또는 결과만 에러.
pub fn compute_emi(
    principal: f64,
    annual_rate_percent: f64,
    term_months: i32,
) -> Result<f64, LoanError> {
    if !principal.is_finite() || !annual_rate_percent.is_finite() {
        return Err(LoanError::InvalidLoanParameters(format!(
            "principal={}, rate={} must be finite",
            principal, annual_rate_percent
        )));
    }
    if term_months == 0 {
        return Err(LoanError::InvalidLoanParameters(
            "loan duration must be at least one month".to_string(),
        ));
    }

    let n = term_months as f64;
    if annual_rate_percent == 0.0 {
        return Ok(principal / n);
    }

    let monthly_rate = annual_rate_percent / 12.0 / 100.0;
    // 1 - (1 + r)^-n
    let discount = -(-n * monthly_rate.ln_1p()).exp_m1();
    if discount == 0.0 {
        return Ok(principal / n);
    }
    let emi = principal * (monthly_rate / discount);

    if !emi.is_finite() {
        return Err(LoanError::InvalidLoanParameters(format!(
            "EMI is undefined for principal={}, rate={}, term={}",
            principal, annual_rate_percent, term_months
        )));
    }

    Ok(emi)
}
