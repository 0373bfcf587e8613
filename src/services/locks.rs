//! Per-loan mutation locks
//!
//! 같은 대출에 대한 상태 변경 / 상환 반영을 프로세스 내에서 직렬화.
//! 서로 다른 대출은 병렬로 처리됨. 프로세스 간 경합은 저장소의 `version` 체크가 담당.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
pub struct LoanLocks {
    locks: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl LoanLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 해당 대출의 lock 획득 (guard drop 시 해제)
    pub async fn acquire(&self, loan_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // 대기자가 없는 lock 정리 (map 자신만 참조 중)
            locks.retain(|id, lock| *id == loan_id || Arc::strong_count(lock) > 1);
            locks.entry(loan_id).or_default().clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_loan_is_serialized() {
        let locks = Arc::new(LoanLocks::new());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let in_flight = in_flight.clone();
            let max_seen = max_seen.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(7).await;
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_loans_do_not_block() {
        let locks = LoanLocks::new();
        let _first = locks.acquire(1).await;

        let second = tokio::time::timeout(Duration::from_millis(100), locks.acquire(2)).await;
        assert!(second.is_ok());
    }
}
