//! 비공개 요청용 nonce 카운터.
//!
//! 거래소는 같은 키에서 재사용되거나 감소하는 nonce를 거부하므로,
//! 여러 호출자가 동시에 사용해도 발급 값이 엄격하게 증가해야 합니다.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::{PoloniexError, PoloniexResult};

/// 호출마다 증가하는 폭.
pub const NONCE_STEP: u64 = 42;

/// 서버 제시값으로 앞당길 수 있는 상한. 이보다 크면 한 단계 증가로 대체합니다.
const MAX_RESYNC_HINT: u64 = u64::MAX - NONCE_STEP;

/// 원자적 nonce 카운터.
#[derive(Debug)]
pub struct NonceCounter {
    current: AtomicU64,
}

impl NonceCounter {
    /// 주어진 값에서 시작하는 카운터 생성.
    pub fn starting_at(value: u64) -> Self {
        Self {
            current: AtomicU64::new(value),
        }
    }

    /// 현재 시각(마이크로초)에서 시작하는 카운터 생성.
    pub fn from_clock() -> Self {
        let micros = Utc::now().timestamp_micros().max(0) as u64;
        Self::starting_at(micros)
    }

    /// 다음 nonce를 발급합니다.
    ///
    /// 카운터가 `u64` 범위를 넘으면 `ProtocolError`를 반환하고 값은 그대로 둡니다.
    pub fn next(&self) -> PoloniexResult<u64> {
        self.current
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_add(NONCE_STEP))
            .map(|prev| prev + NONCE_STEP)
            .map_err(|v| PoloniexError::ProtocolError(format!("Nonce counter exhausted at {}", v)))
    }

    /// 마지막으로 발급된 값.
    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    /// 서버가 nonce가 뒤처졌다고 알렸을 때 카운터를 앞당깁니다.
    ///
    /// 서버가 최소값을 제시하면 그 값 이상으로 이동하고, 아니면 한 단계 증가합니다.
    /// 제시값이 `u64::MAX - NONCE_STEP`을 넘으면 무시하고 한 단계만 증가합니다.
    /// 카운터는 절대 감소하지 않습니다.
    pub fn resync(&self, server_minimum: Option<u64>) -> PoloniexResult<u64> {
        match server_minimum {
            Some(min) if min <= MAX_RESYNC_HINT => {
                self.current.fetch_max(min, Ordering::SeqCst);
                Ok(self.current())
            }
            _ => self.next(),
        }
    }
}

impl Default for NonceCounter {
    fn default() -> Self {
        Self::from_clock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_next_increments_by_step() {
        let nonce = NonceCounter::starting_at(1000);
        assert_eq!(nonce.next().unwrap(), 1042);
        assert_eq!(nonce.next().unwrap(), 1084);
        assert_eq!(nonce.current(), 1084);
    }

    #[test]
    fn test_from_clock_is_microseconds() {
        let nonce = NonceCounter::from_clock();
        // 2020-01-01 이후의 마이크로초 타임스탬프
        assert!(nonce.current() > 1_577_836_800_000_000);
    }

    #[test]
    fn test_resync_fast_forwards() {
        let nonce = NonceCounter::starting_at(100);
        nonce.resync(Some(5000)).unwrap();
        assert!(nonce.next().unwrap() > 5000);
    }

    #[test]
    fn test_resync_ignores_hint_near_overflow() {
        let nonce = NonceCounter::starting_at(1);
        nonce.resync(Some(u64::MAX - 10)).unwrap();
        assert_eq!(nonce.current(), 43);
        assert_eq!(nonce.next().unwrap(), 85);
    }

    #[test]
    fn test_resync_accepts_largest_safe_hint() {
        let nonce = NonceCounter::starting_at(1);
        nonce.resync(Some(u64::MAX - NONCE_STEP)).unwrap();
        assert_eq!(nonce.next().unwrap(), u64::MAX);
    }

    #[test]
    fn test_next_reports_exhaustion() {
        let nonce = NonceCounter::starting_at(u64::MAX - 10);
        let err = nonce.next().unwrap_err();
        assert!(matches!(err, PoloniexError::ProtocolError(_)));
        assert!(!err.is_retryable());
        assert_eq!(nonce.current(), u64::MAX - 10);
    }

    #[test]
    fn test_resync_never_moves_backwards() {
        let nonce = NonceCounter::starting_at(10_000);
        nonce.resync(Some(50)).unwrap();
        assert_eq!(nonce.current(), 10_000);
    }

    #[test]
    fn test_resync_without_hint_bumps() {
        let nonce = NonceCounter::starting_at(10);
        assert_eq!(nonce.resync(None).unwrap(), 52);
        assert_eq!(nonce.current(), 52);
    }

    #[test]
    fn test_concurrent_nonces_are_unique() {
        let nonce = Arc::new(NonceCounter::starting_at(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let nonce = Arc::clone(&nonce);
                thread::spawn(move || (0..100).map(|_| nonce.next().unwrap()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for value in handle.join().unwrap() {
                assert!(seen.insert(value), "duplicate nonce {}", value);
            }
        }
        assert_eq!(seen.len(), 800);
    }

    proptest! {
        #[test]
        fn prop_nonce_strictly_increases(
            start in 0u64..1_000_000_000,
            hints in proptest::collection::vec(proptest::option::of(0u64..u64::MAX / 2), 0..20),
        ) {
            let nonce = NonceCounter::starting_at(start);
            let mut last = nonce.next().unwrap();
            for hint in hints {
                nonce.resync(hint).unwrap();
                let value = nonce.next().unwrap();
                prop_assert!(value > last);
                last = value;
            }
        }
    }
}
