//! 고정 일정 재시도.
//!
//! 지연 일정은 `[0, 2, 5, 30]`초이며 총 4회 시도합니다.
//! 시도 `i`가 일시적 실패로 끝나면 `delays[i]`만큼 대기 후 다시 시도하고,
//! 마지막 항목에서 실패하면 대기 없이 `RetryExhausted`를 반환합니다.
//!
//! ```text
//! Start -> Attempt -> Success
//!                  -> TransientFailure -> [일정 소진] -> Exhausted
//!                                      -> Wait -> Attempt
//!                  -> ConfigurationError | ProtocolError (즉시 종료)
//! ```

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{PoloniexError, PoloniexResult};

/// 기본 지연 일정 (초).
pub const RETRY_DELAYS_SECS: [u64; 4] = [0, 2, 5, 30];

/// 재시도 지연 일정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrySchedule {
    delays: Vec<Duration>,
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self::from_secs(&RETRY_DELAYS_SECS)
    }
}

impl RetrySchedule {
    /// 초 단위 지연 목록으로 생성.
    ///
    /// 빈 목록은 시도 1회로 취급합니다.
    pub fn from_secs(delays: &[u64]) -> Self {
        let mut delays: Vec<Duration> = delays.iter().map(|s| Duration::from_secs(*s)).collect();
        if delays.is_empty() {
            delays.push(Duration::ZERO);
        }
        Self { delays }
    }

    /// 최대 시도 횟수.
    pub fn max_attempts(&self) -> usize {
        self.delays.len()
    }

    /// `attempt`번째(0부터) 시도가 일시적으로 실패한 뒤의 대기 시간.
    ///
    /// 마지막 시도 이후에는 `None`.
    pub fn delay_after(&self, attempt: usize) -> Option<Duration> {
        if attempt + 1 >= self.delays.len() {
            None
        } else {
            self.delays.get(attempt).copied()
        }
    }
}

/// 일시적 실패(`RequestError`)에 한해 일정에 따라 재시도합니다.
///
/// `op`는 0부터 시작하는 시도 번호를 받습니다.
pub async fn with_retry<T, F, Fut>(schedule: &RetrySchedule, mut op: F) -> PoloniexResult<T>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = PoloniexResult<T>>,
{
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() => match schedule.delay_after(attempt) {
                Some(delay) => {
                    warn!(attempt = attempt + 1, error = %err, "Transient failure");
                    info!("-- delaying for {} seconds", delay.as_secs());
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    warn!(attempts = attempt + 1, error = %err, "Retry delays exhausted");
                    return Err(PoloniexError::RetryExhausted {
                        attempts: attempt + 1,
                        last: Box::new(err),
                    });
                }
            },
            Err(err) => {
                debug!(attempt = attempt + 1, error = %err, "Non-retryable failure");
                return Err(err);
            }
        }
    }
}
