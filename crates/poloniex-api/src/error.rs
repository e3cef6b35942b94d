//! Poloniex 클라이언트 에러 타입.

use thiserror::Error;

/// Poloniex API 호출 에러.
///
/// 호출자는 variant로 분기할 수 있습니다:
/// - `ConfigurationError`: 재시도 없이 즉시 반환
/// - `RequestError`: 일시적 실패, 재시도 대상
/// - `ProtocolError`: 거래소가 보고한 영구 실패, 재시도하지 않음
/// - `RetryExhausted`: 재시도 일정 소진, 마지막 일시적 실패를 감쌈
#[derive(Debug, Error)]
pub enum PoloniexError {
    /// 알 수 없는 명령, 자격증명 누락, 잘못된 파라미터
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 타임아웃, 연결 실패, 일시적 거래소 에러
    #[error("Request error: {0}")]
    RequestError(String),

    /// 거래소가 보고한 에러 또는 디코딩 불가 응답
    #[error("Poloniex error: {0}")]
    ProtocolError(String),

    /// 재시도 일정 소진
    #[error("Retry delays exhausted after {attempts} attempts: {last}")]
    RetryExhausted {
        /// 수행한 총 시도 횟수
        attempts: usize,
        /// 마지막 일시적 실패
        last: Box<PoloniexError>,
    },
}

/// Poloniex 작업을 위한 Result 타입.
pub type PoloniexResult<T> = Result<T, PoloniexError>;

impl PoloniexError {
    /// 재시도 가능한 에러인지 확인.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PoloniexError::RequestError(_))
    }

    /// 재시도하면 안 되는 에러인지 확인.
    pub fn is_fatal(&self) -> bool {
        !self.is_retryable()
    }

    /// 설정 에러인지 확인.
    pub fn is_configuration(&self) -> bool {
        matches!(self, PoloniexError::ConfigurationError(_))
    }

    /// 거래소가 보고한 메시지 반환 (해당하는 경우).
    pub fn exchange_message(&self) -> Option<&str> {
        match self {
            PoloniexError::ProtocolError(msg) => Some(msg),
            PoloniexError::RetryExhausted { last, .. } => last.exchange_message(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PoloniexError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PoloniexError::RequestError(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            PoloniexError::RequestError(format!("Connection failed: {}", err))
        } else if err.is_builder() {
            PoloniexError::ConfigurationError(err.to_string())
        } else {
            PoloniexError::RequestError(err.to_string())
        }
    }
}

impl From<poloniex_core::ConfigError> for PoloniexError {
    fn from(err: poloniex_core::ConfigError) -> Self {
        PoloniexError::ConfigurationError(err.to_string())
    }
}

impl From<serde_json::Error> for PoloniexError {
    fn from(err: serde_json::Error) -> Self {
        PoloniexError::ProtocolError(format!("Invalid json response returned: {}", err))
    }
}
