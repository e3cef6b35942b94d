//! Poloniex REST API 클라이언트.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 명령 카탈로그: 공개/비공개 명령 분류와 주문 실행 수정자
//! - 디스패처: nonce 관리, HMAC-SHA512 서명, 고정 일정 재시도
//! - 응답 디코딩: 거래소 에러 분류, 숫자 정밀도 선택
//! - 명령별 타입 헬퍼
//!
//! # 예시
//!
//! ```no_run
//! use poloniex_api::{ClientConfig, PoloniexClient};
//!
//! # async fn run() -> Result<(), poloniex_api::PoloniexError> {
//! let client = PoloniexClient::new(ClientConfig::new("api-key", "api-secret"));
//! let ticker = client.return_ticker().await?;
//! let balances = client.return_balances().await?;
//! println!("{} {}", ticker["BTC_ETH"]["last"], balances["BTC"]);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod catalog;
pub mod client;
pub mod commands;
pub mod error;
pub mod nonce;
pub mod params;
pub mod response;
pub mod retry;
pub mod transport;

pub use catalog::{classify, CommandKind, OrderType, PRIVATE_COMMANDS, PUBLIC_COMMANDS};
pub use client::PoloniexClient;
pub use error::*;
pub use nonce::NonceCounter;
pub use params::{ChartPeriod, MoveOrderParams, OrderParams, ParamMap, Params};
pub use poloniex_core::{ClientConfig, Credentials};
pub use response::{as_decimal, classify_error, ExchangeFault};
pub use retry::{RetrySchedule, RETRY_DELAYS_SECS};
pub use transport::{ApiRequest, HttpMethod, HttpTransport, Transport};
