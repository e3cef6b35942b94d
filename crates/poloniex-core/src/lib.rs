//! # Poloniex Core
//!
//! Poloniex 클라이언트 전반에서 사용하는 공통 인프라를 제공합니다:
//! - 클라이언트 설정 (자격증명, 타임아웃, 숫자 정밀도)
//! - 로깅 인프라

pub mod config;
pub mod logging;

pub use config::*;
pub use logging::*;
