//! Poloniex CLI 도구.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 시세/호가/캔들 조회 (공개 명령)
//! - 잔고/미체결 주문 조회, 주문 실행 (비공개 명령)
//! - 임의 명령 호출

pub mod commands;

pub use commands::*;
