//! CLI 명령어 구현 모듈.

pub mod raw;
pub mod trade;

use anyhow::Result;
use serde_json::Value;

/// 응답을 보기 좋은 JSON으로 출력합니다.
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
