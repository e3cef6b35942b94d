//! 임의 명령 호출.
//!
//! `polo call returnOrderBook currencyPair=BTC_ETH depth=5`처럼
//! `key=value` 인자를 파라미터 맵으로 변환해 디스패처에 그대로 전달합니다.

use anyhow::{bail, Result};
use poloniex_api::{classify, CommandKind, ParamMap, PoloniexClient};
use serde_json::Value;
use tracing::info;

/// `key=value` 인자 목록을 파라미터 맵으로 변환합니다.
pub fn parse_pairs(pairs: &[String]) -> Result<ParamMap> {
    let mut params = ParamMap::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Invalid parameter '{}': expected key=value", pair);
        };
        if key.is_empty() {
            bail!("Invalid parameter '{}': empty key", pair);
        }
        if key == "command" || key == "nonce" {
            bail!("'{}' is set by the client and cannot be overridden", key);
        }
        params.insert(key.to_string(), value.to_string());
    }
    Ok(params)
}

/// 명령을 호출합니다.
pub async fn run(client: &PoloniexClient, command: &str, pairs: &[String]) -> Result<Value> {
    let params = parse_pairs(pairs)?;
    let kind = match classify(command) {
        Some(CommandKind::Public) => "public",
        Some(CommandKind::Private) => "private",
        None => "unknown",
    };
    info!(command, kind, params = params.len(), "Calling command");

    Ok(client.call(command, params).await?)
}
