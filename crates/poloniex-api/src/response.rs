//! 응답 디코딩과 거래소 에러 분류.
//!
//! 거래소 에러 메시지를 문자열로 판별하는 로직은 [`classify_error`] 한 곳에만 있습니다.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Number, Value};
use tracing::error;

use crate::{PoloniexError, PoloniexResult};

const NONCE_BEHIND: &str = "Nonce must be greater";
const TRY_AGAIN: &str = "please try again";

/// 거래소 `error` 필드 분류 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeFault {
    /// nonce가 뒤처짐 (서버가 제시한 최소값 포함 가능)
    NonceBehind {
        /// 메시지에서 추출한 최소 nonce
        minimum: Option<u64>,
    },
    /// 일시적 오류, 재시도 권장
    TryAgain,
    /// 그 외 영구 오류
    Fatal,
}

impl ExchangeFault {
    /// 재시도 대상인지 확인.
    pub fn is_transient(&self) -> bool {
        !matches!(self, ExchangeFault::Fatal)
    }
}

/// 거래소 에러 메시지를 분류합니다.
pub fn classify_error(message: &str) -> ExchangeFault {
    if message.contains(NONCE_BEHIND) {
        ExchangeFault::NonceBehind {
            minimum: parse_nonce_minimum(message),
        }
    } else if message.to_lowercase().contains(TRY_AGAIN) {
        ExchangeFault::TryAgain
    } else {
        ExchangeFault::Fatal
    }
}

/// "Nonce must be greater than 123. You provided 45." 형식에서 123을 추출합니다.
fn parse_nonce_minimum(message: &str) -> Option<u64> {
    let rest = &message[message.find(NONCE_BEHIND)? + NONCE_BEHIND.len()..];
    rest.split(|c: char| !c.is_ascii_digit())
        .find(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

/// 응답 본문 디코딩 결과.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// 정상 응답
    Data(Value),
    /// `error` 필드가 있는 응답
    Fault {
        /// 거래소 메시지 원문
        message: String,
        /// 분류
        kind: ExchangeFault,
    },
}

/// 응답 본문을 JSON으로 디코딩합니다.
///
/// 숫자는 항상 원문 그대로 파싱한 뒤, `exact_numbers`가 false이면 기본 숫자 타입으로 변환합니다.
/// 디코딩 실패는 재시도하지 않는 `ProtocolError`입니다.
pub fn decode(body: &str, exact_numbers: bool) -> PoloniexResult<Decoded> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        error!("Invalid json response: {} - Body: {}", e, body);
        PoloniexError::from(e)
    })?;

    if let Some(err) = value.get("error") {
        let message = match err {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let kind = classify_error(&message);
        return Ok(Decoded::Fault { message, kind });
    }

    Ok(Decoded::Data(if exact_numbers {
        value
    } else {
        normalize_numbers(value)
    }))
}

/// 모든 숫자를 `i64`/`u64`/`f64` 표현으로 변환합니다.
pub fn normalize_numbers(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(native_number(&n)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_numbers(v)))
                .collect(),
        ),
        other => other,
    }
}

fn native_number(n: &Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::from(i)
    } else if let Some(u) = n.as_u64() {
        Number::from(u)
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .unwrap_or_else(|| n.clone())
    }
}

/// 문자열 또는 숫자 필드를 `Decimal`로 변환합니다.
///
/// 거래소는 잔고와 가격을 문자열로 반환하므로 정밀도 손실 없이 읽을 때 사용합니다.
pub fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .ok()
                .or_else(|| Decimal::from_scientific(&text).ok())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_classify_nonce_behind() {
        let kind = classify_error("Nonce must be greater than 1500000000123456. You provided 99.");
        assert_eq!(
            kind,
            ExchangeFault::NonceBehind {
                minimum: Some(1_500_000_000_123_456)
            }
        );
        assert!(kind.is_transient());
    }

    #[test]
    fn test_classify_nonce_behind_without_number() {
        assert_eq!(
            classify_error("Nonce must be greater than the last one."),
            ExchangeFault::NonceBehind { minimum: None }
        );
    }

    #[test]
    fn test_classify_try_again_case_insensitive() {
        assert_eq!(
            classify_error("Internal error. Please try again."),
            ExchangeFault::TryAgain
        );
        assert_eq!(
            classify_error("PLEASE TRY AGAIN LATER"),
            ExchangeFault::TryAgain
        );
    }

    #[test]
    fn test_classify_fatal() {
        let kind = classify_error("Totally unexpected failure");
        assert_eq!(kind, ExchangeFault::Fatal);
        assert!(!kind.is_transient());
    }

    #[test]
    fn test_decode_data() {
        let decoded = decode(r#"{"BTC":"0.5","ETH":"1.25"}"#, false).unwrap();
        match decoded {
            Decoded::Data(value) => assert_eq!(value["BTC"], "0.5"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_decode_error_field() {
        let decoded = decode(r#"{"error":"Invalid currency pair."}"#, false).unwrap();
        assert_eq!(
            decoded,
            Decoded::Fault {
                message: "Invalid currency pair.".to_string(),
                kind: ExchangeFault::Fatal,
            }
        );
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = decode("<html>502 Bad Gateway</html>", false).unwrap_err();
        assert!(matches!(err, PoloniexError::ProtocolError(_)));
        assert!(err.to_string().contains("Invalid json response returned"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_exact_numbers_preserve_precision() {
        let body = r#"{"amount":0.123456789012345678901}"#;

        let exact = match decode(body, true).unwrap() {
            Decoded::Data(v) => v,
            other => panic!("unexpected: {:?}", other),
        };
        assert_eq!(exact["amount"].to_string(), "0.123456789012345678901");

        let native = match decode(body, false).unwrap() {
            Decoded::Data(v) => v,
            other => panic!("unexpected: {:?}", other),
        };
        assert_ne!(native["amount"].to_string(), "0.123456789012345678901");
        assert!(native["amount"].as_f64().is_some());
    }

    #[test]
    fn test_normalize_keeps_integers() {
        let value = normalize_numbers(serde_json::json!({"depth": 20, "list": [1, -2]}));
        assert_eq!(value["depth"].as_i64(), Some(20));
        assert_eq!(value["list"][1].as_i64(), Some(-2));
    }

    #[test]
    fn test_as_decimal() {
        assert_eq!(
            as_decimal(&Value::String("0.00012345".into())),
            Some(dec!(0.00012345))
        );
        assert_eq!(as_decimal(&serde_json::json!(20)), Some(dec!(20)));
        assert_eq!(as_decimal(&Value::Null), None);
    }
}
