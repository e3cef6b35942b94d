//! 타입이 지정된 요청 파라미터.
//!
//! 명령 헬퍼는 여기의 빌더로 필수 필드를 강제하고, 전송 직전에만
//! 문자열 맵([`ParamMap`])으로 변환합니다.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::catalog::OrderType;
use crate::{PoloniexError, PoloniexResult};

/// 전송 경계의 파라미터 맵.
pub type ParamMap = BTreeMap<String, String>;

/// 하루 (초).
pub const DAY_SECS: i64 = 24 * 60 * 60;

/// 한 달 (30일, 초).
pub const MONTH_SECS: i64 = DAY_SECS * 30;

/// 문자열 파라미터 빌더.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(ParamMap);

impl Params {
    /// 빈 빌더 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 값 추가.
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }

    /// 값이 있을 때만 추가.
    pub fn with_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    /// 통화/통화쌍 값을 대문자로 추가.
    pub fn with_symbol(self, key: &str, value: &str) -> Self {
        self.with(key, value.to_uppercase())
    }

    /// 플래그가 켜져 있으면 `key=1` 추가.
    pub fn with_flag(self, key: &str, enabled: bool) -> Self {
        if enabled {
            self.with(key, 1)
        } else {
            self
        }
    }

    /// 주문 수정자 추가 (`postOnly=1` 등).
    pub fn with_order_type(self, order_type: Option<OrderType>) -> Self {
        match order_type {
            Some(t) => self.with(t.as_str(), 1),
            None => self,
        }
    }

    /// 문자열 맵으로 변환.
    pub fn into_map(self) -> ParamMap {
        self.0
    }
}

impl From<Params> for ParamMap {
    fn from(params: Params) -> Self {
        params.into_map()
    }
}

/// 명령에 허용되지 않은 주문 수정자가 있는지 검사합니다.
///
/// 수정자는 최대 하나만 허용됩니다.
pub fn validate_order_types(command: &str, params: &ParamMap) -> PoloniexResult<()> {
    let present: Vec<OrderType> = OrderType::ALL
        .into_iter()
        .filter(|t| params.contains_key(t.as_str()))
        .collect();

    if let Some(invalid) = present.iter().find(|t| !t.is_allowed_for(command)) {
        return Err(PoloniexError::ConfigurationError(format!(
            "Invalid order type {} for {}",
            invalid, command
        )));
    }
    if present.len() > 1 {
        return Err(PoloniexError::ConfigurationError(format!(
            "Only one order type may be set for {}",
            command
        )));
    }
    Ok(())
}

/// 지정가 매수/매도 주문.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderParams {
    /// 통화쌍 (예: "BTC_ETH")
    pub currency_pair: String,
    /// 가격
    pub rate: Decimal,
    /// 수량
    pub amount: Decimal,
    /// 실행 수정자
    pub order_type: Option<OrderType>,
}

impl OrderParams {
    /// 새 주문 생성.
    pub fn new(currency_pair: impl Into<String>, rate: Decimal, amount: Decimal) -> Self {
        Self {
            currency_pair: currency_pair.into(),
            rate,
            amount,
            order_type: None,
        }
    }

    /// 실행 수정자 설정.
    pub fn with_order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    /// `buy`/`sell` 파라미터로 변환.
    pub fn to_params(&self, command: &str) -> PoloniexResult<ParamMap> {
        check_order_type(command, self.order_type)?;
        Ok(Params::new()
            .with_symbol("currencyPair", &self.currency_pair)
            .with("rate", self.rate)
            .with("amount", self.amount)
            .with_order_type(self.order_type)
            .into_map())
    }
}

/// 주문 정정 (취소 후 재주문).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOrderParams {
    /// 주문 번호
    pub order_number: u64,
    /// 새 가격
    pub rate: Decimal,
    /// 새 수량 (없으면 유지)
    pub amount: Option<Decimal>,
    /// 실행 수정자 (immediateOrCancel, postOnly만 허용)
    pub order_type: Option<OrderType>,
}

impl MoveOrderParams {
    /// 새 정정 요청 생성.
    pub fn new(order_number: u64, rate: Decimal) -> Self {
        Self {
            order_number,
            rate,
            amount: None,
            order_type: None,
        }
    }

    /// 새 수량 설정.
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// 실행 수정자 설정.
    pub fn with_order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    /// `moveOrder` 파라미터로 변환.
    pub fn to_params(&self) -> PoloniexResult<ParamMap> {
        check_order_type("moveOrder", self.order_type)?;
        Ok(Params::new()
            .with("orderNumber", self.order_number)
            .with("rate", self.rate)
            .with_opt("amount", self.amount)
            .with_order_type(self.order_type)
            .into_map())
    }
}

fn check_order_type(command: &str, order_type: Option<OrderType>) -> PoloniexResult<()> {
    match order_type {
        Some(t) if !t.is_allowed_for(command) => Err(PoloniexError::ConfigurationError(format!(
            "Invalid order type {} for {}",
            t, command
        ))),
        _ => Ok(()),
    }
}

/// 캔들 주기.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartPeriod {
    /// 5분
    M5,
    /// 15분
    M15,
    /// 30분
    M30,
    /// 2시간
    H2,
    /// 4시간
    H4,
    /// 1일
    D1,
}

impl ChartPeriod {
    /// 초 단위 길이.
    pub fn as_secs(&self) -> u64 {
        match self {
            ChartPeriod::M5 => 300,
            ChartPeriod::M15 => 900,
            ChartPeriod::M30 => 1800,
            ChartPeriod::H2 => 7200,
            ChartPeriod::H4 => 14400,
            ChartPeriod::D1 => 86400,
        }
    }
}

impl TryFrom<u64> for ChartPeriod {
    type Error = PoloniexError;

    fn try_from(secs: u64) -> Result<Self, Self::Error> {
        match secs {
            300 => Ok(ChartPeriod::M5),
            900 => Ok(ChartPeriod::M15),
            1800 => Ok(ChartPeriod::M30),
            7200 => Ok(ChartPeriod::H2),
            14400 => Ok(ChartPeriod::H4),
            86400 => Ok(ChartPeriod::D1),
            other => Err(PoloniexError::ConfigurationError(format!(
                "{} invalid candle period",
                other
            ))),
        }
    }
}

impl fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_secs())
    }
}

/// 조회 기간 (UNIX 초).
///
/// 지정하지 않은 경계는 현재 시각 기준 기본값으로 채워집니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// 시작
    pub start: i64,
    /// 종료
    pub end: i64,
}

impl TimeRange {
    /// 기본 기간을 `lookback_secs`로 하여 범위를 결정합니다.
    pub fn resolve(start: Option<i64>, end: Option<i64>, lookback_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            start: start.unwrap_or(now - lookback_secs),
            end: end.unwrap_or(now),
        }
    }
}
