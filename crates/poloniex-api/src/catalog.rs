//! 명령 카탈로그.
//!
//! 명령 이름을 공개(GET, 인증 불필요)와 비공개(POST, 서명 필요)로 분류하고,
//! 주문 실행 수정자(order-type modifier)를 정의합니다.

use std::fmt;
use std::str::FromStr;

use crate::{PoloniexError, PoloniexResult};

/// 공개 명령 이름.
pub const PUBLIC_COMMANDS: [&str; 7] = [
    "returnTicker",
    "return24hVolume",
    "returnOrderBook",
    "marketTradeHist",
    "returnChartData",
    "returnCurrencies",
    "returnLoanOrders",
];

/// 비공개 명령 이름.
pub const PRIVATE_COMMANDS: [&str; 28] = [
    "returnBalances",
    "returnCompleteBalances",
    "returnDepositAddresses",
    "generateNewAddress",
    "returnDepositsWithdrawals",
    "returnOpenOrders",
    "returnTradeHistory",
    "returnAvailableAccountBalances",
    "returnTradableBalances",
    "returnOpenLoanOffers",
    "returnOrderTrades",
    "returnActiveLoans",
    "returnLendingHistory",
    "createLoanOffer",
    "cancelLoanOffer",
    "toggleAutoRenew",
    "buy",
    "sell",
    "cancelOrder",
    "moveOrder",
    "withdraw",
    "returnFeeInfo",
    "transferBalance",
    "returnMarginAccountSummary",
    "marginBuy",
    "marginSell",
    "getMarginPosition",
    "closeMarginPosition",
];

/// 명령 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// 공개 엔드포인트, GET
    Public,
    /// 거래 엔드포인트, 서명된 POST
    Private,
}

/// 명령 이름을 분류합니다.
///
/// 두 카탈로그 어디에도 없으면 `None`.
pub fn classify(name: &str) -> Option<CommandKind> {
    if PUBLIC_COMMANDS.contains(&name) {
        Some(CommandKind::Public)
    } else if PRIVATE_COMMANDS.contains(&name) {
        Some(CommandKind::Private)
    } else {
        None
    }
}

/// 명령 이름을 분류하고, 알 수 없는 명령이면 설정 에러를 반환합니다.
pub fn require_known(name: &str) -> PoloniexResult<CommandKind> {
    classify(name)
        .ok_or_else(|| PoloniexError::ConfigurationError(format!("Invalid command: {}", name)))
}

/// 요청 본문에 실제로 실리는 명령 이름.
///
/// `marketTradeHist`는 공개 엔드포인트의 `returnTradeHistory`로 전송됩니다.
pub fn wire_name(name: &str) -> &str {
    match name {
        "marketTradeHist" => "returnTradeHistory",
        other => other,
    }
}

/// 주문 실행 수정자.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    /// 전량 체결 또는 전량 취소
    FillOrKill,
    /// 즉시 체결 가능한 부분만 체결, 나머지 취소
    ImmediateOrCancel,
    /// 즉시 체결되지 않을 때만 호가창에 등록 (메이커 전용)
    PostOnly,
}

impl OrderType {
    /// 모든 수정자.
    pub const ALL: [OrderType; 3] = [
        OrderType::FillOrKill,
        OrderType::ImmediateOrCancel,
        OrderType::PostOnly,
    ];

    /// 파라미터 키로 쓰이는 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::FillOrKill => "fillOrKill",
            OrderType::ImmediateOrCancel => "immediateOrCancel",
            OrderType::PostOnly => "postOnly",
        }
    }

    /// 주어진 명령에서 이 수정자를 사용할 수 있는지 확인.
    ///
    /// `buy`/`sell`은 세 가지 모두, `moveOrder`는 fillOrKill을 제외한 두 가지만 허용합니다.
    pub fn is_allowed_for(&self, command: &str) -> bool {
        match command {
            "buy" | "sell" => true,
            "moveOrder" => !matches!(self, OrderType::FillOrKill),
            _ => false,
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = PoloniexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PoloniexError::ConfigurationError(format!("Invalid order type {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_known_commands() {
        assert_eq!(classify("returnTicker"), Some(CommandKind::Public));
        assert_eq!(classify("returnLoanOrders"), Some(CommandKind::Public));
        assert_eq!(classify("buy"), Some(CommandKind::Private));
        assert_eq!(classify("closeMarginPosition"), Some(CommandKind::Private));
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(classify("ReturnTicker"), None);
        assert_eq!(classify("BUY"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_require_known_rejects_unknown() {
        let err = require_known("launchRocket").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("launchRocket"));
    }

    #[test]
    fn test_catalogs_are_disjoint() {
        for name in PUBLIC_COMMANDS {
            assert!(!PRIVATE_COMMANDS.contains(&name), "{} in both sets", name);
        }
    }

    #[test]
    fn test_wire_name() {
        assert_eq!(wire_name("marketTradeHist"), "returnTradeHistory");
        assert_eq!(wire_name("returnTicker"), "returnTicker");
    }

    #[test]
    fn test_order_type_parse() {
        assert_eq!(
            "postOnly".parse::<OrderType>().unwrap(),
            OrderType::PostOnly
        );
        assert!("goodTillCancel".parse::<OrderType>().is_err());
    }

    #[test]
    fn test_order_type_rules() {
        for t in OrderType::ALL {
            assert!(t.is_allowed_for("buy"));
            assert!(t.is_allowed_for("sell"));
            assert!(!t.is_allowed_for("marginBuy"));
        }
        assert!(!OrderType::FillOrKill.is_allowed_for("moveOrder"));
        assert!(OrderType::ImmediateOrCancel.is_allowed_for("moveOrder"));
        assert!(OrderType::PostOnly.is_allowed_for("moveOrder"));
    }

    proptest! {
        #[test]
        fn prop_unknown_names_are_unclassified(name in "[a-zA-Z0-9]{1,24}") {
            let known = PUBLIC_COMMANDS.contains(&name.as_str())
                || PRIVATE_COMMANDS.contains(&name.as_str());
            prop_assert_eq!(classify(&name).is_some(), known);
        }
    }
}
