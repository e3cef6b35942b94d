//! 명령별 헬퍼.
//!
//! 파라미터가 없는 명령은 아래 표에서 생성하고, 나머지는 [`Params`] 빌더로
//! 파라미터를 만든 뒤 [`PoloniexClient::call`]로 위임합니다.
//! 통화와 통화쌍 인자는 대문자로 변환됩니다.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::client::PoloniexClient;
use crate::params::{
    ChartPeriod, MoveOrderParams, OrderParams, ParamMap, Params, TimeRange, DAY_SECS, MONTH_SECS,
};
use crate::PoloniexResult;

/// 기본 호가 깊이.
pub const DEFAULT_ORDER_BOOK_DEPTH: u32 = 20;

/// 마진 주문의 기본 최대 대출 이율.
pub const DEFAULT_LENDING_RATE: Decimal = Decimal::TWO;

/// 대출 제안의 기본 기간 (일).
pub const DEFAULT_LOAN_DURATION_DAYS: u32 = 2;

macro_rules! simple_commands {
    ($($(#[$meta:meta])* $method:ident => $command:literal;)*) => {
        impl PoloniexClient {
            $(
                $(#[$meta])*
                pub async fn $method(&self) -> PoloniexResult<Value> {
                    self.call($command, ParamMap::new()).await
                }
            )*
        }
    };
}

simple_commands! {
    /// 전체 마켓 시세.
    return_ticker => "returnTicker";
    /// 24시간 거래량.
    return_24h_volume => "return24hVolume";
    /// 전체 통화 정보.
    return_currencies => "returnCurrencies";
    /// 사용 가능한 잔고.
    return_balances => "returnBalances";
    /// 입금 주소 목록.
    return_deposit_addresses => "returnDepositAddresses";
    /// 수수료 등급과 30일 거래량.
    return_fee_info => "returnFeeInfo";
    /// 마진 거래 가능 잔고.
    return_tradable_balances => "returnTradableBalances";
    /// 마진 계좌 요약.
    return_margin_account_summary => "returnMarginAccountSummary";
    /// 미체결 대출 제안.
    return_open_loan_offers => "returnOpenLoanOffers";
    /// 활성 대출.
    return_active_loans => "returnActiveLoans";
}

impl PoloniexClient {
    // === 공개 명령 ===

    /// 호가창 조회. 통화쌍 `"all"`은 전체 마켓.
    pub async fn return_order_book(
        &self,
        currency_pair: &str,
        depth: u32,
    ) -> PoloniexResult<Value> {
        let params = Params::new()
            .with_symbol("currencyPair", currency_pair)
            .with("depth", depth);
        self.call("returnOrderBook", params.into()).await
    }

    /// 마켓 체결 내역. 기간을 지정하지 않으면 최근 200건.
    pub async fn market_trade_hist(
        &self,
        currency_pair: &str,
        start: Option<i64>,
        end: Option<i64>,
    ) -> PoloniexResult<Value> {
        let params = Params::new()
            .with_symbol("currencyPair", currency_pair)
            .with_opt("start", start)
            .with_opt("end", end);
        self.call("marketTradeHist", params.into()).await
    }

    /// 캔들 데이터. 기본 기간은 최근 1일.
    pub async fn return_chart_data(
        &self,
        currency_pair: &str,
        period: ChartPeriod,
        start: Option<i64>,
        end: Option<i64>,
    ) -> PoloniexResult<Value> {
        let range = TimeRange::resolve(start, end, DAY_SECS);
        let params = Params::new()
            .with_symbol("currencyPair", currency_pair)
            .with("period", period)
            .with("start", range.start)
            .with("end", range.end);
        self.call("returnChartData", params.into()).await
    }

    /// 통화별 대출 호가.
    pub async fn return_loan_orders(&self, currency: &str) -> PoloniexResult<Value> {
        let params = Params::new().with_symbol("currency", currency);
        self.call("returnLoanOrders", params.into()).await
    }

    // === 계좌 ===

    /// 전체 잔고 (주문 묶인 금액, BTC 환산 포함). `account`가 `"all"`이면 마진/대출 계좌 포함.
    pub async fn return_complete_balances(&self, account: &str) -> PoloniexResult<Value> {
        let params = Params::new().with("account", account);
        self.call("returnCompleteBalances", params.into()).await
    }

    /// 새 입금 주소 생성.
    pub async fn generate_new_address(&self, currency: &str) -> PoloniexResult<Value> {
        let params = Params::new().with_symbol("currency", currency);
        self.call("generateNewAddress", params.into()).await
    }

    /// 입출금 내역. 기본 기간은 최근 30일.
    pub async fn return_deposits_withdrawals(
        &self,
        start: Option<i64>,
        end: Option<i64>,
    ) -> PoloniexResult<Value> {
        let range = TimeRange::resolve(start, end, MONTH_SECS);
        let params = Params::new()
            .with("start", range.start)
            .with("end", range.end);
        self.call("returnDepositsWithdrawals", params.into()).await
    }

    /// 계좌별 잔고. 계좌를 지정하지 않으면 전체.
    pub async fn return_available_account_balances(
        &self,
        account: Option<&str>,
    ) -> PoloniexResult<Value> {
        let params = Params::new().with_opt("account", account);
        self.call("returnAvailableAccountBalances", params.into()).await
    }

    /// 계좌 간 이체.
    pub async fn transfer_balance(
        &self,
        currency: &str,
        amount: Decimal,
        from_account: &str,
        to_account: &str,
        confirmed: bool,
    ) -> PoloniexResult<Value> {
        let params = Params::new()
            .with_symbol("currency", currency)
            .with("amount", amount)
            .with("fromAccount", from_account)
            .with("toAccount", to_account)
            .with_flag("confirmed", confirmed);
        self.call("transferBalance", params.into()).await
    }

    /// 즉시 출금. API 키에 출금 권한이 필요합니다.
    pub async fn withdraw(
        &self,
        currency: &str,
        amount: Decimal,
        address: &str,
        payment_id: Option<&str>,
    ) -> PoloniexResult<Value> {
        let params = Params::new()
            .with_symbol("currency", currency)
            .with("amount", amount)
            .with("address", address)
            .with_opt("paymentId", payment_id);
        self.call("withdraw", params.into()).await
    }

    // === 주문 ===

    /// 미체결 주문. 통화쌍 `"all"`은 전체 마켓.
    pub async fn return_open_orders(&self, currency_pair: &str) -> PoloniexResult<Value> {
        let params = Params::new().with_symbol("currencyPair", currency_pair);
        self.call("returnOpenOrders", params.into()).await
    }

    /// 본인 체결 내역.
    pub async fn return_trade_history(
        &self,
        currency_pair: &str,
        start: Option<i64>,
        end: Option<i64>,
    ) -> PoloniexResult<Value> {
        let params = Params::new()
            .with_symbol("currencyPair", currency_pair)
            .with_opt("start", start)
            .with_opt("end", end);
        self.call("returnTradeHistory", params.into()).await
    }

    /// 주문 하나의 체결 내역.
    pub async fn return_order_trades(&self, order_number: u64) -> PoloniexResult<Value> {
        let params = Params::new().with("orderNumber", order_number);
        self.call("returnOrderTrades", params.into()).await
    }

    /// 지정가 매수.
    pub async fn buy(&self, order: &OrderParams) -> PoloniexResult<Value> {
        self.call("buy", order.to_params("buy")?).await
    }

    /// 지정가 매도.
    pub async fn sell(&self, order: &OrderParams) -> PoloniexResult<Value> {
        self.call("sell", order.to_params("sell")?).await
    }

    /// 주문 취소.
    pub async fn cancel_order(&self, order_number: u64) -> PoloniexResult<Value> {
        let params = Params::new().with("orderNumber", order_number);
        self.call("cancelOrder", params.into()).await
    }

    /// 주문 정정. 취소와 재주문이 원자적으로 처리됩니다.
    pub async fn move_order(&self, order: &MoveOrderParams) -> PoloniexResult<Value> {
        self.call("moveOrder", order.to_params()?).await
    }

    // === 마진 ===

    /// 마진 매수.
    pub async fn margin_buy(
        &self,
        currency_pair: &str,
        rate: Decimal,
        amount: Decimal,
        lending_rate: Decimal,
    ) -> PoloniexResult<Value> {
        self.call(
            "marginBuy",
            margin_params(currency_pair, rate, amount, lending_rate),
        )
        .await
    }

    /// 마진 매도.
    pub async fn margin_sell(
        &self,
        currency_pair: &str,
        rate: Decimal,
        amount: Decimal,
        lending_rate: Decimal,
    ) -> PoloniexResult<Value> {
        self.call(
            "marginSell",
            margin_params(currency_pair, rate, amount, lending_rate),
        )
        .await
    }

    /// 마진 포지션 조회. 통화쌍 `"all"`은 전체.
    pub async fn get_margin_position(&self, currency_pair: &str) -> PoloniexResult<Value> {
        let params = Params::new().with_symbol("currencyPair", currency_pair);
        self.call("getMarginPosition", params.into()).await
    }

    /// 마진 포지션을 시장가로 청산.
    pub async fn close_margin_position(&self, currency_pair: &str) -> PoloniexResult<Value> {
        let params = Params::new().with_symbol("currencyPair", currency_pair);
        self.call("closeMarginPosition", params.into()).await
    }

    // === 대출 ===

    /// 대출 제안 생성.
    pub async fn create_loan_offer(
        &self,
        currency: &str,
        amount: Decimal,
        lending_rate: Decimal,
        auto_renew: bool,
        duration_days: u32,
    ) -> PoloniexResult<Value> {
        let params = Params::new()
            .with_symbol("currency", currency)
            .with("amount", amount)
            .with("duration", duration_days)
            .with("autoRenew", u8::from(auto_renew))
            .with("lendingRate", lending_rate);
        self.call("createLoanOffer", params.into()).await
    }

    /// 대출 제안 취소.
    pub async fn cancel_loan_offer(&self, order_number: u64) -> PoloniexResult<Value> {
        let params = Params::new().with("orderNumber", order_number);
        self.call("cancelLoanOffer", params.into()).await
    }

    /// 대출 내역. 기본 기간은 최근 30일.
    pub async fn return_lending_history(
        &self,
        start: Option<i64>,
        end: Option<i64>,
        limit: Option<u32>,
    ) -> PoloniexResult<Value> {
        let range = TimeRange::resolve(start, end, MONTH_SECS);
        let params = Params::new()
            .with("start", range.start)
            .with("end", range.end)
            .with_opt("limit", limit);
        self.call("returnLendingHistory", params.into()).await
    }

    /// 활성 대출의 자동 갱신 설정 전환.
    pub async fn toggle_auto_renew(&self, order_number: u64) -> PoloniexResult<Value> {
        let params = Params::new().with("orderNumber", order_number);
        self.call("toggleAutoRenew", params.into()).await
    }
}

fn margin_params(
    currency_pair: &str,
    rate: Decimal,
    amount: Decimal,
    lending_rate: Decimal,
) -> ParamMap {
    Params::new()
        .with_symbol("currencyPair", currency_pair)
        .with("rate", rate)
        .with("amount", amount)
        .with("lendingRate", lending_rate)
        .into_map()
}
