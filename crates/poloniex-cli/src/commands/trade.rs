//! 주문 명령.

use anyhow::Result;
use poloniex_api::{OrderParams, OrderType};
use rust_decimal::Decimal;

/// CLI 인자에서 주문 파라미터를 만듭니다.
pub fn build_order(
    pair: &str,
    rate: Decimal,
    amount: Decimal,
    order_type: Option<&str>,
) -> Result<OrderParams> {
    anyhow::ensure!(rate > Decimal::ZERO, "rate must be positive: {}", rate);
    anyhow::ensure!(amount > Decimal::ZERO, "amount must be positive: {}", amount);

    let mut order = OrderParams::new(pair, rate, amount);
    if let Some(order_type) = order_type {
        order = order.with_order_type(order_type.parse::<OrderType>()?);
    }
    Ok(order)
}
