//! HTTP 전송 계층 통합 테스트 (mockito 서버 사용).

use mockito::Matcher;
use poloniex_api::auth::sign;
use poloniex_api::{
    ClientConfig, NonceCounter, OrderParams, OrderType, PoloniexClient, PoloniexError,
    RetrySchedule,
};
use rust_decimal_macros::dec;

fn client_for(server: &mockito::ServerGuard, config: ClientConfig) -> PoloniexClient {
    let config = config.with_endpoints(
        format!("{}/public", server.url()),
        format!("{}/tradingApi", server.url()),
    );
    PoloniexClient::new(config)
        .with_nonce(NonceCounter::starting_at(1_000))
        .with_retry_schedule(RetrySchedule::from_secs(&[0, 0, 0, 0]))
}

#[tokio::test]
async fn test_public_get_sends_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/public")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("command".into(), "returnOrderBook".into()),
            Matcher::UrlEncoded("currencyPair".into(), "BTC_ETH".into()),
            Matcher::UrlEncoded("depth".into(), "5".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"asks":[["0.03",10]],"bids":[],"isFrozen":"0","seq":7}"#)
        .create_async()
        .await;

    let client = client_for(&server, ClientConfig::public());
    let book = client.return_order_book("btc_eth", 5).await.unwrap();

    mock.assert_async().await;
    assert_eq!(book["asks"][0][0], "0.03");
    assert_eq!(book["seq"], 7);
}

#[tokio::test]
async fn test_private_post_is_signed() {
    let mut server = mockito::Server::new_async().await;
    let body = "command=returnBalances&nonce=1042";
    let signature = sign("test-secret", body).unwrap();

    let mock = server
        .mock("POST", "/tradingApi")
        .match_header("key", "test-key")
        .match_header("sign", signature.as_str())
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(body)
        .with_status(200)
        .with_body(r#"{"BTC":"0.00000001","ETH":"12.5"}"#)
        .create_async()
        .await;

    let client = client_for(&server, ClientConfig::new("test-key", "test-secret"));
    let balances = client.return_balances().await.unwrap();

    mock.assert_async().await;
    assert_eq!(balances["BTC"], "0.00000001");
}

#[tokio::test]
async fn test_buy_post_only_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/tradingApi")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("command".into(), "buy".into()),
            Matcher::UrlEncoded("currencyPair".into(), "BTC_ETH".into()),
            Matcher::UrlEncoded("postOnly".into(), "1".into()),
            Matcher::UrlEncoded("rate".into(), "0.025".into()),
            Matcher::UrlEncoded("amount".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"orderNumber":31226040,"resultingTrades":[]}"#)
        .create_async()
        .await;

    let client = client_for(&server, ClientConfig::new("test-key", "test-secret"));
    let order =
        OrderParams::new("btc_eth", dec!(0.025), dec!(2)).with_order_type(OrderType::PostOnly);
    let result = client.buy(&order).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result["orderNumber"], 31226040);
}

#[tokio::test]
async fn test_exchange_error_is_returned_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/tradingApi")
        .with_status(200)
        .with_body(r#"{"error":"Not enough BTC."}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, ClientConfig::new("test-key", "test-secret"));
    let order = OrderParams::new("BTC_ETH", dec!(0.025), dec!(2));
    let err = client.sell(&order).await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, PoloniexError::ProtocolError(ref m) if m == "Not enough BTC."));
}

#[tokio::test]
async fn test_try_again_is_retried_until_exhausted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/public")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"error":"Connection timed out. Please try again."}"#)
        .expect(4)
        .create_async()
        .await;

    let client = client_for(&server, ClientConfig::public());
    let err = client.return_ticker().await.unwrap_err();

    mock.assert_async().await;
    match err {
        PoloniexError::RetryExhausted { attempts, last } => {
            assert_eq!(attempts, 4);
            assert!(last.to_string().contains("Please try again"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_is_protocol_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/public")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, ClientConfig::public());
    let err = client.return_currencies().await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, PoloniexError::ProtocolError(_)));
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    let config = ClientConfig::public()
        .with_timeout_secs(1)
        .with_endpoints("http://127.0.0.1:1/public", "http://127.0.0.1:1/tradingApi");
    let client =
        PoloniexClient::new(config).with_retry_schedule(RetrySchedule::from_secs(&[0, 0]));

    let err = client.return_ticker().await.unwrap_err();

    match err {
        PoloniexError::RetryExhausted { attempts, last } => {
            assert_eq!(attempts, 2);
            assert!(last.is_retryable());
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
