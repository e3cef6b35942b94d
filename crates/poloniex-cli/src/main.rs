//! Poloniex CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 전체 시세
//! polo ticker
//!
//! # BTC_ETH 호가 5단계
//! polo order-book --pair BTC_ETH --depth 5
//!
//! # 30분봉 캔들 (최근 1일)
//! polo chart --pair BTC_XMR --period 1800
//!
//! # 잔고 (POLONIEX_API_KEY / POLONIEX_API_SECRET 필요)
//! polo balances
//!
//! # 임의 명령
//! polo call returnLoanOrders currency=BTC
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use poloniex_api::{ChartPeriod, ClientConfig, MoveOrderParams, OrderType, PoloniexClient};
use poloniex_core::{init_logging, LogConfig, LogFormat};
use rust_decimal::Decimal;
use tracing::{debug, error};

use poloniex_cli::commands::{print_json, raw, trade};

#[derive(Parser)]
#[command(name = "polo")]
#[command(about = "Poloniex REST API CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (TOML, 없으면 환경 변수만 사용)
    #[arg(long, default_value = "poloniex.toml")]
    config: PathBuf,

    /// 시도당 요청 타임아웃 (초, 1 이상)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// JSON 숫자를 원문 그대로 보존
    #[arg(long)]
    exact_numbers: bool,

    /// 로그 레벨 (RUST_LOG가 우선)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long, default_value = "compact")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 전체 마켓 시세
    Ticker,

    /// 24시간 거래량
    Volume,

    /// 전체 통화 정보
    Currencies,

    /// 호가창
    OrderBook {
        /// 통화쌍 (all = 전체)
        #[arg(short, long, default_value = "all")]
        pair: String,

        /// 호가 깊이
        #[arg(short, long, default_value = "20")]
        depth: u32,
    },

    /// 마켓 체결 내역
    Trades {
        /// 통화쌍
        #[arg(short, long)]
        pair: String,

        /// 시작 (UNIX 초)
        #[arg(long)]
        start: Option<i64>,

        /// 종료 (UNIX 초)
        #[arg(long)]
        end: Option<i64>,
    },

    /// 캔들 데이터
    Chart {
        /// 통화쌍
        #[arg(short, long)]
        pair: String,

        /// 캔들 주기 (300, 900, 1800, 7200, 14400, 86400)
        #[arg(long, default_value = "300")]
        period: u64,

        /// 시작 (UNIX 초, 기본: 1일 전)
        #[arg(long)]
        start: Option<i64>,

        /// 종료 (UNIX 초, 기본: 현재)
        #[arg(long)]
        end: Option<i64>,
    },

    /// 대출 호가
    LoanOrders {
        /// 통화
        #[arg(short, long)]
        currency: String,
    },

    /// 사용 가능한 잔고
    Balances {
        /// 주문 묶인 금액과 BTC 환산 포함
        #[arg(long)]
        complete: bool,
    },

    /// 미체결 주문
    OpenOrders {
        /// 통화쌍 (all = 전체)
        #[arg(short, long, default_value = "all")]
        pair: String,
    },

    /// 지정가 매수
    Buy {
        /// 통화쌍
        #[arg(short, long)]
        pair: String,

        /// 가격
        #[arg(short, long)]
        rate: Decimal,

        /// 수량
        #[arg(short, long)]
        amount: Decimal,

        /// 실행 수정자 (fillOrKill, immediateOrCancel, postOnly)
        #[arg(long)]
        order_type: Option<String>,
    },

    /// 지정가 매도
    Sell {
        /// 통화쌍
        #[arg(short, long)]
        pair: String,

        /// 가격
        #[arg(short, long)]
        rate: Decimal,

        /// 수량
        #[arg(short, long)]
        amount: Decimal,

        /// 실행 수정자 (fillOrKill, immediateOrCancel, postOnly)
        #[arg(long)]
        order_type: Option<String>,
    },

    /// 주문 취소
    Cancel {
        /// 주문 번호
        order_number: u64,
    },

    /// 주문 정정
    Move {
        /// 주문 번호
        order_number: u64,

        /// 새 가격
        #[arg(short, long)]
        rate: Decimal,

        /// 새 수량
        #[arg(short, long)]
        amount: Option<Decimal>,

        /// 실행 수정자 (immediateOrCancel, postOnly)
        #[arg(long)]
        order_type: Option<String>,
    },

    /// 임의 명령 호출 (key=value 파라미터)
    Call {
        /// 명령 이름 (예: returnLoanOrders)
        command: String,

        /// key=value 파라미터
        params: Vec<String>,
    },
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    if config.credentials.is_none() {
        config.credentials = ClientConfig::from_env().credentials;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if cli.exact_numbers {
        config.exact_numbers = true;
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    debug!(?config, "Loaded configuration");
    let client = PoloniexClient::new(config);

    let value = match cli.command {
        Commands::Ticker => client.return_ticker().await?,
        Commands::Volume => client.return_24h_volume().await?,
        Commands::Currencies => client.return_currencies().await?,
        Commands::OrderBook { pair, depth } => client.return_order_book(&pair, depth).await?,
        Commands::Trades { pair, start, end } => {
            client.market_trade_hist(&pair, start, end).await?
        }
        Commands::Chart {
            pair,
            period,
            start,
            end,
        } => {
            let period = ChartPeriod::try_from(period)?;
            client.return_chart_data(&pair, period, start, end).await?
        }
        Commands::LoanOrders { currency } => client.return_loan_orders(&currency).await?,
        Commands::Balances { complete } => {
            if complete {
                client.return_complete_balances("all").await?
            } else {
                client.return_balances().await?
            }
        }
        Commands::OpenOrders { pair } => client.return_open_orders(&pair).await?,
        Commands::Buy {
            pair,
            rate,
            amount,
            order_type,
        } => {
            let order = trade::build_order(&pair, rate, amount, order_type.as_deref())?;
            client.buy(&order).await?
        }
        Commands::Sell {
            pair,
            rate,
            amount,
            order_type,
        } => {
            let order = trade::build_order(&pair, rate, amount, order_type.as_deref())?;
            client.sell(&order).await?
        }
        Commands::Cancel { order_number } => client.cancel_order(order_number).await?,
        Commands::Move {
            order_number,
            rate,
            amount,
            order_type,
        } => {
            let mut order = MoveOrderParams::new(order_number, rate);
            if let Some(amount) = amount {
                order = order.with_amount(amount);
            }
            if let Some(order_type) = order_type {
                order = order.with_order_type(order_type.parse::<OrderType>()?);
            }
            client.move_order(&order).await?
        }
        Commands::Call { command, params } => raw::run(&client, &command, &params).await?,
    };

    print_json(&value)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_format = cli
        .log_format
        .parse::<LogFormat>()
        .map_err(anyhow::Error::msg)?;
    init_logging(&LogConfig::new(cli.log_level.clone()).with_format(log_format))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_must_be_positive() {
        assert!(Cli::try_parse_from(["polo", "--timeout", "0", "ticker"]).is_err());

        let cli = Cli::try_parse_from(["polo", "--timeout", "5", "ticker"]).unwrap();
        assert_eq!(cli.timeout, Some(5));
    }

    #[test]
    fn test_move_accepts_decimal_rate() {
        let cli = Cli::try_parse_from(["polo", "move", "42", "--rate", "0.0251"]).unwrap();
        match cli.command {
            Commands::Move {
                order_number, rate, ..
            } => {
                assert_eq!(order_number, 42);
                assert_eq!(rate.to_string(), "0.0251");
            }
            _ => panic!("unexpected subcommand"),
        }
    }
}
