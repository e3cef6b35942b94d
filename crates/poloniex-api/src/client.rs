//! Poloniex 요청 디스패처.
//!
//! 명령을 분류하고, 비공개 명령에는 nonce와 서명을 붙여 전송한 뒤
//! 응답을 디코딩합니다. 일시적 실패는 고정 일정으로 재시도합니다.

use std::sync::Arc;
use std::time::Duration;

use poloniex_core::{ClientConfig, Credentials};
use serde_json::Value;
use tracing::debug;

use crate::auth::auth_headers;
use crate::catalog::{require_known, wire_name, CommandKind};
use crate::nonce::NonceCounter;
use crate::params::{validate_order_types, ParamMap};
use crate::response::{decode, Decoded, ExchangeFault};
use crate::retry::{with_retry, RetrySchedule};
use crate::transport::{ApiRequest, HttpMethod, HttpTransport, Transport};
use crate::{PoloniexError, PoloniexResult};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Poloniex REST 클라이언트.
///
/// nonce 카운터는 인스턴스가 소유하며 원자적으로 증가하므로,
/// `&self`로 여러 태스크에서 동시에 호출할 수 있습니다.
pub struct PoloniexClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    nonce: NonceCounter,
    schedule: RetrySchedule,
}

impl PoloniexClient {
    /// 새 클라이언트 생성.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: Arc::new(HttpTransport::new()),
            nonce: NonceCounter::from_clock(),
            schedule: RetrySchedule::default(),
        }
    }

    /// 공개 명령 전용 클라이언트 생성.
    pub fn public() -> Self {
        Self::new(ClientConfig::public())
    }

    /// 환경 변수 설정으로 생성.
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    /// 전송 계층 교체.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// nonce 카운터 교체.
    pub fn with_nonce(mut self, nonce: NonceCounter) -> Self {
        self.nonce = nonce;
        self
    }

    /// 재시도 일정 교체.
    pub fn with_retry_schedule(mut self, schedule: RetrySchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// 설정 반환.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// nonce 카운터 반환.
    pub fn nonce(&self) -> &NonceCounter {
        &self.nonce
    }

    /// 명령을 실행하고 디코딩된 JSON을 반환합니다.
    ///
    /// # Errors
    /// - 알 수 없는 명령, 자격증명 없는 비공개 명령, 잘못된 주문 수정자, 0초 타임아웃:
    ///   네트워크 접근 없이 `ConfigurationError`
    /// - 거래소가 보고한 영구 에러 또는 잘못된 JSON: `ProtocolError`
    /// - 재시도 일정 소진: `RetryExhausted`
    pub async fn call(&self, command: &str, mut params: ParamMap) -> PoloniexResult<Value> {
        let kind = require_known(command)?;
        let credentials = match kind {
            CommandKind::Private => Some(self.config.credentials.as_ref().ok_or_else(|| {
                PoloniexError::ConfigurationError(
                    "An API key and Secret Key are required!".to_string(),
                )
            })?),
            CommandKind::Public => None,
        };
        self.config.validate()?;
        validate_order_types(command, &params)?;

        params.insert("command".to_string(), wire_name(command).to_string());

        let params = &params;
        with_retry(&self.schedule, move |attempt| async move {
            let request = self.build_request(params, credentials)?;
            debug!(command, attempt = attempt + 1, url = %request.url, "Sending request");
            let body = self.transport.execute(&request).await?;
            self.interpret_body(&body)
        })
        .await
    }

    /// 시도 한 번에 해당하는 요청을 만듭니다.
    ///
    /// 비공개 요청은 시도마다 새 nonce로 다시 서명합니다.
    fn build_request(
        &self,
        params: &ParamMap,
        credentials: Option<&Credentials>,
    ) -> PoloniexResult<ApiRequest> {
        let timeout = Duration::from_secs(self.config.timeout_secs);

        match credentials {
            Some(credentials) => {
                let mut params = params.clone();
                params.insert("nonce".to_string(), self.nonce.next()?.to_string());

                let body = encode(&params)?;
                let mut headers = auth_headers(credentials, &body)?;
                headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));

                Ok(ApiRequest {
                    method: HttpMethod::Post,
                    url: self.config.private_url.clone(),
                    headers,
                    body: Some(body),
                    timeout,
                })
            }
            None => Ok(ApiRequest {
                method: HttpMethod::Get,
                url: format!("{}?{}", self.config.public_url, encode(params)?),
                headers: Vec::new(),
                body: None,
                timeout,
            }),
        }
    }

    /// 응답 본문을 디코딩하고 거래소 에러를 분류합니다.
    fn interpret_body(&self, body: &str) -> PoloniexResult<Value> {
        match decode(body, self.config.exact_numbers)? {
            Decoded::Data(value) => Ok(value),
            Decoded::Fault { message, kind } => match kind {
                ExchangeFault::NonceBehind { minimum } => {
                    let resynced = self.nonce.resync(minimum)?;
                    debug!(nonce = resynced, "Nonce resynchronized");
                    Err(PoloniexError::RequestError(format!("PoloniexError {}", message)))
                }
                ExchangeFault::TryAgain => {
                    Err(PoloniexError::RequestError(format!("PoloniexError {}", message)))
                }
                ExchangeFault::Fatal => Err(PoloniexError::ProtocolError(message)),
            },
        }
    }
}

fn encode(params: &ParamMap) -> PoloniexResult<String> {
    serde_urlencoded::to_string(params)
        .map_err(|e| PoloniexError::ConfigurationError(format!("Invalid parameters: {}", e)))
}
