//! HTTP 전송 계층.
//!
//! 디스패처는 완성된 [`ApiRequest`]를 [`Transport`]에 넘기고 응답 본문 문자열만 받습니다.
//! 테스트에서는 네트워크 없이 동작하는 구현으로 교체할 수 있습니다.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::PoloniexResult;

/// HTTP 메서드.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// 공개 명령
    Get,
    /// 비공개 명령
    Post,
}

/// 전송할 요청.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP 메서드
    pub method: HttpMethod,
    /// 전체 URL (GET은 쿼리 문자열 포함)
    pub url: String,
    /// 추가 헤더
    pub headers: Vec<(String, String)>,
    /// form 인코딩된 본문 (POST 전용)
    pub body: Option<String>,
    /// 시도당 타임아웃
    pub timeout: Duration,
}

impl ApiRequest {
    /// 헤더 값 조회.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// 요청을 보내고 응답 본문을 반환하는 전송 계층.
///
/// 타임아웃과 연결 실패는 `PoloniexError::RequestError`로 보고해야 합니다.
#[async_trait]
pub trait Transport: Send + Sync {
    /// 요청 한 번을 수행합니다.
    async fn execute(&self, request: &ApiRequest) -> PoloniexResult<String>;
}

/// reqwest 기반 전송 계층.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// 새 전송 계층 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기존 reqwest 클라이언트로 생성.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &ApiRequest) -> PoloniexResult<String> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        }
        .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(status = %status, bytes = body.len(), "Received response");
        Ok(body)
    }
}
