//! 클라이언트 설정.
//!
//! 자격증명, 요청 타임아웃, JSON 숫자 정밀도, 엔드포인트 URL을 관리합니다.
//! 설정 소스 우선순위 (낮음 → 높음):
//! 1. 기본값
//! 2. TOML 파일
//! 3. `POLONIEX__` 접두사 환경 변수

use std::fmt;
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

/// 공개 API 기본 URL.
pub const PUBLIC_API_URL: &str = "https://poloniex.com/public";

/// 거래 API 기본 URL.
pub const PRIVATE_API_URL: &str = "https://poloniex.com/tradingApi";

/// 기본 요청 타임아웃 (초).
pub const DEFAULT_TIMEOUT_SECS: u64 = 3;

/// 설정 로드 에러.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 설정 소스 읽기/역직렬화 실패
    #[error("설정 로드 실패: {0}")]
    Load(#[from] config::ConfigError),

    /// 키와 시크릿 중 하나만 설정됨
    #[error("API 키와 시크릿은 함께 설정해야 합니다")]
    IncompleteCredentials,

    /// 잘못된 값
    #[error("잘못된 설정 값: {0}")]
    InvalidValue(String),
}

/// API 자격증명.
///
/// # 보안
/// - 시크릿은 `SecretString`으로 보관됩니다.
/// - `Debug` 구현은 키와 시크릿을 마스킹합니다.
pub struct Credentials {
    api_key: String,
    api_secret: SecretString,
}

impl Credentials {
    /// 새 자격증명 생성.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    /// API 키 반환.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// API 시크릿 반환.
    pub fn api_secret(&self) -> &SecretString {
        &self.api_secret
    }
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            api_secret: SecretString::from(self.api_secret.expose_secret().to_string()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let char_count = self.api_key.chars().count();
        let masked_key = if char_count > 8 {
            let head: String = self.api_key.chars().take(4).collect();
            let tail: String = self.api_key.chars().skip(char_count - 4).collect();
            format!("{}...{}", head, tail)
        } else {
            "***REDACTED***".to_string()
        };

        f.debug_struct("Credentials")
            .field("api_key", &masked_key)
            .field("api_secret", &"***REDACTED***")
            .finish()
    }
}

/// Poloniex 클라이언트 설정.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API 자격증명 (비공개 명령에만 필요)
    pub credentials: Option<Credentials>,
    /// 시도당 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// true이면 JSON 숫자를 원문 그대로 보존
    pub exact_numbers: bool,
    /// 공개 API URL
    pub public_url: String,
    /// 거래 API URL
    pub private_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            exact_numbers: false,
            public_url: PUBLIC_API_URL.to_string(),
            private_url: PRIVATE_API_URL.to_string(),
        }
    }
}

/// 파일/환경 변수에서 읽어 들이는 원시 설정.
#[derive(Debug, Deserialize)]
struct RawConfig {
    api_key: Option<String>,
    api_secret: Option<String>,
    timeout_secs: u64,
    exact_numbers: bool,
    public_url: String,
    private_url: String,
}

impl ClientConfig {
    /// 자격증명 없이 공개 명령 전용 설정 생성.
    pub fn public() -> Self {
        Self::default()
    }

    /// 자격증명을 포함한 설정 생성.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            credentials: Some(Credentials::new(api_key, api_secret)),
            ..Self::default()
        }
    }

    /// 요청 타임아웃 설정.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// 정밀 숫자 디코딩 설정.
    pub fn with_exact_numbers(mut self, exact_numbers: bool) -> Self {
        self.exact_numbers = exact_numbers;
        self
    }

    /// 엔드포인트 URL 설정 (테스트 서버 등).
    pub fn with_endpoints(
        mut self,
        public_url: impl Into<String>,
        private_url: impl Into<String>,
    ) -> Self {
        self.public_url = public_url.into();
        self.private_url = private_url.into();
        self
    }

    /// 자격증명 보유 여부.
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// 환경 변수에서 생성.
    ///
    /// `POLONIEX_API_KEY`, `POLONIEX_API_SECRET`, `POLONIEX_TIMEOUT_SECS`,
    /// `POLONIEX_EXACT_NUMBERS`를 읽습니다. 키나 시크릿이 없으면 공개 전용 설정이 됩니다.
    /// 타임아웃이 0이거나 숫자가 아니면 기본값을 사용합니다.
    pub fn from_env() -> Self {
        let credentials = match (
            std::env::var("POLONIEX_API_KEY").ok(),
            std::env::var("POLONIEX_API_SECRET").ok(),
        ) {
            (Some(key), Some(secret)) => Some(Credentials::new(key, secret)),
            _ => None,
        };

        let timeout_secs = std::env::var("POLONIEX_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let exact_numbers = std::env::var("POLONIEX_EXACT_NUMBERS")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            credentials,
            timeout_secs,
            exact_numbers,
            ..Self::default()
        }
    }

    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let builder = Self::builder()?
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("POLONIEX")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_raw(builder.build()?.try_deserialize()?)
    }

    /// TOML 문자열에서 설정을 로드합니다.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let builder = Self::builder()?
            .add_source(config::File::from_str(contents, config::FileFormat::Toml));

        Self::from_raw(builder.build()?.try_deserialize()?)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(config::Config::builder()
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("exact_numbers", false)?
            .set_default("public_url", PUBLIC_API_URL)?
            .set_default("private_url", PRIVATE_API_URL)?)
    }

    /// 설정 값을 검증합니다.
    ///
    /// 빌더 메서드로 만든 설정도 요청 전에 이 검사를 거칩니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "timeout_secs는 0보다 커야 합니다".to_string(),
            ));
        }
        Ok(())
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let credentials = match (raw.api_key, raw.api_secret) {
            (Some(key), Some(secret)) => Some(Credentials::new(key, secret)),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteCredentials),
        };

        let config = Self {
            credentials,
            timeout_secs: raw.timeout_secs,
            exact_numbers: raw.exact_numbers,
            public_url: raw.public_url,
            private_url: raw.private_url,
        };
        config.validate()?;
        Ok(config)
    }
}
