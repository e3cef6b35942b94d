//! 비공개 요청 서명.
//!
//! 요청 본문(URL 인코딩된 파라미터 문자열)을 API 시크릿으로 HMAC-SHA512 서명하고
//! 16진수 문자열로 인코딩합니다.

use hmac::{Hmac, Mac};
use poloniex_core::Credentials;
use secrecy::ExposeSecret;
use sha2::Sha512;

use crate::{PoloniexError, PoloniexResult};

type HmacSha512 = Hmac<Sha512>;

/// API 키 헤더.
pub const KEY_HEADER: &str = "Key";

/// 서명 헤더.
pub const SIGN_HEADER: &str = "Sign";

/// 본문을 시크릿으로 서명합니다.
pub fn sign(secret: &str, body: &str) -> PoloniexResult<String> {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|e| PoloniexError::ConfigurationError(format!("Invalid API secret: {}", e)))?;
    mac.update(body.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// 자격증명으로 본문을 서명하고 첨부할 헤더를 반환합니다.
pub fn auth_headers(credentials: &Credentials, body: &str) -> PoloniexResult<Vec<(String, String)>> {
    let signature = sign(credentials.api_secret().expose_secret(), body)?;
    Ok(vec![
        (KEY_HEADER.to_string(), credentials.api_key().to_string()),
        (SIGN_HEADER.to_string(), signature),
    ])
}
