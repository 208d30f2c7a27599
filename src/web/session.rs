use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap, StatusCode},
};
use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    pub email: String,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid token format")]
    Invalid,
    #[error("signature mismatch")]
    Signature,
    #[error("expired")]
    Expired,
}

/// Token layout: `base64(email|exp).base64(hmac)`.
pub fn sign_identity(email: &str, key: &[u8], ttl: Duration) -> Result<String, SessionError> {
    let exp = Utc::now() + ttl;
    let payload = format!("{}|{}", email.trim(), exp.timestamp());
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(payload.as_bytes());
    let sig = mac.finalize().into_bytes();
    Ok(format!(
        "{}.{}",
        general_purpose::STANDARD.encode(payload.as_bytes()),
        general_purpose::STANDARD.encode(sig)
    ))
}

pub fn verify_identity(token: &str, key: &[u8]) -> Result<IdentityClaims, SessionError> {
    let (payload_b64, sig_b64) = token.split_once('.').ok_or(SessionError::Invalid)?;
    let payload_bytes = general_purpose::STANDARD
        .decode(payload_b64)
        .map_err(|_| SessionError::Invalid)?;
    let sig_bytes = general_purpose::STANDARD
        .decode(sig_b64)
        .map_err(|_| SessionError::Invalid)?;

    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(&payload_bytes);
    mac.verify_slice(&sig_bytes).map_err(|_| SessionError::Signature)?;

    let payload = String::from_utf8(payload_bytes).map_err(|_| SessionError::Invalid)?;
    let (email, exp) = payload.rsplit_once('|').ok_or(SessionError::Invalid)?;
    let exp: i64 = exp.parse().map_err(|_| SessionError::Invalid)?;
    if email.is_empty() {
        return Err(SessionError::Invalid);
    }
    if Utc::now().timestamp() > exp {
        return Err(SessionError::Expired);
    }
    Ok(IdentityClaims {
        email: email.to_string(),
        exp,
    })
}

pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(bearer) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|auth| auth.to_str().ok())
        .and_then(|val| val.strip_prefix("Bearer "))
    {
        return Some(bearer.trim().to_string());
    }
    headers
        .get(axum::http::header::COOKIE)
        .and_then(|cookie| cookie.to_str().ok())
        .and_then(|val| {
            val.split(';')
                .find_map(|pair| pair.trim().strip_prefix("session="))
                .map(str::to_string)
        })
}

/// Verified email of the caller. Whether it belongs to an employee is decided
/// later by the services, which answer 401 for strangers.
pub struct Caller(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
    crate::state::SharedState: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let shared_state = crate::state::SharedState::from_ref(state);

        let token = extract_token(&parts.headers).ok_or(StatusCode::UNAUTHORIZED)?;
        let claims = verify_identity(&token, &shared_state.session_key).map_err(|e| {
            tracing::warn!("Identity token rejected: {}", e);
            StatusCode::UNAUTHORIZED
        })?;

        Ok(Caller(claims.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const KEY: &[u8] = b"test-session-key";

    #[test]
    fn test_sign_and_verify() {
        let token = sign_identity("lee@co.com", KEY, Duration::hours(1)).unwrap();
        let claims = verify_identity(&token, KEY).unwrap();
        assert_eq!(claims.email, "lee@co.com");
    }

    #[test]
    fn test_rejects_tampering_and_expiry() {
        let token = sign_identity("lee@co.com", KEY, Duration::hours(1)).unwrap();
        assert!(matches!(
            verify_identity(&token, b"other-key"),
            Err(SessionError::Signature)
        ));

        let (_, sig) = token.split_once('.').unwrap();
        let forged_payload = general_purpose::STANDARD.encode("hana@co.com|9999999999");
        assert!(matches!(
            verify_identity(&format!("{forged_payload}.{sig}"), KEY),
            Err(SessionError::Signature)
        ));

        let stale = sign_identity("lee@co.com", KEY, Duration::hours(-1)).unwrap();
        assert!(matches!(verify_identity(&stale, KEY), Err(SessionError::Expired)));
        assert!(matches!(verify_identity("garbage", KEY), Err(SessionError::Invalid)));
    }

    #[test]
    fn test_extract_token_from_header_or_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc.def"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer xyz.123"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz.123"));
    }
}
