//! Client IP resolution for per-IP capture limits.
//!
//! Order of precedence when proxy headers are trusted:
//! 1. X-Forwarded-For header (first IP in list)
//! 2. X-Real-IP header
//! 3. ConnectInfo socket address
//!
//! Without trust only the socket address counts, so a client cannot pick
//! its own rate-limit bucket.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::async_trait;
use axum::extract::{ConnectInfo, FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Fallback when no address can be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Whether `X-Forwarded-For` / `X-Real-IP` come from a trusted proxy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProxyTrust(pub bool);

/// The requesting client's IP address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
    ProxyTrust: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let trust = ProxyTrust::from_ref(state);
        let connect_info = parts.extensions.get::<ConnectInfo<SocketAddr>>();
        Ok(ClientIp(resolve_client_ip(&parts.headers, connect_info, trust)))
    }
}

/// Resolves the client address from headers and the socket.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    trust: ProxyTrust,
) -> String {
    if trust.0 {
        if let Some(first_ip) = headers
            .get("X-Forwarded-For")
            .and_then(|h| h.to_str().ok())
            .and_then(|forwarded| forwarded.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return first_ip.to_string();
        }

        if let Some(real_ip) = headers
            .get("X-Real-IP")
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return real_ip.to_string();
        }
    }

    connect_info
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
