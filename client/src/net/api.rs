//! REST API helpers for communicating with the server.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`.
//! Native builds: stubs returning errors since these endpoints are only
//! meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result` outputs with a display string instead of panics so
//! a failed quote degrades one card without taking the dashboard down.

#![allow(clippy::unused_async)]

use super::types::{Price, PriceKind, ServerTime};

/// Fetch one quote from `/api/prices/{pair}/{kind}`.
///
/// # Errors
///
/// Returns the server's error message, or a transport error string.
pub async fn fetch_price(pair: &str, kind: PriceKind) -> Result<Price, String> {
    #[cfg(feature = "csr")]
    {
        get_data::<Price>(&super::types::price_path(pair, kind)).await
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (pair, kind);
        Err("not available outside the browser".to_owned())
    }
}

/// Fetch the upstream server time from `/api/time`.
///
/// # Errors
///
/// Returns the server's error message, or a transport error string.
pub async fn fetch_time() -> Result<ServerTime, String> {
    #[cfg(feature = "csr")]
    {
        get_data::<ServerTime>("/api/time").await
    }
    #[cfg(not(feature = "csr"))]
    {
        Err("not available outside the browser".to_owned())
    }
}

#[cfg(feature = "csr")]
async fn get_data<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, String> {
    use super::types::{ApiEnvelope, ApiErrorBody};

    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        let status = resp.status();
        return Err(resp
            .json::<ApiErrorBody>()
            .await
            .map_or_else(|_| format!("request failed: {status}"), |body| body.error));
    }
    resp.json::<ApiEnvelope<T>>()
        .await
        .map(|env| env.data)
        .map_err(|e| e.to_string())
}
