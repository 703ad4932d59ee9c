//! Market data REST endpoints proxied from the Coinbase Data API.
//!
//! ERROR HANDLING
//! ==============
//! Upstream API errors keep their status; local failures (transport, decode,
//! missing envelope) become `502 Bad Gateway`. Bodies are `{ "error": msg }`.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::coinbase::{ApiEnvelope, CoinbaseError, Currency, ExchangeRates, HistoricPrices, Price, PriceKind, ServerTime};
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiEnvelope<T>>, (StatusCode, Json<Value>)>;

pub(crate) fn coinbase_error_to_status(err: &CoinbaseError) -> StatusCode {
    err.upstream_status()
        .and_then(|s| StatusCode::from_u16(s).ok())
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

fn upstream_failure(err: CoinbaseError) -> (StatusCode, Json<Value>) {
    let status = coinbase_error_to_status(&err);
    tracing::warn!(error = %err, %status, "coinbase request failed");
    (status, Json(json!({ "error": err.to_string() })))
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message.into() })))
}

pub async fn currencies(State(state): State<AppState>) -> ApiResult<Vec<Currency>> {
    state.prices.currencies().await.map(Json).map_err(upstream_failure)
}

#[derive(Debug, Deserialize)]
pub struct ExchangeRatesQuery {
    pub currency: Option<String>,
}

pub async fn exchange_rates(
    State(state): State<AppState>,
    Query(query): Query<ExchangeRatesQuery>,
) -> ApiResult<ExchangeRates> {
    state
        .prices
        .exchange_rates(query.currency.as_deref())
        .await
        .map(Json)
        .map_err(upstream_failure)
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub date: Option<String>,
}

pub async fn price(
    State(state): State<AppState>,
    Path((pair, kind)): Path<(String, String)>,
    Query(query): Query<PriceQuery>,
) -> ApiResult<Price> {
    let kind: PriceKind = kind.parse().map_err(bad_request)?;
    if kind != PriceKind::Spot && query.date.is_some() {
        return Err(bad_request("date is only supported for spot prices"));
    }
    state
        .prices
        .price(Some(&pair), kind, query.date.as_deref())
        .await
        .map(Json)
        .map_err(upstream_failure)
}

#[derive(Debug, Deserialize)]
pub struct HistoricQuery {
    pub currency_pair: Option<String>,
    pub period: Option<String>,
}

pub async fn historic_prices(
    State(state): State<AppState>,
    Query(query): Query<HistoricQuery>,
) -> ApiResult<HistoricPrices> {
    state
        .prices
        .historic_prices(query.currency_pair.as_deref(), query.period.as_deref())
        .await
        .map(Json)
        .map_err(upstream_failure)
}

pub async fn time(State(state): State<AppState>) -> ApiResult<ServerTime> {
    state.prices.time().await.map(Json).map_err(upstream_failure)
}

#[cfg(test)]
#[path = "prices_test.rs"]
mod tests;
