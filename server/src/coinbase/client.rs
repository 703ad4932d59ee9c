//! Coinbase Data API HTTP client.
//!
//! The Data API is public: no key or secret, only the `CB-VERSION` header.
//! Every endpoint lives under `{base}/v2/...`; path parts are percent-encoded
//! individually so a pair such as `BTC-USD` or a date never leaks into the
//! path structure.

use std::time::Duration;

use reqwest::Url;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use super::error::{CoinbaseError, build_api_error};
use super::types::{
    ApiEnvelope, Currency, DEFAULT_CURRENCY_PAIR, ExchangeRates, HistoricPrices, Price, PriceKind, ServerTime,
};
use crate::config::CoinbaseConfig;

const USER_AGENT: &str = concat!("coinboard/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT_SECS: u64 = 5;

pub struct CoinbaseClient {
    http: reqwest::Client,
    base_uri: Url,
    api_version: String,
}

impl CoinbaseClient {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URI is malformed or the HTTP client
    /// cannot be built.
    pub fn new(config: &CoinbaseConfig) -> Result<Self, CoinbaseError> {
        let base_uri = check_uri_security(&config.base_uri)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "CB-VERSION",
            HeaderValue::from_str(&config.api_version).map_err(|e| CoinbaseError::HttpClientBuild(e.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| CoinbaseError::HttpClientBuild(e.to_string()))?;

        Ok(Self { http, base_uri, api_version: config.api_version.clone() })
    }

    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Build a fully qualified endpoint URI from path parts, appended to
    /// any path prefix the base URI carries.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URI cannot carry a path.
    pub fn api_uri(&self, parts: &[&str]) -> Result<Url, CoinbaseError> {
        let mut url = self.base_uri.clone();
        url.path_segments_mut()
            .map_err(|()| CoinbaseError::InvalidUri(self.base_uri.to_string()))?
            .pop_if_empty()
            .extend(parts);
        url.set_query(None);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        parts: &[&str],
        params: &[(&str, &str)],
    ) -> Result<ApiEnvelope<T>, CoinbaseError> {
        let url = self.api_uri(parts)?;
        tracing::debug!(%url, "coinbase: GET");
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| CoinbaseError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| CoinbaseError::Request(e.to_string()))?;
        parse_envelope(status, &text)
    }

    /// `GET /v2/currencies`
    pub async fn get_currencies(&self) -> Result<ApiEnvelope<Vec<Currency>>, CoinbaseError> {
        self.get(&["v2", "currencies"], &[]).await
    }

    /// `GET /v2/exchange-rates`, optionally relative to `currency`.
    pub async fn get_exchange_rates(&self, currency: Option<&str>) -> Result<ApiEnvelope<ExchangeRates>, CoinbaseError> {
        let params: Vec<(&str, &str)> = currency.map(|c| ("currency", c)).into_iter().collect();
        self.get(&["v2", "exchange-rates"], &params).await
    }

    /// `GET /v2/prices/{pair}/buy`
    pub async fn get_buy_price(&self, pair: Option<&str>) -> Result<ApiEnvelope<Price>, CoinbaseError> {
        self.get_price(pair, PriceKind::Buy, None).await
    }

    /// `GET /v2/prices/{pair}/sell`
    pub async fn get_sell_price(&self, pair: Option<&str>) -> Result<ApiEnvelope<Price>, CoinbaseError> {
        self.get_price(pair, PriceKind::Sell, None).await
    }

    /// `GET /v2/prices/{pair}/spot`, optionally for a historic `date` (`YYYY-MM-DD`).
    pub async fn get_spot_price(
        &self,
        pair: Option<&str>,
        date: Option<&str>,
    ) -> Result<ApiEnvelope<Price>, CoinbaseError> {
        self.get_price(pair, PriceKind::Spot, date).await
    }

    async fn get_price(
        &self,
        pair: Option<&str>,
        kind: PriceKind,
        date: Option<&str>,
    ) -> Result<ApiEnvelope<Price>, CoinbaseError> {
        let pair = pair.unwrap_or(DEFAULT_CURRENCY_PAIR);
        let params: Vec<(&str, &str)> = date.map(|d| ("date", d)).into_iter().collect();
        self.get(&["v2", "prices", pair, kind.as_str()], &params).await
    }

    /// `GET /v2/prices/historic`
    pub async fn get_historic_prices(
        &self,
        pair: Option<&str>,
        period: Option<&str>,
    ) -> Result<ApiEnvelope<HistoricPrices>, CoinbaseError> {
        let mut params = vec![("currency_pair", pair.unwrap_or(DEFAULT_CURRENCY_PAIR))];
        if let Some(period) = period {
            params.push(("period", period));
        }
        self.get(&["v2", "prices", "historic"], &params).await
    }

    /// `GET /v2/time`
    pub async fn get_time(&self) -> Result<ApiEnvelope<ServerTime>, CoinbaseError> {
        self.get(&["v2", "time"], &[]).await
    }
}

#[async_trait::async_trait]
impl super::PriceSource for CoinbaseClient {
    async fn currencies(&self) -> Result<ApiEnvelope<Vec<Currency>>, CoinbaseError> {
        self.get_currencies().await
    }

    async fn exchange_rates(&self, currency: Option<&str>) -> Result<ApiEnvelope<ExchangeRates>, CoinbaseError> {
        self.get_exchange_rates(currency).await
    }

    async fn price(
        &self,
        pair: Option<&str>,
        kind: PriceKind,
        date: Option<&str>,
    ) -> Result<ApiEnvelope<Price>, CoinbaseError> {
        self.get_price(pair, kind, date).await
    }

    async fn historic_prices(
        &self,
        pair: Option<&str>,
        period: Option<&str>,
    ) -> Result<ApiEnvelope<HistoricPrices>, CoinbaseError> {
        self.get_historic_prices(pair, period).await
    }

    async fn time(&self) -> Result<ApiEnvelope<ServerTime>, CoinbaseError> {
        self.get_time().await
    }
}

/// Parse a base URI, warning when it is not `https`.
///
/// # Errors
///
/// Returns an error if `uri` is not an absolute URL.
pub fn check_uri_security(uri: &str) -> Result<Url, CoinbaseError> {
    let url = Url::parse(uri).map_err(|e| CoinbaseError::InvalidUri(format!("{uri}: {e}")))?;
    if url.scheme() != "https" {
        tracing::warn!(
            %url,
            default = crate::config::DEFAULT_COINBASE_API_URI,
            "coinbase: sending requests to an insecure API endpoint"
        );
    }
    Ok(url)
}

/// Validate status and envelope of a raw response body.
///
/// Non-2xx statuses become `Api` errors, a body without `data` becomes
/// `MissingData`, and upstream warnings are logged.
///
/// # Errors
///
/// See above; decoding failures surface as `Parse`.
pub fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<ApiEnvelope<T>, CoinbaseError> {
    if !(200..300).contains(&status) {
        return Err(build_api_error(status, body));
    }

    let blob: serde_json::Value = serde_json::from_str(body).map_err(|e| CoinbaseError::Parse(e.to_string()))?;
    if blob.get("data").is_none_or(serde_json::Value::is_null) {
        return Err(CoinbaseError::MissingData { status });
    }

    let envelope: ApiEnvelope<T> = serde_json::from_value(blob).map_err(|e| CoinbaseError::Parse(e.to_string()))?;
    for warning in &envelope.warnings {
        tracing::warn!("coinbase: {} ({})", warning.message, warning.url);
    }
    Ok(envelope)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
