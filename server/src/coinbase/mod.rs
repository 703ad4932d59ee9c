//! Coinbase Data API adapter.
//!
//! DESIGN
//! ======
//! Routes and the lobby depend on the `PriceSource` trait, not on the HTTP
//! client, so tests can substitute a canned source. `CoinbaseClient` is the
//! only production implementation.

pub mod client;
pub mod error;
pub mod types;

pub use client::CoinbaseClient;
pub use error::{ApiErrorKind, CoinbaseError};
pub use types::{ApiEnvelope, Currency, ExchangeRates, HistoricPrices, Price, PriceKind, ServerTime};

/// Read-only market data provider.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    async fn currencies(&self) -> Result<ApiEnvelope<Vec<Currency>>, CoinbaseError>;

    async fn exchange_rates(&self, currency: Option<&str>) -> Result<ApiEnvelope<ExchangeRates>, CoinbaseError>;

    /// Quote for `pair` (default `BTC-USD`). `date` only applies to spot.
    async fn price(
        &self,
        pair: Option<&str>,
        kind: PriceKind,
        date: Option<&str>,
    ) -> Result<ApiEnvelope<Price>, CoinbaseError>;

    async fn historic_prices(
        &self,
        pair: Option<&str>,
        period: Option<&str>,
    ) -> Result<ApiEnvelope<HistoricPrices>, CoinbaseError>;

    async fn time(&self) -> Result<ApiEnvelope<ServerTime>, CoinbaseError>;
}
