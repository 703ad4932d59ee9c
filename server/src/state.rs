//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the market data source and the lobby membership map. Each lobby
//! member is represented by the sender half of its outbound channel.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::coinbase::PriceSource;
use crate::services::lobby::LobbyReply;

/// Connected lobby clients: `client_id` -> sender for outgoing replies.
pub type LobbyClients = Arc<RwLock<HashMap<Uuid, mpsc::Sender<LobbyReply>>>>;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub prices: Arc<dyn PriceSource>,
    pub lobby: LobbyClients,
    /// Pair whose buy price is appended to lobby announcements.
    pub lobby_pair: String,
    /// Directory holding the built client bundle and worker script.
    pub site_dir: PathBuf,
}

impl AppState {
    #[must_use]
    pub fn new(prices: Arc<dyn PriceSource>, lobby_pair: String, site_dir: PathBuf) -> Self {
        Self { prices, lobby: Arc::new(RwLock::new(HashMap::new())), lobby_pair, site_dir }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::coinbase::{
        ApiEnvelope, ApiErrorKind, CoinbaseError, Currency, ExchangeRates, HistoricPrices, Price, PriceKind,
        ServerTime,
    };
    use crate::coinbase::types::HistoricPrice;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn envelope<T>(data: T) -> ApiEnvelope<T> {
        ApiEnvelope { data, pagination: None, warnings: Vec::new() }
    }

    /// Canned price source. Pairs starting with `BAD` fail with `not_found`;
    /// every other pair quotes buy 101.50, sell 99.50, spot 100.00.
    #[derive(Default)]
    pub struct MockPrices {
        pub calls: AtomicUsize,
        pub offline: bool,
    }

    impl MockPrices {
        #[must_use]
        pub fn offline() -> Self {
            Self { calls: AtomicUsize::new(0), offline: true }
        }

        fn check(&self) -> Result<(), CoinbaseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(CoinbaseError::Request("connection refused".into()));
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl PriceSource for MockPrices {
        async fn currencies(&self) -> Result<ApiEnvelope<Vec<Currency>>, CoinbaseError> {
            self.check()?;
            Ok(envelope(vec![Currency { id: "USD".into(), name: "US Dollar".into(), min_size: "0.01".into() }]))
        }

        async fn exchange_rates(&self, currency: Option<&str>) -> Result<ApiEnvelope<ExchangeRates>, CoinbaseError> {
            self.check()?;
            let currency = currency.unwrap_or("USD").to_string();
            let rates = HashMap::from([("BTC".to_string(), "0.00001".to_string())]);
            Ok(envelope(ExchangeRates { currency, rates }))
        }

        async fn price(
            &self,
            pair: Option<&str>,
            kind: PriceKind,
            _date: Option<&str>,
        ) -> Result<ApiEnvelope<Price>, CoinbaseError> {
            self.check()?;
            let pair = pair.unwrap_or("BTC-USD");
            if pair.starts_with("BAD") {
                return Err(CoinbaseError::Api {
                    kind: ApiErrorKind::NotFound,
                    status: 404,
                    id: Some("not_found".into()),
                    message: "Invalid currency".into(),
                });
            }
            let (base, currency) = pair.split_once('-').unwrap_or((pair, "USD"));
            let amount = match kind {
                PriceKind::Buy => "101.50",
                PriceKind::Sell => "99.50",
                PriceKind::Spot => "100.00",
            };
            Ok(envelope(Price { base: Some(base.into()), currency: currency.into(), amount: amount.into() }))
        }

        async fn historic_prices(
            &self,
            pair: Option<&str>,
            _period: Option<&str>,
        ) -> Result<ApiEnvelope<HistoricPrices>, CoinbaseError> {
            self.check()?;
            let pair = pair.unwrap_or("BTC-USD");
            let (base, currency) = pair.split_once('-').unwrap_or((pair, "USD"));
            Ok(envelope(HistoricPrices {
                base: Some(base.into()),
                currency: currency.into(),
                prices: vec![HistoricPrice { price: "95.00".into(), time: "2024-01-01T00:00:00Z".into() }],
            }))
        }

        async fn time(&self) -> Result<ApiEnvelope<ServerTime>, CoinbaseError> {
            self.check()?;
            Ok(envelope(ServerTime { iso: "2024-01-01T00:00:00Z".into(), epoch: 1_704_067_200 }))
        }
    }

    /// Create a test `AppState` backed by `MockPrices`.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(Arc::new(MockPrices::default()), "BTC-USD".into(), std::env::temp_dir().join("coinboard-missing-site"))
    }

    /// Create a test `AppState` whose price source always fails.
    #[must_use]
    pub fn offline_app_state() -> AppState {
        AppState::new(Arc::new(MockPrices::offline()), "BTC-USD".into(), std::env::temp_dir().join("coinboard-missing-site"))
    }
}
