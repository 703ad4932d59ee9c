#[cfg(test)]
#[path = "prices_test.rs"]
mod prices_test;

use std::collections::BTreeMap;

use crate::net::types::{Price, PriceKind, ServerTime};

/// Pairs shown on the dashboard.
pub const TRACKED_PAIRS: [&str; 3] = ["BTC-USD", "ETH-USD", "LTC-USD"];

/// Quote refresh period.
pub const REFRESH_INTERVAL_MS: u32 = 30_000;

/// Latest known prices for one pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Quote {
    pub buy: Option<Price>,
    pub sell: Option<Price>,
    pub spot: Option<Price>,
}

impl Quote {
    pub fn get(&self, kind: PriceKind) -> Option<&Price> {
        match kind {
            PriceKind::Buy => self.buy.as_ref(),
            PriceKind::Sell => self.sell.as_ref(),
            PriceKind::Spot => self.spot.as_ref(),
        }
    }

    fn slot(&mut self, kind: PriceKind) -> &mut Option<Price> {
        match kind {
            PriceKind::Buy => &mut self.buy,
            PriceKind::Sell => &mut self.sell,
            PriceKind::Spot => &mut self.spot,
        }
    }
}

/// Dashboard model. Pairs are kept sorted for display.
///
/// Provided as `RwSignal<PriceBoard>` context by the `Dashboard` root.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceBoard {
    quotes: BTreeMap<String, Quote>,
    pub server_time: Option<ServerTime>,
    pub error: Option<String>,
}

impl PriceBoard {
    pub fn new<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Self {
        let quotes = pairs.into_iter().map(|p| (p.to_owned(), Quote::default())).collect();
        Self { quotes, server_time: None, error: None }
    }

    pub fn pairs(&self) -> impl Iterator<Item = &str> {
        self.quotes.keys().map(String::as_str)
    }

    pub fn quote(&self, pair: &str) -> Option<&Quote> {
        self.quotes.get(pair)
    }

    /// Record a fetched quote. Unknown pairs start tracking. Clears `error`.
    pub fn apply(&mut self, pair: &str, kind: PriceKind, price: Price) {
        *self.quotes.entry(pair.to_owned()).or_default().slot(kind) = Some(price);
        self.error = None;
    }

    pub fn fail(&mut self, pair: &str, kind: PriceKind, message: &str) {
        self.error = Some(format!("{pair} {}: {message}", kind.as_str()));
    }

    /// Buy minus sell; `None` until both sides parse.
    pub fn spread(&self, pair: &str) -> Option<f64> {
        let quote = self.quotes.get(pair)?;
        let buy = parse_amount(&quote.buy.as_ref()?.amount)?;
        let sell = parse_amount(&quote.sell.as_ref()?.amount)?;
        Some(buy - sell)
    }
}

pub fn parse_amount(amount: &str) -> Option<f64> {
    amount.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `"101.50 USD"`, or `--` when unknown.
pub fn format_price(price: Option<&Price>) -> String {
    price.map_or_else(|| "--".to_owned(), |p| format!("{} {}", p.amount, p.currency))
}

/// Two-decimal spread, e.g. `"2.00"`.
pub fn format_spread(spread: Option<f64>) -> String {
    spread.map_or_else(|| "--".to_owned(), |s| format!("{s:.2}"))
}
