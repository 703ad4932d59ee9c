//! Wire DTOs for the server's market-data endpoints.
//!
//! DESIGN
//! ======
//! These mirror the server's response envelope. Amounts stay decimal
//! strings on the wire; parsing to `f64` is a display concern.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Characters escaped inside one URL path segment.
const PATH_SEGMENT: &AsciiSet =
    &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'%').add(b'/').add(b'<').add(b'>').add(b'?').add(b'`').add(b'{').add(b'}');

/// Successful response body. Warnings and pagination are ignored.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

/// Error body returned by the server for failed requests.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    #[serde(default)]
    pub base: Option<String>,
    pub currency: String,
    pub amount: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTime {
    pub iso: String,
    pub epoch: i64,
}

/// Side of the book a quote belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceKind {
    Buy,
    Sell,
    Spot,
}

impl PriceKind {
    pub const ALL: [PriceKind; 3] = [PriceKind::Buy, PriceKind::Sell, PriceKind::Spot];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Spot => "spot",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
            Self::Spot => "Spot",
        }
    }
}

/// Server path for a quote, e.g. `/api/prices/BTC-USD/spot`. The pair is
/// percent-encoded as a single path segment.
pub fn price_path(pair: &str, kind: PriceKind) -> String {
    format!("/api/prices/{}/{}", utf8_percent_encode(pair, PATH_SEGMENT), kind.as_str())
}
