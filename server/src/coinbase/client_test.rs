use super::*;
use crate::coinbase::PriceSource;
use crate::coinbase::error::ApiErrorKind;
use axum::Router;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap as AxumHeaders, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use serde_json::json;
use std::collections::HashMap;

fn config_for(base_uri: &str) -> CoinbaseConfig {
    CoinbaseConfig { base_uri: base_uri.into(), api_version: "2016-02-18".into(), timeout_secs: 5 }
}

async fn mock_price(Path((pair, kind)): Path<(String, String)>, headers: AxumHeaders) -> impl IntoResponse {
    if headers.get("CB-VERSION").and_then(|v| v.to_str().ok()) != Some("2016-02-18") {
        return (StatusCode::BAD_REQUEST, axum::Json(json!({"errors": [{"id": "invalid_request", "message": "missing version"}]})));
    }
    if pair == "NOPE-USD" {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(json!({"errors": [{"id": "not_found", "message": "Invalid currency"}]})),
        );
    }
    let (base, currency) = pair.split_once('-').unwrap_or((pair.as_str(), "USD"));
    let amount = match kind.as_str() {
        "buy" => "101.50",
        "sell" => "99.50",
        _ => "100.00",
    };
    (
        StatusCode::OK,
        axum::Json(json!({
            "data": {"base": base, "currency": currency, "amount": amount},
            "warnings": [{"id": "missing_version", "message": "Please supply API version", "url": "https://developers.coinbase.com"}]
        })),
    )
}

async fn mock_historic(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let pair = params.get("currency_pair").cloned().unwrap_or_default();
    let period = params.get("period").cloned().unwrap_or_default();
    axum::Json(json!({
        "data": {
            "base": pair.split('-').next().unwrap_or_default(),
            "currency": period,
            "prices": [{"price": "1.00", "time": "2024-01-01T00:00:00Z"}]
        }
    }))
}

async fn spawn_mock_upstream() -> String {
    let app = Router::new()
        .route("/v2/prices/historic", get(mock_historic))
        .route("/v2/prices/{pair}/{kind}", get(mock_price))
        .route("/v2/time", get(|| async { axum::Json(json!({"data": {"iso": "2024-01-01T00:00:00Z", "epoch": 1_704_067_200}})) }))
        .route("/v2/currencies", get(|| async { axum::Json(json!({"pagination": {"limit": 25}})) }))
        .route("/v2/exchange-rates", get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance") }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

#[test]
fn api_uri_appends_to_root_base_and_encodes_parts() {
    let client = CoinbaseClient::new(&config_for("https://api.coinbase.com/?x=1")).unwrap();
    let url = client.api_uri(&["v2", "prices", "BTC USD", "spot"]).unwrap();
    assert_eq!(url.as_str(), "https://api.coinbase.com/v2/prices/BTC%20USD/spot");

    let url = client.api_uri(&["v2", "prices", "a/b", "buy"]).unwrap();
    assert_eq!(url.as_str(), "https://api.coinbase.com/v2/prices/a%2Fb/buy");
}

#[test]
fn api_uri_keeps_base_path_prefix() {
    let client = CoinbaseClient::new(&config_for("http://proxy.local/coinbase/")).unwrap();
    let url = client.api_uri(&["v2", "time"]).unwrap();
    assert_eq!(url.as_str(), "http://proxy.local/coinbase/v2/time");

    let client = CoinbaseClient::new(&config_for("http://proxy.local/coinbase")).unwrap();
    let url = client.api_uri(&["v2", "time"]).unwrap();
    assert_eq!(url.as_str(), "http://proxy.local/coinbase/v2/time");
}

#[test]
fn check_uri_security_accepts_http_and_rejects_garbage() {
    assert_eq!(check_uri_security("http://localhost:1234/").unwrap().scheme(), "http");
    assert!(matches!(check_uri_security("not a url"), Err(CoinbaseError::InvalidUri(_))));
}

#[test]
fn client_keeps_configured_api_version() {
    let client = CoinbaseClient::new(&config_for(crate::config::DEFAULT_COINBASE_API_URI)).unwrap();
    assert_eq!(client.api_version(), "2016-02-18");
}

#[test]
fn parse_envelope_reads_data_and_pagination() {
    let body = r#"{"data":{"iso":"2015-06-23T18:02:51Z","epoch":1435082571},"pagination":{"limit":25,"order":"desc"}}"#;
    let env: ApiEnvelope<ServerTime> = parse_envelope(200, body).unwrap();
    assert_eq!(env.data.epoch, 1_435_082_571);
    assert_eq!(env.pagination.unwrap().limit, Some(25));
    assert!(env.warnings.is_empty());
}

#[test]
fn parse_envelope_rejects_missing_or_null_data() {
    let err = parse_envelope::<ServerTime>(200, r#"{"warnings":[]}"#).unwrap_err();
    assert!(matches!(err, CoinbaseError::MissingData { status: 200 }));

    let err = parse_envelope::<ServerTime>(201, r#"{"data":null}"#).unwrap_err();
    assert!(matches!(err, CoinbaseError::MissingData { status: 201 }));
}

#[test]
fn parse_envelope_reports_undecodable_body() {
    let err = parse_envelope::<ServerTime>(200, "<html>").unwrap_err();
    assert!(matches!(err, CoinbaseError::Parse(_)));
}

#[test]
fn parse_envelope_maps_error_id_before_status() {
    let body = r#"{"errors":[{"id":"rate_limit_exceeded","message":"slow down"}]}"#;
    let err = parse_envelope::<ServerTime>(400, body).unwrap_err();
    match err {
        CoinbaseError::Api { kind, status, id, message } => {
            assert_eq!(kind, ApiErrorKind::RateLimitExceeded);
            assert_eq!(status, 400);
            assert_eq!(id.as_deref(), Some("rate_limit_exceeded"));
            assert_eq!(message, "slow down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn buy_price_defaults_pair_and_logs_warnings() {
    let base = spawn_mock_upstream().await;
    let client = CoinbaseClient::new(&config_for(&base)).unwrap();

    let env = client.get_buy_price(None).await.unwrap();
    assert_eq!(env.data.base.as_deref(), Some("BTC"));
    assert_eq!(env.data.currency, "USD");
    assert_eq!(env.data.amount, "101.50");
    assert_eq!(env.warnings.len(), 1);

    let env = client.get_sell_price(Some("LTC-USD")).await.unwrap();
    assert_eq!(env.data.base.as_deref(), Some("LTC"));
    assert_eq!(env.data.amount, "99.50");

    let env = client.price(Some("ETH-EUR"), PriceKind::Spot, Some("2024-01-01")).await.unwrap();
    assert_eq!(env.data.currency, "EUR");
    assert_eq!(env.data.amount, "100.00");
}

#[tokio::test]
async fn historic_prices_sends_query_params() {
    let base = spawn_mock_upstream().await;
    let client = CoinbaseClient::new(&config_for(&base)).unwrap();

    let env = client.get_historic_prices(Some("ETH-USD"), Some("week")).await.unwrap();
    assert_eq!(env.data.base.as_deref(), Some("ETH"));
    assert_eq!(env.data.currency, "week");
    assert_eq!(env.data.prices.len(), 1);
}

#[tokio::test]
async fn time_round_trips_through_trait() {
    let base = spawn_mock_upstream().await;
    let client = CoinbaseClient::new(&config_for(&base)).unwrap();
    let env = client.time().await.unwrap();
    assert_eq!(env.data.iso, "2024-01-01T00:00:00Z");
}

#[tokio::test]
async fn upstream_failures_are_classified() {
    let base = spawn_mock_upstream().await;
    let client = CoinbaseClient::new(&config_for(&base)).unwrap();

    let err = client.get_buy_price(Some("NOPE-USD")).await.unwrap_err();
    assert!(matches!(err, CoinbaseError::Api { kind: ApiErrorKind::NotFound, status: 404, .. }));
    assert_eq!(err.upstream_status(), Some(404));

    let err = client.get_exchange_rates(Some("USD")).await.unwrap_err();
    match err {
        CoinbaseError::Api { kind, status, id, message } => {
            assert_eq!(kind, ApiErrorKind::ServiceUnavailable);
            assert_eq!(status, 503);
            assert!(id.is_none());
            assert_eq!(message, "down for maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = client.get_currencies().await.unwrap_err();
    assert!(matches!(err, CoinbaseError::MissingData { status: 200 }));
}

#[tokio::test]
async fn unreachable_upstream_is_a_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = CoinbaseClient::new(&config_for(&format!("http://{addr}/"))).unwrap();
    let err = client.get_time().await.unwrap_err();
    assert!(matches!(err, CoinbaseError::Request(_)));
    assert_eq!(err.upstream_status(), None);
}
