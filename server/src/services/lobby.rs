//! Lobby — event dispatch and price announcements for websocket clients.
//!
//! DESIGN
//! ======
//! `handle_event` is pure: it inspects one inbound event and returns an
//! `Outcome`. The websocket layer owns delivery (reply to sender or
//! announce to every member). Announcements carry the current buy price of
//! the configured lobby pair; a failed lookup is logged and the text is
//! sent without it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::coinbase::{Price, PriceKind};
use crate::state::AppState;

pub const DEFAULT_NAMESPACE: &str = "/";
pub const JOIN_MESSAGE: &str = "A new user has entered the Coinbase lobby.";
pub const LEAVE_MESSAGE: &str = "A user has left the Coinbase lobby.";

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Inbound event sent by a lobby client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LobbyEvent {
    pub event: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl LobbyEvent {
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    /// Payload as display text: strings verbatim, anything else as JSON.
    #[must_use]
    pub fn text(&self) -> String {
        match &self.data {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Outbound message delivered to a lobby client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LobbyReply {
    /// Acknowledgement for the sender's event.
    Ack { event: String, args: Vec<Value> },
    /// Announcement delivered to every member.
    Broadcast { message: String },
    /// The sender's event was rejected.
    Error { message: String },
}

// =============================================================================
// DISPATCH
// =============================================================================

/// What the websocket layer should do with an inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Logged only; nothing is sent.
    Silent,
    /// Reply to the sender with these ack arguments.
    Ack(Vec<Value>),
    /// Announce the text to every lobby member.
    Announce(String),
}

/// Dispatch one inbound event by `(event, namespace)`.
///
/// # Errors
///
/// Returns a message for unknown events and empty chat messages.
pub fn handle_event(client_id: Uuid, ev: &LobbyEvent) -> Result<Outcome, String> {
    match (ev.event.as_str(), ev.namespace()) {
        ("message", "/localhost") => {
            info!(%client_id, "received message: {}", ev.text());
            Ok(Outcome::Silent)
        }
        ("json", "/localhost") => {
            info!(%client_id, "received json: {}", ev.data);
            Ok(Outcome::Silent)
        }
        ("my event", DEFAULT_NAMESPACE) => {
            info!(%client_id, "received json: {}", ev.data);
            Ok(Outcome::Ack(vec![Value::from("event test"), Value::from(0)]))
        }
        ("my event", "/test") => {
            info!(%client_id, "received json with namespace /test: {}", ev.data);
            Ok(Outcome::Ack(vec![Value::from("event test"), Value::from(1)]))
        }
        ("chat", _) => {
            let text = ev.text();
            if text.trim().is_empty() {
                return Err("chat message required".into());
            }
            Ok(Outcome::Announce(text))
        }
        (event, namespace) => Err(format!("unknown event: {event} on {namespace}")),
    }
}

// =============================================================================
// MEMBERSHIP
// =============================================================================

pub async fn join(state: &AppState, client_id: Uuid, tx: mpsc::Sender<LobbyReply>) {
    let mut clients = state.lobby.write().await;
    clients.insert(client_id, tx);
    info!(%client_id, members = clients.len(), "lobby: joined");
}

pub async fn leave(state: &AppState, client_id: Uuid) {
    let mut clients = state.lobby.write().await;
    clients.remove(&client_id);
    info!(%client_id, members = clients.len(), "lobby: left");
}

/// Deliver `reply` to every member. Full or closed channels drop the message
/// for that member only.
pub async fn broadcast(state: &AppState, reply: &LobbyReply) {
    let clients = state.lobby.read().await;
    for (client_id, tx) in clients.iter() {
        if let Err(e) = tx.try_send(reply.clone()) {
            warn!(%client_id, error = %e, "lobby: dropped broadcast");
        }
    }
}

/// Append the lobby pair's buy price to `text` and broadcast it.
pub async fn announce(state: &AppState, text: &str) {
    let quote = match state.prices.price(Some(&state.lobby_pair), PriceKind::Buy, None).await {
        Ok(envelope) => Some(envelope.data),
        Err(e) => {
            warn!(error = %e, pair = %state.lobby_pair, "lobby: price lookup failed");
            None
        }
    };
    let message = with_price(text, &state.lobby_pair, quote.as_ref());
    broadcast(state, &LobbyReply::Broadcast { message }).await;
}

/// Format an announcement, appending the quote when one is available.
#[must_use]
pub fn with_price(text: &str, pair: &str, quote: Option<&Price>) -> String {
    match quote {
        Some(price) => format!("{text} ({pair} buy price is {} {})", price.amount, price.currency),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[path = "lobby_test.rs"]
mod tests;
