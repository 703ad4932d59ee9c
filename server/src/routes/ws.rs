//! WebSocket handler — lobby event relay.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID, joins the lobby, and enters a
//! `select!` loop:
//! - Incoming client events → parse + dispatch via `services::lobby`
//! - Lobby broadcasts → forward to client
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → join → announce arrival to every member
//! 2. Client sends events → dispatch → ack / announce / error
//! 3. Close → leave → announce departure to remaining members

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::services::lobby::{self, LobbyEvent, LobbyReply, Outcome};
use crate::state::AppState;

const CLIENT_CHANNEL_CAPACITY: usize = 64;

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let (client_tx, mut client_rx) = mpsc::channel::<LobbyReply>(CLIENT_CHANNEL_CAPACITY);

    lobby::join(&state, client_id, client_tx).await;
    info!(%client_id, "ws: client connected");
    lobby::announce(&state, lobby::JOIN_MESSAGE).await;

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        let replies = process_inbound_text(&state, client_id, &text).await;
                        if send_replies(&mut socket, &replies).await.is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(reply) = client_rx.recv() => {
                if send_reply(&mut socket, &reply).await.is_err() {
                    break;
                }
            }
        }
    }

    lobby::leave(&state, client_id).await;
    lobby::announce(&state, lobby::LEAVE_MESSAGE).await;
    info!(%client_id, "ws: client disconnected");
}

/// Parse and process one inbound text message and return replies for the
/// sender. Announcements go out through the lobby, not the return value.
async fn process_inbound_text(state: &AppState, client_id: Uuid, text: &str) -> Vec<LobbyReply> {
    let ev: LobbyEvent = match serde_json::from_str(text) {
        Ok(ev) => ev,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound event");
            return vec![LobbyReply::Error { message: format!("invalid json: {e}") }];
        }
    };

    match lobby::handle_event(client_id, &ev) {
        Ok(Outcome::Silent) => vec![],
        Ok(Outcome::Ack(args)) => vec![LobbyReply::Ack { event: ev.event, args }],
        Ok(Outcome::Announce(message)) => {
            lobby::announce(state, &message).await;
            vec![]
        }
        Err(message) => vec![LobbyReply::Error { message }],
    }
}

async fn send_replies(socket: &mut WebSocket, replies: &[LobbyReply]) -> Result<(), axum::Error> {
    for reply in replies {
        send_reply(socket, reply).await?;
    }
    Ok(())
}

async fn send_reply(socket: &mut WebSocket, reply: &LobbyReply) -> Result<(), axum::Error> {
    let text = serde_json::to_string(reply).unwrap_or_default();
    socket.send(Message::Text(text.into())).await
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
