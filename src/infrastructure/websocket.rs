//! WebSocket handler for player connections
//!
//! A client connects with `/ws?character=<id>&transport=<rendered|structured>`
//! and gets a session for that character for as long as the socket is open.
//! Server output is forwarded as JSON [`ServerMessage`]s; the client may send
//! commands to run on the character's behalf.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::application::ports::outbound::{SessionPort, TransportKind, WorldStatePort};
use crate::domain::value_objects::CharacterId;
use crate::infrastructure::state::AppState;

/// Query parameters of the upgrade request
#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    pub character: CharacterId,
    #[serde(default = "default_transport")]
    pub transport: TransportKind,
}

fn default_transport() -> TransportKind {
    TransportKind::Structured
}

/// Messages sent from a client to the server
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Run a player command, e.g. `look`
    Command {
        command: String,
        #[serde(default)]
        args: String,
    },
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.world.character(params.character) {
        Some(character) if !character.is_npc => {}
        _ => {
            tracing::warn!("Rejected connection for unknown player {}", params.character);
            return (StatusCode::NOT_FOUND, "Unknown player character").into_response();
        }
    }

    ws.on_upgrade(move |socket| handle_socket(socket, state, params))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, params: ConnectParams) {
    let character = params.character;
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let mut output = state.sessions.connect(character, params.transport);

    tracing::info!("WebSocket connection established for {}", character);

    // Forward session output to the socket until the session goes away
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = output.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    state.sessions.show_prompt(character);

    let send_finished = loop {
        tokio::select! {
            _ = &mut send_task => break true,
            incoming = ws_receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    handle_text(&state, character, text.as_str()).await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("WebSocket connection closed by client for {}", character);
                    break false;
                }
                Some(Err(e)) => {
                    tracing::error!("WebSocket error for {}: {}", character, e);
                    break false;
                }
                Some(Ok(_)) => {}
            },
        }
    };

    if !send_finished {
        send_task.abort();
        let _ = send_task.await;
    }
    state.sessions.disconnect(character);

    tracing::info!("WebSocket connection terminated for {}", character);
}

/// Process one text frame from a client
async fn handle_text(state: &AppState, character: CharacterId, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Failed to parse message from {}: {}", character, e);
            state
                .sessions
                .report_error(character, format!("Invalid message format: {e}"));
            return;
        }
    };

    match message {
        ClientMessage::Command { command, args } => {
            if let Err(e) = state.commands.execute(&command, &args, character).await {
                state.sessions.say(character, &e.to_string());
            }
            state.sessions.show_prompt(character);
        }
    }
}
