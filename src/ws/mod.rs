pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt, Sink};

use crate::protocol::{ClientMessage, ServerMessage, PROTOCOL_VERSION};
use crate::state::SharedStore;
use crate::view;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(store): State<SharedStore>) -> impl IntoResponse {
    tracing::info!("WebSocket connection request");
    ws.on_upgrade(move |socket| handle_socket(socket, store))
}

async fn send_all<S>(sender: &mut S, messages: &[ServerMessage]) -> bool
where
    S: Sink<Message> + Unpin,
{
    for msg in messages {
        match serde_json::to_string(msg) {
            Ok(json) => {
                if sender.send(Message::Text(json.into())).await.is_err() {
                    return false;
                }
            }
            Err(e) => tracing::error!("Failed to serialize message: {}", e),
        }
    }
    true
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, store: SharedStore) {
    let (mut sender, mut receiver) = socket.split();

    // Greet with the screen the game was left on
    let greeting = {
        let mut store = store.lock().await;
        store.resume();
        let mut messages = vec![ServerMessage::Welcome {
            protocol: PROTOCOL_VERSION.to_string(),
            screen: store.state().current_screen,
        }];
        messages.extend(view::render_screen(store.state()));
        if let Some(warning) = store.take_persist_warning() {
            messages.push(ServerMessage::Warning { msg: warning });
        }
        messages
    };

    if !send_all(&mut sender, &greeting).await {
        tracing::error!("Failed to send welcome message");
        return;
    }

    while let Some(ws_msg) = receiver.next().await {
        match ws_msg {
            Ok(Message::Text(text)) => {
                tracing::debug!("Received message: {}", text);

                let responses = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        let mut store = store.lock().await;
                        handlers::handle_message(client_msg, &mut store)
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse client message: {}", e);
                        vec![ServerMessage::Error {
                            code: "PARSE_ERROR".to_string(),
                            msg: format!("Invalid message format: {}", e),
                        }]
                    }
                };

                if !send_all(&mut sender, &responses).await {
                    tracing::error!("Failed to send response");
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                tracing::info!("WebSocket closed");
                break;
            }
            Ok(Message::Ping(data)) => {
                if sender.send(Message::Pong(data)).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                break;
            }
        }
    }

    tracing::info!("WebSocket connection closed");
}
