use crate::extractors::bearer_token::BearerToken;
use crate::{AppState, Error};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use domain::captain_location::CaptainLocationIndex;
use domain::person::Person;
use domain::roles::Role;
use futures::{SinkExt, StreamExt};
use log::*;
use realtime::{ConnectionHandle, ConnectionRegistry, Effect, Outbound, SocketSession};
use serde::Deserialize;
use tokio::sync::mpsc;

#[derive(Debug, Deserialize)]
pub(crate) struct SocketParams {
    /// Browsers cannot set headers on a websocket handshake, so the session
    /// token may also come as a query parameter.
    token: Option<String>,
}

/// GET upgrade to the real-time socket
pub(crate) async fn socket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SocketParams>,
) -> Result<Response, Error> {
    let token = BearerToken::from_headers(&headers)
        .map(|BearerToken(token)| token)
        .or(params.token)
        .ok_or_else(domain::error::Error::unauthorized)?;

    let identity = app_state.gatekeeper.authenticate(&token)?;
    let person = Person::resolve(&app_state.db, &identity).await?;
    debug!("Upgrading socket for {} {}", person.role(), person.id());

    let session = SocketSession::new(person.id(), person.role());
    let max_message_bytes = app_state.config.socket_max_message_bytes;

    Ok(ws
        .max_message_size(max_message_bytes)
        .on_upgrade(move |socket| run_socket(socket, app_state, session)))
}

async fn run_socket(socket: WebSocket, app_state: AppState, mut session: SocketSession) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Outbound>();
    let handle = ConnectionHandle::new(tx);
    info!(
        "Socket {} opened for {} {}",
        handle.id(),
        session.role(),
        session.person_id()
    );

    loop {
        tokio::select! {
            outbound = rx.recv() => match outbound {
                Some(Outbound::Frame(frame)) => {
                    let text = match serde_json::to_string(&frame) {
                        Ok(text) => text,
                        Err(e) => {
                            error!("Failed to serialize {} frame: {e}", frame.event);
                            continue;
                        }
                    };
                    if sink.send(Message::Text(text.into())).await.is_err() {
                        debug!("Socket {} went away while sending", handle.id());
                        break;
                    }
                }
                Some(Outbound::Close) | None => {
                    debug!("Socket {} replaced by a newer connection, closing", handle.id());
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            },
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    let (next, effects) = session.on_text(text.as_str());
                    session = next;
                    apply_effects(&app_state.registry, &app_state.locations, &handle, effects);
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("Socket {} errored: {e}", handle.id());
                    break;
                }
            },
        }
    }

    apply_effects(
        &app_state.registry,
        &app_state.locations,
        &handle,
        session.on_disconnect(),
    );
    info!("Socket {} closed", handle.id());
}

/// Applies protocol effects on behalf of the connection behind `handle`.
pub(crate) fn apply_effects(
    registry: &ConnectionRegistry,
    locations: &CaptainLocationIndex,
    handle: &ConnectionHandle,
    effects: Vec<Effect>,
) {
    for effect in effects {
        match effect {
            Effect::Bind { person_id, role } => {
                if let Some(previous) = registry.bind(person_id, role, handle.clone()) {
                    if previous != *handle {
                        previous.close();
                    }
                }
            }
            Effect::UpdateLocation {
                captain_id,
                coordinate,
            } => {
                locations.update(captain_id, coordinate);
            }
            Effect::Unbind { person_id } => {
                if registry.unbind(&person_id, handle) == Some(Role::Captain) {
                    if let Some(record) = locations.mark_inactive(&person_id) {
                        debug!(
                            "Captain {person_id} went offline at {}, {}",
                            record.coordinate.latitude, record.coordinate.longitude
                        );
                    }
                }
            }
            Effect::Reply(event) => {
                if handle.send(Outbound::Frame(event.into_frame())).is_err() {
                    trace!("Socket {} closed before reply", handle.id());
                }
            }
        }
    }
}
