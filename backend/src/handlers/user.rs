use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::ConnectError,
    identity::CurrentUser,
    models::{ReceivedRequest, SentRequest, UserSummary},
    server::AppState,
};

#[derive(Debug, Serialize)]
pub struct RequestsResponse<T> {
    pub message: String,
    pub reqs: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionsResponse {
    pub message: String,
    pub connections: Vec<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionStatus {
    pub user_id: Uuid,
    pub connected: bool,
}

pub async fn received_requests(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> Result<Json<RequestsResponse<ReceivedRequest>>, ConnectError> {
    let reqs = state.connections().list_received(caller.id()).await?;

    Ok(Json(RequestsResponse {
        message: format!("{} pending requests", reqs.len()),
        reqs,
    }))
}

pub async fn sent_requests(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> Result<Json<RequestsResponse<SentRequest>>, ConnectError> {
    let reqs = state
        .connections()
        .list_sent(caller.id(), state.config.sent_filter)
        .await?;

    Ok(Json(RequestsResponse {
        message: format!("{} sent requests", reqs.len()),
        reqs,
    }))
}

pub async fn list_connections(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> Result<Json<ConnectionsResponse>, ConnectError> {
    let connections = state.connections().list_connections(caller.id()).await?;

    Ok(Json(ConnectionsResponse {
        message: "Connections fetched successfully".to_string(),
        connections,
    }))
}

/// Messaging gate: is the caller connected to `user_id`?
pub async fn connection_status(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Json<ConnectionStatus>, ConnectError> {
    let user_id = Uuid::parse_str(&user_id)
        .map_err(|_| ConnectError::InvalidInput(format!("'{}' is not a user id", user_id)))?;

    let connected = state.connections().are_connected(caller.id(), user_id).await?;

    Ok(Json(ConnectionStatus { user_id, connected }))
}
