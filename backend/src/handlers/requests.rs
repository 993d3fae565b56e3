use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::ConnectError,
    identity::CurrentUser,
    models::{ConnectionRequest, RequestStatus, ReviewStatus, SendStatus},
    server::AppState,
};

#[derive(Debug, Serialize)]
pub struct RequestResponse {
    pub message: String,
    pub req: ConnectionRequest,
}

/// `POST /reqs/send/{status}/{receiver_id}`
pub async fn send_request(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path((status, receiver_id)): Path<(String, String)>,
) -> Result<Json<RequestResponse>, ConnectError> {
    let status: SendStatus = status.parse()?;
    // A malformed id can never name a registered user.
    let receiver_id =
        Uuid::parse_str(&receiver_id).map_err(|_| ConnectError::not_found("User not found"))?;

    let req = state.ledger().send(caller.id(), receiver_id, status).await?;

    let message = match req.status {
        RequestStatus::Ignored => "User ignored successfully",
        _ => "Request sent successfully",
    };

    Ok(Json(RequestResponse {
        message: message.to_string(),
        req,
    }))
}

/// `PATCH /reqs/review/{status}/{req_id}`
pub async fn review_request(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path((status, req_id)): Path<(String, String)>,
) -> Result<Json<RequestResponse>, ConnectError> {
    let status: ReviewStatus = status.parse()?;
    let req_id = Uuid::parse_str(&req_id).map_err(|_| ConnectError::not_found("Req not found"))?;

    let req = state.ledger().review(caller.id(), req_id, status).await?;

    Ok(Json(RequestResponse {
        message: format!("Request {}", req.status),
        req,
    }))
}
