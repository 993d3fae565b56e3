use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;

use crate::{
    error::ConnectError,
    identity::CurrentUser,
    models::{NewUser, User, UserSummary},
    server::AppState,
};

/// Called by the identity layer when an account is provisioned.
pub async fn register_user(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ConnectError> {
    let user = state.directory().register(new_user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Json<UserSummary>, Response> {
    let lookup = match Uuid::parse_str(&user_id) {
        Ok(user_id) => state.directory().get(user_id).await,
        Err(_) => Err(ConnectError::not_found("User not found")),
    };

    match lookup {
        Ok(user) => Ok(Json(user.into())),
        // Plain lookups report a missing user as 404.
        Err(err @ ConnectError::NotFound(_)) => Err((StatusCode::NOT_FOUND, err).into_response()),
        Err(err) => Err(err.into_response()),
    }
}
