//! Boundary with the upstream identity layer.
//!
//! Credentials are verified before a request reaches this service; the
//! identity layer forwards the resolved user id in a trusted header. This
//! extractor only turns that header into a directory record.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::ConnectError;
use crate::models::User;
use crate::server::AppState;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ConnectError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(state.config.identity_header.as_str())
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .ok_or(ConnectError::Unauthorized)?;

        match state.directory().find(user_id).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                tracing::debug!(%user_id, "Identity header names an unknown user");
                Err(ConnectError::Unauthorized)
            }
        }
    }
}
