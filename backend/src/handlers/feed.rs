use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::{error::ConnectError, identity::CurrentUser, models::UserSummary, server::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub feed_data: Vec<UserSummary>,
    pub page: u32,
    pub limit: u32,
}

pub async fn get_feed(
    State(state): State<AppState>,
    caller: CurrentUser,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, ConnectError> {
    let page = state
        .feed()
        .get_feed(caller.id(), query.page, query.limit)
        .await?;

    Ok(Json(FeedResponse {
        feed_data: page.users,
        page: page.page,
        limit: page.limit,
    }))
}
