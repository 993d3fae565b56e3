use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::db::ConnectionStore;
use crate::error::ConnectResult;
use crate::models::UserSummary;
use crate::utils::FeedConfig;

#[derive(Debug, Clone, Serialize)]
pub struct FeedPage {
    pub page: u32,
    pub limit: u32,
    pub users: Vec<UserSummary>,
}

/// Computes who a viewer may discover: everyone except the viewer and any
/// user already sharing an edge with them, whatever that edge's status.
#[derive(Clone)]
pub struct FeedGenerator {
    store: Arc<dyn ConnectionStore>,
    config: FeedConfig,
}

impl FeedGenerator {
    pub fn new(store: Arc<dyn ConnectionStore>, config: FeedConfig) -> Self {
        Self { store, config }
    }

    /// Normalizes caller paging: pages are 1-based, sizes clamp to the cap.
    pub fn page_bounds(&self, page: Option<u32>, limit: Option<u32>) -> (u32, u32) {
        let page = page.unwrap_or(1).max(1);
        let limit = limit
            .unwrap_or(self.config.default_page_size)
            .clamp(1, self.config.max_page_size);
        (page, limit)
    }

    pub async fn get_feed(
        &self,
        viewer_id: Uuid,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> ConnectResult<FeedPage> {
        let (page, limit) = self.page_bounds(page, limit);

        let mut excluded: HashSet<Uuid> = self
            .store
            .counterparts_of(viewer_id)
            .await?
            .into_iter()
            .collect();
        excluded.insert(viewer_id);
        let excluded: Vec<Uuid> = excluded.into_iter().collect();

        let offset = u64::from(page - 1) * u64::from(limit);
        let users = self
            .store
            .list_users_excluding(&excluded, offset, u64::from(limit))
            .await?;

        tracing::debug!(
            viewer_id = %viewer_id,
            excluded = excluded.len(),
            page,
            returned = users.len(),
            "Feed computed"
        );

        Ok(FeedPage {
            page,
            limit,
            users: users.into_iter().map(UserSummary::from).collect(),
        })
    }
}
