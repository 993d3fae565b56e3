use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::store::{ConnectionStore, InsertOutcome};
use crate::db::{requests, users};
use crate::models::{ConnectionRequest, Party, RequestStatus, User};

/// Postgres-backed store. Pair uniqueness and conditional transitions are
/// enforced by the `connection_requests` table itself.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ConnectionStore for PgStore {
    async fn insert_user(&self, user: User) -> Result<InsertOutcome<User>> {
        users::create_user(&self.pool, &user).await
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        users::get_user_by_id(&self.pool, user_id).await
    }

    async fn get_users(&self, user_ids: &[Uuid]) -> Result<Vec<User>> {
        users::get_users_by_ids(&self.pool, user_ids).await
    }

    async fn list_users_excluding(
        &self,
        exclude: &[Uuid],
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>> {
        users::list_users_excluding(&self.pool, exclude, offset, limit).await
    }

    async fn insert_request(
        &self,
        request: ConnectionRequest,
    ) -> Result<InsertOutcome<ConnectionRequest>> {
        requests::insert_request(&self.pool, &request).await
    }

    async fn get_request(&self, request_id: Uuid) -> Result<Option<ConnectionRequest>> {
        requests::get_request_by_id(&self.pool, request_id).await
    }

    async fn transition_request(
        &self,
        request_id: Uuid,
        from: RequestStatus,
        to: RequestStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<ConnectionRequest>> {
        requests::transition_request(&self.pool, request_id, from, to, at).await
    }

    async fn requests_for_user(
        &self,
        user_id: Uuid,
        role: Option<Party>,
        statuses: &[RequestStatus],
    ) -> Result<Vec<ConnectionRequest>> {
        requests::get_requests_for_user(&self.pool, user_id, role, statuses).await
    }

    async fn counterparts_of(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        requests::get_counterparts(&self.pool, user_id).await
    }

    async fn request_between(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Option<ConnectionRequest>> {
        requests::get_request_between(&self.pool, user_a, user_b).await
    }
}
