use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{ConnectionRequest, Party, RequestStatus, User};

/// Result of an insert guarded by a uniqueness constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome<T> {
    Created(T),
    Duplicate,
}

/// Durable storage behind the user directory and the request ledger.
///
/// Implementations must make `insert_request` and `transition_request`
/// atomic: two inserts for the same unordered pair can never both succeed,
/// and a transition only applies while the row still holds `from`.
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    /// Fails with `Duplicate` when the user name is already registered.
    async fn insert_user(&self, user: User) -> Result<InsertOutcome<User>>;

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>>;

    async fn get_users(&self, user_ids: &[Uuid]) -> Result<Vec<User>>;

    /// Directory slice in `(created_at, id)` order, skipping `exclude`.
    async fn list_users_excluding(
        &self,
        exclude: &[Uuid],
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>>;

    /// Fails with `Duplicate` when any edge already joins the unordered pair.
    async fn insert_request(
        &self,
        request: ConnectionRequest,
    ) -> Result<InsertOutcome<ConnectionRequest>>;

    async fn get_request(&self, request_id: Uuid) -> Result<Option<ConnectionRequest>>;

    /// Conditional write: returns `None` if the edge no longer holds `from`.
    async fn transition_request(
        &self,
        request_id: Uuid,
        from: RequestStatus,
        to: RequestStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<ConnectionRequest>>;

    /// Edges where `user_id` plays `role` (either side when `None`), limited
    /// to `statuses` unless empty. Newest first.
    async fn requests_for_user(
        &self,
        user_id: Uuid,
        role: Option<Party>,
        statuses: &[RequestStatus],
    ) -> Result<Vec<ConnectionRequest>>;

    /// Every user sharing an edge of any status with `user_id`.
    async fn counterparts_of(&self, user_id: Uuid) -> Result<Vec<Uuid>>;

    async fn request_between(&self, user_a: Uuid, user_b: Uuid)
        -> Result<Option<ConnectionRequest>>;
}
