//! In-process store used by tests and by `STORE=memory` deployments.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::store::{ConnectionStore, InsertOutcome};
use crate::models::{canonical_pair, ConnectionRequest, Party, RequestStatus, User};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    user_names: HashSet<String>,
    requests: HashMap<Uuid, ConnectionRequest>,
    pairs: HashMap<(Uuid, Uuid), Uuid>,
}

/// Every write holds the table lock for its whole check-then-write, which
/// gives the same atomicity the Postgres constraints give.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn directory_order(a: &User, b: &User) -> std::cmp::Ordering {
    (a.created_at, a.id).cmp(&(b.created_at, b.id))
}

#[async_trait]
impl ConnectionStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<InsertOutcome<User>> {
        let mut tables = self.tables.write().await;
        if !tables.user_names.insert(user.user_name.clone()) {
            return Ok(InsertOutcome::Duplicate);
        }
        tables.users.insert(user.id, user.clone());
        Ok(InsertOutcome::Created(user))
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn get_users(&self, user_ids: &[Uuid]) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = user_ids
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect();
        users.sort_by(directory_order);
        Ok(users)
    }

    async fn list_users_excluding(
        &self,
        exclude: &[Uuid],
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>> {
        let excluded: HashSet<&Uuid> = exclude.iter().collect();
        let tables = self.tables.read().await;

        let mut candidates: Vec<&User> = tables
            .users
            .values()
            .filter(|user| !excluded.contains(&user.id))
            .collect();
        candidates.sort_by(|a, b| directory_order(a, b));

        Ok(candidates
            .into_iter()
            .skip(usize::try_from(offset)?)
            .take(usize::try_from(limit)?)
            .cloned()
            .collect())
    }

    async fn insert_request(
        &self,
        request: ConnectionRequest,
    ) -> Result<InsertOutcome<ConnectionRequest>> {
        let mut tables = self.tables.write().await;
        let pair = request.pair();
        if tables.pairs.contains_key(&pair) {
            return Ok(InsertOutcome::Duplicate);
        }
        tables.pairs.insert(pair, request.id);
        tables.requests.insert(request.id, request.clone());
        Ok(InsertOutcome::Created(request))
    }

    async fn get_request(&self, request_id: Uuid) -> Result<Option<ConnectionRequest>> {
        Ok(self.tables.read().await.requests.get(&request_id).cloned())
    }

    async fn transition_request(
        &self,
        request_id: Uuid,
        from: RequestStatus,
        to: RequestStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<ConnectionRequest>> {
        let mut tables = self.tables.write().await;
        match tables.requests.get_mut(&request_id) {
            Some(request) if request.status == from => {
                request.status = to;
                request.updated_at = at;
                Ok(Some(request.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn requests_for_user(
        &self,
        user_id: Uuid,
        role: Option<Party>,
        statuses: &[RequestStatus],
    ) -> Result<Vec<ConnectionRequest>> {
        let tables = self.tables.read().await;
        let mut found: Vec<ConnectionRequest> = tables
            .requests
            .values()
            .filter(|request| match role {
                Some(role) => request.party_of(user_id) == Some(role),
                None => request.touches(user_id),
            })
            .filter(|request| statuses.is_empty() || statuses.contains(&request.status))
            .cloned()
            .collect();
        found.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(found)
    }

    async fn counterparts_of(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let tables = self.tables.read().await;
        Ok(tables
            .requests
            .values()
            .filter(|request| request.touches(user_id))
            .map(|request| request.counterpart(user_id))
            .collect())
    }

    async fn request_between(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Option<ConnectionRequest>> {
        let tables = self.tables.read().await;
        Ok(tables
            .pairs
            .get(&canonical_pair(user_a, user_b))
            .and_then(|id| tables.requests.get(id))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            user_name: name.to_string(),
            full_name: name.to_string(),
            bio: String::new(),
            skills: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn duplicate_user_names_are_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.insert_user(user("alice")).await.unwrap(),
            InsertOutcome::Created(_)
        ));
        assert_eq!(
            store.insert_user(user("alice")).await.unwrap(),
            InsertOutcome::Duplicate
        );
    }

    #[tokio::test]
    async fn crossed_requests_share_one_pair_slot() {
        let store = MemoryStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let first = store
            .insert_request(ConnectionRequest::new(a, b, RequestStatus::Interested))
            .await
            .unwrap();
        assert!(matches!(first, InsertOutcome::Created(_)));

        let crossed = store
            .insert_request(ConnectionRequest::new(b, a, RequestStatus::Interested))
            .await
            .unwrap();
        assert_eq!(crossed, InsertOutcome::Duplicate);
    }

    #[tokio::test]
    async fn transition_only_applies_from_expected_status() {
        let store = MemoryStore::new();
        let request = ConnectionRequest::new(Uuid::new_v4(), Uuid::new_v4(), RequestStatus::Interested);
        let id = request.id;
        store.insert_request(request).await.unwrap();

        let moved = store
            .transition_request(id, RequestStatus::Interested, RequestStatus::Accepted, Utc::now())
            .await
            .unwrap();
        assert_eq!(moved.map(|r| r.status), Some(RequestStatus::Accepted));

        let stale = store
            .transition_request(id, RequestStatus::Interested, RequestStatus::Rejected, Utc::now())
            .await
            .unwrap();
        assert!(stale.is_none());
        assert_eq!(
            store.get_request(id).await.unwrap().map(|r| r.status),
            Some(RequestStatus::Accepted)
        );
    }
}
