use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::db::ConnectionStore;
use crate::error::{ConnectError, ConnectResult};
use crate::models::{
    ConnectionRequest, Party, ReceivedRequest, RequestStatus, SentRequest, UserSummary,
};
use crate::utils::SentFilter;

/// Read-only views over the ledger. A connection is nothing more than an
/// `accepted` edge, so there is no separate table to keep in sync.
#[derive(Clone)]
pub struct ConnectionView {
    store: Arc<dyn ConnectionStore>,
}

impl ConnectionView {
    pub fn new(store: Arc<dyn ConnectionStore>) -> Self {
        Self { store }
    }

    /// Everyone `user_id` is connected to, oldest connection first.
    ///
    /// An empty set is reported as `NoConnections` rather than an empty list.
    pub async fn list_connections(&self, user_id: Uuid) -> ConnectResult<Vec<UserSummary>> {
        let mut accepted = self
            .store
            .requests_for_user(user_id, None, &[RequestStatus::Accepted])
            .await?;
        accepted.sort_by(|a, b| (a.updated_at, a.id).cmp(&(b.updated_at, b.id)));

        let counterparts: Vec<Uuid> = accepted.iter().map(|r| r.counterpart(user_id)).collect();
        let mut summaries = self.summaries(&counterparts).await?;

        let connections: Vec<UserSummary> = counterparts
            .iter()
            .filter_map(|id| summaries.remove(id))
            .collect();

        if connections.is_empty() {
            return Err(ConnectError::NoConnections);
        }
        Ok(connections)
    }

    /// Requests waiting on `user_id` to accept or reject, newest first.
    pub async fn list_received(&self, user_id: Uuid) -> ConnectResult<Vec<ReceivedRequest>> {
        let requests = self
            .store
            .requests_for_user(user_id, Some(Party::Receiver), &[RequestStatus::Interested])
            .await?;

        let senders: Vec<Uuid> = requests.iter().map(|r| r.sender_id).collect();
        let summaries = self.summaries(&senders).await?;

        Ok(requests
            .into_iter()
            .filter_map(|request| {
                let sender = summaries.get(&request.sender_id)?.clone();
                Some(received(request, sender))
            })
            .collect())
    }

    /// Requests `user_id` has sent, newest first.
    pub async fn list_sent(
        &self,
        user_id: Uuid,
        filter: SentFilter,
    ) -> ConnectResult<Vec<SentRequest>> {
        let statuses: &[RequestStatus] = match filter {
            SentFilter::All => &[],
            SentFilter::Pending => &[RequestStatus::Interested, RequestStatus::Ignored],
        };
        let requests = self
            .store
            .requests_for_user(user_id, Some(Party::Sender), statuses)
            .await?;

        let receivers: Vec<Uuid> = requests.iter().map(|r| r.receiver_id).collect();
        let summaries = self.summaries(&receivers).await?;

        Ok(requests
            .into_iter()
            .filter_map(|request| {
                let receiver = summaries.get(&request.receiver_id)?.clone();
                Some(sent(request, receiver))
            })
            .collect())
    }

    /// Whether the two users share an accepted edge. Used to gate messaging.
    pub async fn are_connected(&self, user_a: Uuid, user_b: Uuid) -> ConnectResult<bool> {
        if user_a == user_b {
            return Ok(false);
        }
        Ok(self
            .store
            .request_between(user_a, user_b)
            .await?
            .is_some_and(|request| request.status == RequestStatus::Accepted))
    }

    async fn summaries(&self, user_ids: &[Uuid]) -> ConnectResult<HashMap<Uuid, UserSummary>> {
        let users = self.store.get_users(user_ids).await?;
        if users.len() < user_ids.len() {
            tracing::warn!(
                requested = user_ids.len(),
                found = users.len(),
                "Ledger references users missing from the directory"
            );
        }
        Ok(users
            .into_iter()
            .map(|user| (user.id, UserSummary::from(user)))
            .collect())
    }
}

fn received(request: ConnectionRequest, sender: UserSummary) -> ReceivedRequest {
    ReceivedRequest {
        id: request.id,
        sender_id: request.sender_id,
        sender,
        receiver_id: request.receiver_id,
        status: request.status,
        created_at: request.created_at,
        updated_at: request.updated_at,
    }
}

fn sent(request: ConnectionRequest, receiver: UserSummary) -> SentRequest {
    SentRequest {
        id: request.id,
        sender_id: request.sender_id,
        receiver_id: request.receiver_id,
        receiver,
        status: request.status,
        created_at: request.created_at,
        updated_at: request.updated_at,
    }
}
