use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::db::{ConnectionStore, InsertOutcome};
use crate::error::{ConnectError, ConnectResult};
use crate::models::{ConnectionRequest, Party, RequestStatus, ReviewStatus, SendStatus};

/// Sole writer of connection requests.
///
/// ```text
/// [none] --send(interested|ignored)--> interested|ignored
/// interested --accepted|rejected, by receiver--> accepted|rejected
/// interested|ignored --withdrawn, by sender--> withdrawn
/// ```
///
/// Edges are never deleted, so a terminal edge keeps blocking its pair.
#[derive(Clone)]
pub struct RequestLedger {
    store: Arc<dyn ConnectionStore>,
}

impl RequestLedger {
    pub fn new(store: Arc<dyn ConnectionStore>) -> Self {
        Self { store }
    }

    pub async fn send(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        status: SendStatus,
    ) -> ConnectResult<ConnectionRequest> {
        if sender_id == receiver_id {
            return Err(ConnectError::InvalidOperation(
                "You cannot send a request to yourself".to_string(),
            ));
        }

        if self.store.get_user(receiver_id).await?.is_none() {
            return Err(ConnectError::not_found("User not found"));
        }

        let request = ConnectionRequest::new(sender_id, receiver_id, status.into());
        match self.store.insert_request(request).await? {
            InsertOutcome::Created(request) => {
                tracing::info!(
                    request_id = %request.id,
                    sender_id = %sender_id,
                    receiver_id = %receiver_id,
                    status = %request.status,
                    "Connection request created"
                );
                Ok(request)
            }
            InsertOutcome::Duplicate => {
                tracing::debug!(%sender_id, %receiver_id, "Duplicate connection request refused");
                Err(ConnectError::conflict("Request already exists"))
            }
        }
    }

    pub async fn review(
        &self,
        actor_id: Uuid,
        request_id: Uuid,
        status: ReviewStatus,
    ) -> ConnectResult<ConnectionRequest> {
        let request = self
            .store
            .get_request(request_id)
            .await?
            .ok_or_else(|| ConnectError::not_found("Req not found"))?;

        let party = request.party_of(actor_id);

        // Receivers are never shown ignored requests.
        if party == Some(Party::Receiver) && request.status == RequestStatus::Ignored {
            return Err(ConnectError::not_found("Req not found"));
        }

        let required = status.actor();
        if party != Some(required) {
            return Err(ConnectError::forbidden(match required {
                Party::Receiver => "Only the receiver can accept or reject this request",
                Party::Sender => "Only the sender can withdraw this request",
            }));
        }

        let target: RequestStatus = status.into();
        if request.status.is_terminal() || !status.applies_to(request.status) {
            return Err(already_settled(request.status, target));
        }

        let applied = self
            .store
            .transition_request(request_id, request.status, target, Utc::now())
            .await?;

        match applied {
            Some(updated) => {
                tracing::info!(
                    request_id = %updated.id,
                    actor_id = %actor_id,
                    from = %request.status,
                    to = %updated.status,
                    "Connection request reviewed"
                );
                Ok(updated)
            }
            None => {
                // Lost a race with another review of the same edge.
                let current = self
                    .store
                    .get_request(request_id)
                    .await?
                    .map(|r| r.status)
                    .unwrap_or(request.status);
                tracing::debug!(%request_id, %current, "Concurrent review already applied");
                Err(already_settled(current, target))
            }
        }
    }
}

fn already_settled(current: RequestStatus, target: RequestStatus) -> ConnectError {
    ConnectError::InvalidTransition(format!(
        "Request is already {}, it cannot be {}",
        current, target
    ))
}
