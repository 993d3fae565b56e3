use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ConnectError;
use crate::models::UserSummary;

/// Lifecycle state of a connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Interested,
    Ignored,
    Accepted,
    Rejected,
    Withdrawn,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Interested,
        RequestStatus::Ignored,
        RequestStatus::Accepted,
        RequestStatus::Rejected,
        RequestStatus::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Interested => "interested",
            RequestStatus::Ignored => "ignored",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Withdrawn => "withdrawn",
        }
    }

    /// No transition leaves a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Accepted | RequestStatus::Rejected | RequestStatus::Withdrawn
        )
    }

    /// Still waiting on someone to act.
    pub fn is_pending(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse used for values read back from storage.
impl FromStr for RequestStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown request status '{}' in ledger", s))
    }
}

/// Status a sender may create a request with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    Interested,
    Ignored,
}

impl FromStr for SendStatus {
    type Err = ConnectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interested" => Ok(SendStatus::Interested),
            "ignored" | "ignore" => Ok(SendStatus::Ignored),
            other => Err(ConnectError::InvalidStatus(other.to_string())),
        }
    }
}

impl From<SendStatus> for RequestStatus {
    fn from(status: SendStatus) -> Self {
        match status {
            SendStatus::Interested => RequestStatus::Interested,
            SendStatus::Ignored => RequestStatus::Ignored,
        }
    }
}

/// Status a request may be moved to after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Accepted,
    Rejected,
    Withdrawn,
}

impl ReviewStatus {
    /// Which side of the edge is entitled to apply this status.
    pub fn actor(&self) -> Party {
        match self {
            ReviewStatus::Accepted | ReviewStatus::Rejected => Party::Receiver,
            ReviewStatus::Withdrawn => Party::Sender,
        }
    }

    /// States this status may be applied from.
    pub fn applies_to(&self, current: RequestStatus) -> bool {
        match self {
            ReviewStatus::Accepted | ReviewStatus::Rejected => {
                current == RequestStatus::Interested
            }
            ReviewStatus::Withdrawn => current.is_pending(),
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = ConnectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(ReviewStatus::Accepted),
            "rejected" => Ok(ReviewStatus::Rejected),
            "withdrawn" | "withdraw" => Ok(ReviewStatus::Withdrawn),
            other => Err(ConnectError::InvalidStatus(other.to_string())),
        }
    }
}

impl From<ReviewStatus> for RequestStatus {
    fn from(status: ReviewStatus) -> Self {
        match status {
            ReviewStatus::Accepted => RequestStatus::Accepted,
            ReviewStatus::Rejected => RequestStatus::Rejected,
            ReviewStatus::Withdrawn => RequestStatus::Withdrawn,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Sender,
    Receiver,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionRequest {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConnectionRequest {
    pub fn new(sender_id: Uuid, receiver_id: Uuid, status: RequestStatus) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn party_of(&self, user_id: Uuid) -> Option<Party> {
        if user_id == self.sender_id {
            Some(Party::Sender)
        } else if user_id == self.receiver_id {
            Some(Party::Receiver)
        } else {
            None
        }
    }

    /// The endpoint that is not `user_id`.
    pub fn counterpart(&self, user_id: Uuid) -> Uuid {
        if user_id == self.sender_id {
            self.receiver_id
        } else {
            self.sender_id
        }
    }

    pub fn touches(&self, user_id: Uuid) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }

    pub fn pair(&self) -> (Uuid, Uuid) {
        canonical_pair(self.sender_id, self.receiver_id)
    }
}

/// Order-independent key for the two endpoints of an edge.
pub fn canonical_pair(user_a: Uuid, user_b: Uuid) -> (Uuid, Uuid) {
    if user_a < user_b {
        (user_a, user_b)
    } else {
        (user_b, user_a)
    }
}

/// Row shape of `connection_requests`; status is kept as text in the table.
#[derive(Debug, Clone, FromRow)]
pub struct RequestRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RequestRow> for ConnectionRequest {
    type Error = anyhow::Error;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// An inbox entry: the request plus who sent it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedRequest {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender: UserSummary,
    pub receiver_id: Uuid,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A sent-history entry: the request plus who it went to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentRequest {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub receiver: UserSummary,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
