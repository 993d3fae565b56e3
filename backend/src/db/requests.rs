use crate::db::store::InsertOutcome;
use crate::models::{canonical_pair, ConnectionRequest, Party, RequestRow, RequestStatus};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const REQUEST_COLUMNS: &str = "id, sender_id, receiver_id, status, created_at, updated_at";

fn into_requests(rows: Vec<RequestRow>) -> Result<Vec<ConnectionRequest>> {
    rows.into_iter().map(ConnectionRequest::try_from).collect()
}

fn status_names(statuses: &[RequestStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

// Ledger writes
pub async fn insert_request(
    pool: &PgPool,
    request: &ConnectionRequest,
) -> Result<InsertOutcome<ConnectionRequest>> {
    let (user_low, user_high) = request.pair();

    let row = sqlx::query_as::<_, RequestRow>(&format!(
        r#"
        INSERT INTO connection_requests
            (id, sender_id, receiver_id, user_low, user_high, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (user_low, user_high) DO NOTHING
        RETURNING {REQUEST_COLUMNS}
        "#
    ))
    .bind(request.id)
    .bind(request.sender_id)
    .bind(request.receiver_id)
    .bind(user_low)
    .bind(user_high)
    .bind(request.status.as_str())
    .bind(request.created_at)
    .bind(request.updated_at)
    .fetch_optional(pool)
    .await?;

    Ok(match row {
        Some(row) => InsertOutcome::Created(ConnectionRequest::try_from(row)?),
        None => InsertOutcome::Duplicate,
    })
}

pub async fn transition_request(
    pool: &PgPool,
    request_id: Uuid,
    from: RequestStatus,
    to: RequestStatus,
    at: DateTime<Utc>,
) -> Result<Option<ConnectionRequest>> {
    let row = sqlx::query_as::<_, RequestRow>(&format!(
        r#"
        UPDATE connection_requests
        SET status = $1, updated_at = $2
        WHERE id = $3 AND status = $4
        RETURNING {REQUEST_COLUMNS}
        "#
    ))
    .bind(to.as_str())
    .bind(at)
    .bind(request_id)
    .bind(from.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(ConnectionRequest::try_from).transpose()
}

// Ledger reads
pub async fn get_request_by_id(pool: &PgPool, request_id: Uuid) -> Result<Option<ConnectionRequest>> {
    let row = sqlx::query_as::<_, RequestRow>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM connection_requests WHERE id = $1"
    ))
    .bind(request_id)
    .fetch_optional(pool)
    .await?;

    row.map(ConnectionRequest::try_from).transpose()
}

pub async fn get_requests_for_user(
    pool: &PgPool,
    user_id: Uuid,
    role: Option<Party>,
    statuses: &[RequestStatus],
) -> Result<Vec<ConnectionRequest>> {
    let role_clause = match role {
        Some(Party::Sender) => "sender_id = $1",
        Some(Party::Receiver) => "receiver_id = $1",
        None => "(sender_id = $1 OR receiver_id = $1)",
    };

    let rows = sqlx::query_as::<_, RequestRow>(&format!(
        r#"
        SELECT {REQUEST_COLUMNS}
        FROM connection_requests
        WHERE {role_clause}
        AND (cardinality($2::text[]) = 0 OR status = ANY($2::text[]))
        ORDER BY created_at DESC, id DESC
        "#
    ))
    .bind(user_id)
    .bind(status_names(statuses))
    .fetch_all(pool)
    .await?;

    into_requests(rows)
}

pub async fn get_counterparts(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT CASE WHEN sender_id = $1 THEN receiver_id ELSE sender_id END
        FROM connection_requests
        WHERE sender_id = $1 OR receiver_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

pub async fn get_request_between(
    pool: &PgPool,
    user_a: Uuid,
    user_b: Uuid,
) -> Result<Option<ConnectionRequest>> {
    let (user_low, user_high) = canonical_pair(user_a, user_b);

    let row = sqlx::query_as::<_, RequestRow>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM connection_requests WHERE user_low = $1 AND user_high = $2"
    ))
    .bind(user_low)
    .bind(user_high)
    .fetch_optional(pool)
    .await?;

    row.map(ConnectionRequest::try_from).transpose()
}

// Audit queries

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

pub async fn count_requests_by_status(pool: &PgPool) -> Result<Vec<StatusCount>> {
    let counts = sqlx::query_as::<_, StatusCount>(
        r#"
        SELECT status, COUNT(*) AS count
        FROM connection_requests
        GROUP BY status
        ORDER BY status
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(counts)
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LedgerViolation {
    pub request_id: Uuid,
    pub problem: String,
}

/// Rows that break a ledger invariant. Empty on a healthy database.
pub async fn find_ledger_violations(pool: &PgPool) -> Result<Vec<LedgerViolation>> {
    let violations = sqlx::query_as::<_, LedgerViolation>(
        r#"
        SELECT id AS request_id, 'sender and receiver are the same user' AS problem
        FROM connection_requests
        WHERE sender_id = receiver_id
        UNION ALL
        SELECT id, 'pair columns do not match endpoints'
        FROM connection_requests
        WHERE user_low <> LEAST(sender_id, receiver_id)
           OR user_high <> GREATEST(sender_id, receiver_id)
        UNION ALL
        SELECT id, 'unknown status ' || status
        FROM connection_requests
        WHERE status NOT IN ('interested', 'ignored', 'accepted', 'rejected', 'withdrawn')
        UNION ALL
        SELECT r.id, 'endpoint missing from user directory'
        FROM connection_requests r
        LEFT JOIN users s ON s.id = r.sender_id
        LEFT JOIN users v ON v.id = r.receiver_id
        WHERE s.id IS NULL OR v.id IS NULL
        UNION ALL
        SELECT id, 'modified before it was created'
        FROM connection_requests
        WHERE updated_at < created_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(violations)
}
