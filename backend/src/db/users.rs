use crate::db::store::InsertOutcome;
use crate::models::User;
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, user_name, full_name, bio, skills, created_at, updated_at";

// User operations
pub async fn create_user(pool: &PgPool, user: &User) -> Result<InsertOutcome<User>> {
    let created = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, user_name, full_name, bio, skills, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (user_name) DO NOTHING
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(user.id)
    .bind(&user.user_name)
    .bind(&user.full_name)
    .bind(&user.bio)
    .bind(&user.skills)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_optional(pool)
    .await?;

    Ok(match created {
        Some(user) => InsertOutcome::Created(user),
        None => InsertOutcome::Duplicate,
    })
}

pub async fn get_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_users_by_ids(pool: &PgPool, user_ids: &[Uuid]) -> Result<Vec<User>> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1) ORDER BY created_at, id"
    ))
    .bind(user_ids)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn list_users_excluding(
    pool: &PgPool,
    exclude: &[Uuid],
    offset: u64,
    limit: u64,
) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE NOT (id = ANY($1))
        ORDER BY created_at ASC, id ASC
        OFFSET $2
        LIMIT $3
        "#
    ))
    .bind(exclude)
    .bind(i64::try_from(offset)?)
    .bind(i64::try_from(limit)?)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn count_users(pool: &PgPool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
