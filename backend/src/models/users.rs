use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub full_name: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What other users get to see of a directory record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: Uuid,
    pub user_name: String,
    pub full_name: String,
    pub bio: String,
    pub skills: Vec<String>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
            full_name: user.full_name,
            bio: user.bio,
            skills: user.skills,
        }
    }
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        user.clone().into()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub user_name: String,
    pub full_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
}
