use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::constants::{
    is_valid_user_name, BIO_CHAR_LIMIT, MAX_FULL_NAME_LENGTH, MAX_SKILLS,
    MAX_USER_NAME_LENGTH, MIN_USER_NAME_LENGTH,
};
use crate::db::{ConnectionStore, InsertOutcome};
use crate::error::{ConnectError, ConnectResult};
use crate::models::{NewUser, User};

/// Registration and lookup of user records.
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn ConnectionStore>,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn ConnectionStore>) -> Self {
        Self { store }
    }

    pub async fn register(&self, new_user: NewUser) -> ConnectResult<User> {
        let user = validate_new_user(new_user)?;

        match self.store.insert_user(user).await? {
            InsertOutcome::Created(user) => {
                tracing::info!(user_id = %user.id, user_name = %user.user_name, "Registered user");
                Ok(user)
            }
            InsertOutcome::Duplicate => Err(ConnectError::conflict("User name is already taken")),
        }
    }

    pub async fn find(&self, user_id: Uuid) -> ConnectResult<Option<User>> {
        Ok(self.store.get_user(user_id).await?)
    }

    pub async fn get(&self, user_id: Uuid) -> ConnectResult<User> {
        self.find(user_id)
            .await?
            .ok_or_else(|| ConnectError::not_found("User not found"))
    }
}

fn validate_new_user(new_user: NewUser) -> ConnectResult<User> {
    let user_name = new_user.user_name.trim().to_string();
    if !is_valid_user_name(&user_name) {
        return Err(ConnectError::InvalidInput(format!(
            "User name must be {}-{} letters, digits, '.', '_' or '-'",
            MIN_USER_NAME_LENGTH, MAX_USER_NAME_LENGTH
        )));
    }

    let full_name = new_user.full_name.trim().to_string();
    if full_name.is_empty() || full_name.chars().count() > MAX_FULL_NAME_LENGTH {
        return Err(ConnectError::InvalidInput(format!(
            "Full name must be between 1 and {} characters",
            MAX_FULL_NAME_LENGTH
        )));
    }

    let bio = new_user.bio.trim().to_string();
    if bio.chars().count() > BIO_CHAR_LIMIT {
        return Err(ConnectError::InvalidInput(format!(
            "Bio cannot exceed {} characters",
            BIO_CHAR_LIMIT
        )));
    }

    let mut skills: Vec<String> = Vec::new();
    for skill in new_user.skills {
        let skill = skill.trim();
        if !skill.is_empty() && !skills.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            skills.push(skill.to_string());
        }
    }
    if skills.len() > MAX_SKILLS {
        return Err(ConnectError::InvalidInput(format!(
            "At most {} skills can be listed",
            MAX_SKILLS
        )));
    }

    let now = Utc::now();
    Ok(User {
        id: Uuid::new_v4(),
        user_name,
        full_name,
        bio,
        skills,
        created_at: now,
        updated_at: now,
    })
}
