pub mod connections;
pub mod directory;
pub mod feed;
pub mod ledger;

pub use connections::ConnectionView;
pub use directory::UserDirectory;
pub use feed::{FeedGenerator, FeedPage};
pub use ledger::RequestLedger;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::db::{ConnectionStore, InsertOutcome};
    use crate::models::User;

    pub async fn seed_user(store: &dyn ConnectionStore, user_name: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            user_name: user_name.to_string(),
            full_name: format!("{user_name} Dev"),
            bio: String::new(),
            skills: vec!["Rust".to_string()],
            created_at: now,
            updated_at: now,
        };
        match store.insert_user(user).await.unwrap() {
            InsertOutcome::Created(user) => user,
            InsertOutcome::Duplicate => panic!("user name {user_name} already seeded"),
        }
    }
}
