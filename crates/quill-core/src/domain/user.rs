use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User profile - the author-facing record with the mutable display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub description: String,
    /// Base64-encoded profile image payload, if one was uploaded.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a new profile with generated id, empty description, and fresh timestamps.
    pub fn new(username: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            description: String::new(),
            image: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Credential record - the immutable login identity.
///
/// `username` here is the login identifier and never changes, even when the
/// profile's display name is later renamed. The two records are joined on
/// `user_id`, not on the username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    /// Create the credential paired with a freshly registered profile.
    ///
    /// Timestamps are copied from the profile so both records carry the same
    /// registration instant.
    pub fn for_profile(profile: &UserProfile, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: profile.id,
            username: profile.username.clone(),
            password_hash,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}
