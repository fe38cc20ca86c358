use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog post owned by the author who created it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content: String,
    /// Login username of the author at creation time.
    pub author: String,
    /// URL-safe identifier derived from the title, unique across all posts.
    pub slug: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with generated id and fresh timestamps.
    pub fn new(
        author: String,
        title: String,
        description: String,
        content: String,
        slug: String,
        published: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            content,
            author,
            slug,
            published,
            created_at: now,
            updated_at: now,
        }
    }
}
