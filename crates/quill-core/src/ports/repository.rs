use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Credential, Post, UserProfile};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Update an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Repository over the paired profile and credential records.
///
/// Registration writes both records; the seam owns the pairing so the
/// storage layer can make it atomic.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Atomically insert a profile and its credential record.
    async fn create_user(
        &self,
        profile: UserProfile,
        credential: Credential,
    ) -> Result<UserProfile, RepoError>;

    /// Find a profile by its current display username.
    async fn find_profile_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserProfile>, RepoError>;

    /// Find a profile by the stable id its credential record points at.
    async fn find_profile_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserProfile>, RepoError>;

    /// Find a credential record by its immutable login username.
    async fn find_credential_by_login(
        &self,
        username: &str,
    ) -> Result<Option<Credential>, RepoError>;

    /// Persist profile mutations.
    async fn update_profile(&self, profile: UserProfile) -> Result<UserProfile, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Published posts, newest first, sliced by offset/limit.
    async fn find_published(&self, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// Total number of published posts.
    async fn count_published(&self) -> Result<u64, RepoError>;

    /// Published posts by one author, newest first.
    async fn find_published_by_author(&self, author: &str) -> Result<Vec<Post>, RepoError>;

    /// Whether a slug is already taken, optionally ignoring one post.
    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, RepoError>;
}
