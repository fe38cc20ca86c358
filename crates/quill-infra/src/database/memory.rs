//! In-memory repository implementations - used by tests and local runs
//! without a database. Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Credential, Post, UserProfile};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, UserRepository};

#[derive(Default)]
struct UserTables {
    profiles: HashMap<Uuid, UserProfile>,
    /// Keyed by the immutable login username.
    credentials: HashMap<String, Credential>,
}

/// In-memory user repository over a pair of HashMaps behind an async RwLock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    tables: RwLock<UserTables>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(
        &self,
        profile: UserProfile,
        credential: Credential,
    ) -> Result<UserProfile, RepoError> {
        let mut tables = self.tables.write().await;

        // Single write-lock scope stands in for the transaction the
        // Postgres repository uses.
        if tables.profiles.values().any(|p| p.username == profile.username)
            || tables.credentials.contains_key(&credential.username)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        tables.profiles.insert(profile.id, profile.clone());
        tables
            .credentials
            .insert(credential.username.clone(), credential);

        Ok(profile)
    }

    async fn find_profile_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserProfile>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .profiles
            .values()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn find_profile_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserProfile>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.get(&user_id).cloned())
    }

    async fn find_credential_by_login(
        &self,
        username: &str,
    ) -> Result<Option<Credential>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.credentials.get(username).cloned())
    }

    async fn update_profile(&self, profile: UserProfile) -> Result<UserProfile, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.profiles.contains_key(&profile.id) {
            return Err(RepoError::NotFound);
        }
        if tables
            .profiles
            .values()
            .any(|p| p.id != profile.id && p.username == profile.username)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        tables.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }
}

/// In-memory post repository.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.get(&id).cloned())
    }

    async fn insert(&self, entity: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;

        if posts.values().any(|p| p.slug == entity.slug) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        posts.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;

        if !posts.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        if posts
            .values()
            .any(|p| p.id != entity.id && p.slug == entity.slug)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        posts.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        posts.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_published(&self, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let mut published: Vec<Post> = posts.values().filter(|p| p.published).cloned().collect();
        newest_first(&mut published);

        Ok(published
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_published(&self) -> Result<u64, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.values().filter(|p| p.published).count() as u64)
    }

    async fn find_published_by_author(&self, author: &str) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let mut published: Vec<Post> = posts
            .values()
            .filter(|p| p.published && p.author == author)
            .cloned()
            .collect();
        newest_first(&mut published);

        Ok(published)
    }

    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts
            .values()
            .any(|p| p.slug == slug && Some(p.id) != exclude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(author: &str, slug: &str, published: bool) -> Post {
        Post::new(
            author.to_string(),
            "Title".to_string(),
            String::new(),
            "Content".to_string(),
            slug.to_string(),
            published,
        )
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_username() {
        let repo = InMemoryUserRepository::new();

        let profile = UserProfile::new("alice".to_string());
        let credential = Credential::for_profile(&profile, "hash".to_string());
        repo.create_user(profile, credential).await.unwrap();

        let again = UserProfile::new("alice".to_string());
        let credential = Credential::for_profile(&again, "hash".to_string());
        let result = repo.create_user(again, credential).await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_profile_rename_keeps_login_lookup() {
        let repo = InMemoryUserRepository::new();

        let profile = UserProfile::new("alice".to_string());
        let credential = Credential::for_profile(&profile, "hash".to_string());
        let mut profile = repo.create_user(profile, credential).await.unwrap();

        profile.username = "alice-renamed".to_string();
        repo.update_profile(profile.clone()).await.unwrap();

        // The credential record still answers to the original login name and
        // still points at the renamed profile.
        let credential = repo.find_credential_by_login("alice").await.unwrap().unwrap();
        let found = repo
            .find_profile_by_user_id(credential.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.username, "alice-renamed");
    }

    #[tokio::test]
    async fn test_unpublished_posts_are_filtered() {
        let repo = InMemoryPostRepository::new();
        repo.insert(post("alice", "a", true)).await.unwrap();
        repo.insert(post("alice", "b", false)).await.unwrap();

        assert_eq!(repo.count_published().await.unwrap(), 1);
        assert_eq!(repo.find_published(0, 10).await.unwrap().len(), 1);
        assert_eq!(
            repo.find_published_by_author("alice").await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_slug_exists_honors_exclusion() {
        let repo = InMemoryPostRepository::new();
        let existing = repo.insert(post("alice", "hello", true)).await.unwrap();

        assert!(repo.slug_exists("hello", None).await.unwrap());
        assert!(!repo.slug_exists("hello", Some(existing.id)).await.unwrap());
        assert!(!repo.slug_exists("other", None).await.unwrap());
    }
}
