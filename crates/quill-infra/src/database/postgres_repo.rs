//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Credential, Post, UserProfile};
use quill_core::error::RepoError;
use quill_core::ports::{PostRepository, UserRepository};

use super::entity::credential::{self, Entity as CredentialEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::profile::{self, Entity as ProfileEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_published(&self, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Published.eq(true))
            .order_by_desc(post::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_published(&self) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::Published.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn find_published_by_author(&self, author: &str) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Author.eq(author))
            .filter(post::Column::Published.eq(true))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, RepoError> {
        let mut query = PostEntity::find().filter(post::Column::Slug.eq(slug));
        if let Some(id) = exclude {
            query = query.filter(post::Column::Id.ne(id));
        }

        let existing = query
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(existing.is_some())
    }
}

/// PostgreSQL user repository spanning the profile and credential tables.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(
        &self,
        profile: UserProfile,
        credential: Credential,
    ) -> Result<UserProfile, RepoError> {
        let profile_model: profile::ActiveModel = profile.into();
        let credential_model: credential::ActiveModel = credential.into();

        // Both inserts commit or neither does; registration can't leave a
        // profile without its credential record.
        let created = self
            .db
            .transaction::<_, profile::Model, DbErr>(|txn| {
                Box::pin(async move {
                    let created = profile_model.insert(txn).await?;
                    credential_model.insert(txn).await?;
                    Ok(created)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => RepoError::Connection(e.to_string()),
                TransactionError::Transaction(e) => map_db_err(e),
            })?;

        Ok(created.into())
    }

    async fn find_profile_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserProfile>, RepoError> {
        tracing::debug!(username = %username, "Finding profile by display name");

        let result = ProfileEntity::find()
            .filter(profile::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn find_profile_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserProfile>, RepoError> {
        let result = ProfileEntity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn find_credential_by_login(
        &self,
        username: &str,
    ) -> Result<Option<Credential>, RepoError> {
        let result = CredentialEntity::find()
            .filter(credential::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn update_profile(&self, profile: UserProfile) -> Result<UserProfile, RepoError> {
        let active_model: profile::ActiveModel = profile.into();
        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => RepoError::NotFound,
            other => map_db_err(other),
        })?;

        Ok(model.into())
    }
}
