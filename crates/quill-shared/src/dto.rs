//! Data Transfer Objects - request/response types for the API.
//!
//! Wire names are camelCase to match the JSON the frontend already speaks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Partial profile update; only provided fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub description: Option<String>,
    pub profile_image_base64: Option<String>,
}

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub published: Option<bool>,
}

/// Partial post update; only provided fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

/// Pagination query for the published-posts listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// A user profile as serialized to clients. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub username: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_base64: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post as serialized to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content: String,
    pub author: String,
    pub slug: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Successful registration/login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserDto,
}

/// Successful profile update response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub message: String,
    pub user: UserDto,
}

/// Single-post response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub success: bool,
    pub message: String,
    pub post: PostDto,
}

/// Post listing response: one page plus the total count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsListResponse {
    pub success: bool,
    pub message: String,
    pub posts: Vec<PostDto>,
    pub total: u64,
}

/// Bare confirmation response (e.g. for deletes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}
