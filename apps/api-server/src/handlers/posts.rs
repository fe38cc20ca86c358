//! Post CRUD handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use quill_core::domain::Post;
use quill_core::domain::slug::{slugify, unique_slug};
use quill_shared::dto::{
    CreatePostRequest, ListPostsQuery, MessageResponse, PostDto, PostResponse, PostsListResponse,
    UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_TITLE_CHARS: usize = 200;
const MAX_DESCRIPTION_CHARS: usize = 300;
const MAX_CONTENT_CHARS: usize = 50_000;

fn post_dto(post: Post) -> PostDto {
    PostDto {
        id: post.id,
        title: post.title,
        description: post.description,
        content: post.content,
        author: post.author,
        slug: post.slug,
        published: post.published,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn parse_post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid post ID".to_string()))
}

fn validate_title(title: &str) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::BadRequest(
            "Title must be 200 characters or less".to_string(),
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> AppResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(AppError::BadRequest(
            "Description must be 300 characters or less".to_string(),
        ));
    }
    Ok(())
}

fn validate_content(content: &str) -> AppResult<()> {
    if content.trim().is_empty() {
        return Err(AppError::BadRequest("Content is required".to_string()));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(AppError::BadRequest(
            "Content must be 50,000 characters or less".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/posts - published posts, newest first, paginated.
pub async fn list_published(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).max(1);
    let offset = (page - 1) * limit;

    let posts = state.posts.find_published(offset, limit).await?;
    let total = state.posts.count_published().await?;

    Ok(HttpResponse::Ok().json(PostsListResponse {
        success: true,
        message: "Posts retrieved successfully".to_string(),
        posts: posts.into_iter().map(post_dto).collect(),
        total,
    }))
}

/// GET /api/posts/user/{username} - published posts by one author.
pub async fn list_by_author(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();

    let posts = state.posts.find_published_by_author(&username).await?;
    let total = posts.len() as u64;

    Ok(HttpResponse::Ok().json(PostsListResponse {
        success: true,
        message: format!("Posts by {} retrieved successfully", username),
        posts: posts.into_iter().map(post_dto).collect(),
        total,
    }))
}

/// GET /api/posts/{id} - single published post.
///
/// A draft answers the same 404 as a missing id so the existence of private
/// drafts never leaks.
pub async fn get_by_id(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .filter(|post| post.published)
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    Ok(HttpResponse::Ok().json(PostResponse {
        success: true,
        message: "Post retrieved successfully".to_string(),
        post: post_dto(post),
    }))
}

/// POST /api/posts - create a post (authenticated).
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validate_title(&req.title)?;
    let description = req.description.unwrap_or_default();
    validate_description(&description)?;
    validate_content(&req.content)?;

    let slug = unique_slug(state.posts.as_ref(), &slugify(&req.title), None).await?;

    let post = Post::new(
        identity.username,
        req.title.trim().to_string(),
        description.trim().to_string(),
        req.content.trim().to_string(),
        slug,
        req.published.unwrap_or(false),
    );

    let created = state.posts.insert(post).await?;

    Ok(HttpResponse::Created().json(PostResponse {
        success: true,
        message: "Post created successfully".to_string(),
        post: post_dto(created),
    }))
}

/// PUT /api/posts/{id} - partial update (author only).
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let req = body.into_inner();

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.author != identity.username {
        return Err(AppError::Forbidden(
            "Not authorized to edit this post".to_string(),
        ));
    }

    if let Some(title) = req.title {
        validate_title(&title)?;
        let title = title.trim().to_string();
        // A changed title gets a fresh slug; the post's own id is excluded
        // from the collision probe.
        if title != post.title {
            post.slug = unique_slug(state.posts.as_ref(), &slugify(&title), Some(post.id)).await?;
        }
        post.title = title;
    }

    if let Some(description) = req.description {
        validate_description(&description)?;
        post.description = description.trim().to_string();
    }

    if let Some(content) = req.content {
        validate_content(&content)?;
        post.content = content.trim().to_string();
    }

    if let Some(published) = req.published {
        post.published = published;
    }

    post.updated_at = Utc::now();
    let updated = state.posts.update(post).await?;

    Ok(HttpResponse::Ok().json(PostResponse {
        success: true,
        message: "Post updated successfully".to_string(),
        post: post_dto(updated),
    }))
}

/// DELETE /api/posts/{id} - permanent removal (author only).
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.author != identity.username {
        return Err(AppError::Forbidden(
            "Not authorized to delete this post".to_string(),
        ));
    }

    state.posts.delete(id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: "Post deleted successfully".to_string(),
    }))
}
