//! Authentication handlers: registration, login, profile update.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use std::sync::Arc;

use quill_core::domain::{Credential, UserProfile};
use quill_core::ports::{PasswordService, TokenService};
use quill_shared::dto::{
    AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, UpdateProfileRequest, UserDto,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn user_dto(profile: UserProfile) -> UserDto {
    UserDto {
        username: profile.username,
        description: profile.description,
        profile_image_base64: profile.image,
        created_at: profile.created_at,
        updated_at: profile.updated_at,
    }
}

fn validate_username(username: &str) -> AppResult<()> {
    if username.chars().count() < 3 {
        return Err(AppError::BadRequest(
            "Username must be at least 3 characters long".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }
    validate_username(&req.username)?;
    if req.password.chars().count() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters long".to_string(),
        ));
    }

    // Check if the display name is already taken
    if state
        .users
        .find_profile_by_username(&req.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    // Hash password
    let password_hash = password_service.hash(&req.password)?;

    // Profile and credential share the same id join key and timestamps; the
    // repository inserts both atomically.
    let profile = UserProfile::new(req.username.clone());
    let credential = Credential::for_profile(&profile, password_hash);
    let saved = state.users.create_user(profile, credential).await?;

    let token = token_service.generate_token(&req.username)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        success: true,
        message: "User registered successfully".to_string(),
        token,
        user: user_dto(saved),
    }))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    // Unknown username and wrong password answer identically so neither case
    // confirms an account exists.
    let credential = state
        .users
        .find_credential_by_login(&req.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

    let valid = password_service.verify(&req.password, &credential.password_hash)?;
    if !valid {
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let profile = state
        .users
        .find_profile_by_user_id(credential.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let token = token_service.generate_token(&credential.username)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: user_dto(profile),
    }))
}

/// PUT /api/auth/profile - Protected route
///
/// The profile is resolved through the token's login username, so a renamed
/// display name never locks the account out of its own profile.
pub async fn update_profile(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let credential = state
        .users
        .find_credential_by_login(&identity.username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut profile = state
        .users
        .find_profile_by_user_id(credential.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if let Some(username) = req.username {
        validate_username(&username)?;
        if username != profile.username {
            if state
                .users
                .find_profile_by_username(&username)
                .await?
                .is_some()
            {
                return Err(AppError::Conflict("Username already exists".to_string()));
            }
            profile.username = username;
        }
    }

    if let Some(description) = req.description {
        profile.description = description.trim().to_string();
    }

    if let Some(image) = req.profile_image_base64 {
        profile.image = Some(image);
    }

    profile.updated_at = Utc::now();
    let updated = state.users.update_profile(profile).await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        success: true,
        message: "Profile updated successfully".to_string(),
        user: user_dto(updated),
    }))
}
