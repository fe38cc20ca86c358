//! Handler-level tests running the full route tree against the in-memory
//! repositories.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use quill_core::ports::{PasswordService, TokenService};
use quill_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
use quill_infra::database::{InMemoryPostRepository, InMemoryUserRepository};

use crate::handlers::configure_routes;
use crate::state::AppState;

fn test_state() -> AppState {
    AppState {
        users: Arc::new(InMemoryUserRepository::new()),
        posts: Arc::new(InMemoryPostRepository::new()),
    }
}

fn token_service() -> Arc<dyn TokenService> {
    Arc::new(JwtTokenService::new(JwtConfig {
        secret: "test-secret-key".to_string(),
        expiration_days: 7,
    }))
}

macro_rules! test_app {
    ($state:expr) => {{
        let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .app_data(web::Data::new(token_service()))
                .app_data(web::Data::new(password_service))
                .app_data(crate::json_config())
                .app_data(crate::query_config())
                .configure(configure_routes),
        )
        .await
    }};
}

/// Register a user through the API and return the issued token.
macro_rules! register_user {
    ($app:expr, $username:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"username": $username, "password": "password1"}))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body["token"].as_str().unwrap().to_string()
    }};
}

/// Create a post through the API and return its JSON representation.
macro_rules! create_post {
    ($app:expr, $token:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", $token)))
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body["post"].clone()
    }};
}

#[actix_web::test]
async fn register_twice_yields_conflict() {
    let app = test_app!(test_state());

    register_user!(app, "alice");

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"username": "alice", "password": "password1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Username already exists"));
}

#[actix_web::test]
async fn register_validates_lengths() {
    let app = test_app!(test_state());

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"username": "ab", "password": "password1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"username": "alice", "password": "short"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn login_failures_are_indistinguishable() {
    let app = test_app!(test_state());
    register_user!(app, "alice");

    let wrong_password = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "alice", "password": "not-the-password"}))
        .to_request();
    let resp = test::call_service(&app, wrong_password).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong_password_body: Value = test::read_body_json(resp).await;

    let unknown_user = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "nobody", "password": "password1"}))
        .to_request();
    let resp = test::call_service(&app, unknown_user).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let unknown_user_body: Value = test::read_body_json(resp).await;

    // Identical body either way; neither case confirms the account exists.
    assert_eq!(wrong_password_body, unknown_user_body);
    assert_eq!(
        wrong_password_body["message"],
        json!("Invalid username or password")
    );
}

#[actix_web::test]
async fn create_requires_valid_token() {
    let app = test_app!(test_state());

    let missing = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({"title": "T", "content": "C"}))
        .to_request();
    let resp = test::call_service(&app, missing).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Token signed with a different secret fails verification.
    let forger = JwtTokenService::new(JwtConfig {
        secret: "some-other-secret".to_string(),
        expiration_days: 7,
    });
    let forged = forger.generate_token("alice").unwrap();
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, format!("Bearer {forged}")))
        .set_json(json!({"title": "T", "content": "C"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_then_fetch_round_trips() {
    let app = test_app!(test_state());
    let token = register_user!(app, "alice");

    let created = create_post!(
        app,
        token,
        json!({
            "title": "My First Post",
            "description": "A short summary",
            "content": "Hello readers",
            "published": true
        })
    );

    let id = created["id"].as_str().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let fetched = &body["post"];

    assert_eq!(fetched["title"], json!("My First Post"));
    assert_eq!(fetched["description"], json!("A short summary"));
    assert_eq!(fetched["content"], json!("Hello readers"));
    assert_eq!(fetched["published"], json!(true));
    assert_eq!(fetched["author"], json!("alice"));
    assert_eq!(fetched["slug"], json!("my-first-post"));
}

#[actix_web::test]
async fn colliding_titles_get_numbered_slugs() {
    let app = test_app!(test_state());
    let token = register_user!(app, "alice");

    let first = create_post!(
        app,
        token,
        json!({"title": "Hello, World!", "content": "one", "published": true})
    );
    let second = create_post!(
        app,
        token,
        json!({"title": "Hello World", "content": "two", "published": true})
    );

    assert_eq!(first["slug"], json!("hello-world"));
    assert_eq!(second["slug"], json!("hello-world-1"));
}

#[actix_web::test]
async fn drafts_are_invisible_to_readers() {
    let app = test_app!(test_state());
    let token = register_user!(app, "alice");

    let draft = create_post!(
        app,
        token,
        json!({"title": "Secret Draft", "content": "wip"})
    );
    let id = draft["id"].as_str().unwrap();

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], json!(0));
    assert_eq!(body["posts"].as_array().unwrap().len(), 0);

    let req = test::TestRequest::get()
        .uri("/api/posts/user/alice")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], json!(0));

    // By-id read answers the same 404 as a missing post.
    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], json!("Post not found"));
}

#[actix_web::test]
async fn only_the_author_can_modify_a_post() {
    let app = test_app!(test_state());
    let alice = register_user!(app, "alice");
    let bob = register_user!(app, "bob");

    let post = create_post!(
        app,
        alice,
        json!({"title": "Alice's Post", "content": "hers", "published": true})
    );
    let id = post["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{id}"))
        .insert_header((header::AUTHORIZATION, format!("Bearer {bob}")))
        .set_json(json!({"title": "Bob's now"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{id}"))
        .insert_header((header::AUTHORIZATION, format!("Bearer {bob}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The author still can.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{id}"))
        .insert_header((header::AUTHORIZATION, format!("Bearer {alice}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn pagination_returns_remainder_and_total() {
    let app = test_app!(test_state());
    let token = register_user!(app, "alice");

    for n in 1..=15 {
        create_post!(
            app,
            token,
            json!({"title": format!("Post {n}"), "content": "body", "published": true})
        );
    }

    let req = test::TestRequest::get()
        .uri("/api/posts?page=2&limit=10")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], json!(15));
    assert_eq!(body["posts"].as_array().unwrap().len(), 5);
}

#[actix_web::test]
async fn malformed_ids_and_bodies_are_rejected() {
    let app = test_app!(test_state());

    let req = test::TestRequest::get()
        .uri("/api/posts/not-a-uuid")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], json!("Invalid post ID"));

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], json!("Invalid JSON format"));
}

#[actix_web::test]
async fn profile_rename_keeps_login_identity() {
    let app = test_app!(test_state());
    let alice = register_user!(app, "alice");
    register_user!(app, "bob");

    let req = test::TestRequest::put()
        .uri("/api/auth/profile")
        .insert_header((header::AUTHORIZATION, format!("Bearer {alice}")))
        .set_json(json!({"description": "I write things"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["description"], json!("I write things"));

    // Renaming onto another user's display name collides.
    let req = test::TestRequest::put()
        .uri("/api/auth/profile")
        .insert_header((header::AUTHORIZATION, format!("Bearer {alice}")))
        .set_json(json!({"username": "bob"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::put()
        .uri("/api/auth/profile")
        .insert_header((header::AUTHORIZATION, format!("Bearer {alice}")))
        .set_json(json!({"username": "wonderland"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["username"], json!("wonderland"));

    // The token is bound to the login name, which didn't change: the same
    // token still reaches the renamed profile, and login still uses "alice".
    let req = test::TestRequest::put()
        .uri("/api/auth/profile")
        .insert_header((header::AUTHORIZATION, format!("Bearer {alice}")))
        .set_json(json!({"description": "still me"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["username"], json!("wonderland"));
    assert_eq!(body["user"]["description"], json!("still me"));

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "alice", "password": "password1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["username"], json!("wonderland"));
}
