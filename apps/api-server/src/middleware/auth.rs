//! Authentication extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::future::{Ready, ready};
use std::sync::Arc;

use quill_core::ports::{AuthError, TokenService};

use super::error::AppError;

/// Authenticated identity extractor.
///
/// Carries the login username the bearer token was issued for - the
/// immutable credential identity, not the current display name. Use this in
/// handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token_service = match req.app_data::<actix_web::web::Data<Arc<dyn TokenService>>>() {
            Some(service) => service,
            None => {
                tracing::error!("TokenService not found in app data");
                return ready(Err(AppError::Internal(
                    "Server configuration error".to_string(),
                )));
            }
        };

        // Extract "Bearer <token>" from the Authorization header.
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let token = match token {
            Some(t) => t,
            None => return ready(Err(AuthError::MissingAuth.into())),
        };

        // Any verification failure means "not authenticated", never a 500.
        match token_service.validate_token(token) {
            Ok(claims) => ready(Ok(Identity {
                username: claims.username,
            })),
            Err(e) => ready(Err(e.into())),
        }
    }
}
