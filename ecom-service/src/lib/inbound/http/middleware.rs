use std::sync::Arc;

use auth::Authenticator;
use auth::JwtError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::middleware::{self};
use axum::response::Response;
use axum::Router;
use thiserror::Error;

use super::handlers::ApiError;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;

/// Reasons a request is refused by the gate, or identity is missing downstream.
///
/// Only the first four describe the caller; clients never see which one applied.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Missing or malformed bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    #[error("Token subject {0} does not match any user")]
    UnknownUser(UserId),

    #[error("Credential store failure: {0}")]
    StoreFailure(String),

    #[error("Identity requested on a route outside the auth gate")]
    ContractViolation,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::InvalidToken(_) | AuthError::UnknownUser(_) => {
                ApiError::Unauthorized
            }
            AuthError::StoreFailure(_) | AuthError::ContractViolation => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthGate {
    authenticator: Arc<Authenticator>,
    user_service: Arc<dyn UserServicePort>,
}

impl AuthGate {
    pub fn new(authenticator: Arc<Authenticator>, user_service: Arc<dyn UserServicePort>) -> Self {
        Self {
            authenticator,
            user_service,
        }
    }

    /// Resolve the caller behind the request headers.
    ///
    /// # Errors
    /// * `MissingToken` - No usable `Authorization: Bearer` header
    /// * `InvalidToken` - Token failed verification or its subject is not a user ID
    /// * `UnknownUser` - Subject does not exist in the credential store
    /// * `StoreFailure` - Credential store lookup failed
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<User, AuthError> {
        let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
        let subject = self.authenticator.verify_token(token)?;

        let user_id = UserId::from_string(&subject).map_err(|e| {
            AuthError::InvalidToken(JwtError::Malformed(format!("subject: {}", e)))
        })?;

        match self.user_service.get_user(&user_id).await {
            Ok(user) => Ok(user),
            Err(UserError::NotFound(_)) => Err(AuthError::UnknownUser(user_id)),
            Err(e) => Err(AuthError::StoreFailure(e.to_string())),
        }
    }
}

/// Wrap every route of `router` behind the auth gate.
pub fn protect<S>(router: Router<S>, gate: AuthGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(gate, authenticate))
}

/// Middleware that resolves the bearer token to a [`User`] and stores it as [`CurrentUser`].
pub async fn authenticate(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = gate.resolve(req.headers()).await.map_err(|err| {
        let error = ApiError::from(err.clone());
        // Store failures are logged with full detail when the 500 is rendered.
        if error == ApiError::Unauthorized {
            tracing::warn!(
                reason = %err,
                method = %req.method(),
                uri = %req.uri(),
                "Request rejected by auth gate"
            );
        }
        error
    })?;

    tracing::debug!(user_id = %user.id, "Request authenticated");
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Authenticated caller, available to handlers mounted behind [`protect`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!(uri = %parts.uri, "CurrentUser extracted without auth gate");
                ApiError::from(AuthError::ContractViolation)
            })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
