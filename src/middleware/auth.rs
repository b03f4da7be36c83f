use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use edugate_auth::{Claims, Role, verify_token};
use edugate_core::AppError;
use uuid::Uuid;

use crate::state::AppState;

/// Identity attached to the request by [`authenticate`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Uuid {
        self.0.sub
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn is_admin(&self) -> bool {
        self.0.role == Role::Admin
    }
}

/// Reads the identity left in request extensions by [`authenticate`].
///
/// Only usable on routes whose policy requires authentication; on a public
/// route it always rejects with 401.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(AppError::unauthorized)
    }
}

/// Verifies `Authorization: Bearer <token>` and attaches [`AuthUser`].
///
/// Every failure yields the same 401 body; the cause is only logged.
pub async fn authenticate(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match bearer {
        Ok(TypedHeader(Authorization(bearer))) => bearer,
        Err(rejection) => {
            tracing::debug!(reason = %rejection, "rejected request without usable bearer token");
            return AppError::unauthorized().into_response();
        }
    };

    match verify_token(token.token(), &state.jwt_config) {
        Ok(claims) => {
            req.extensions_mut().insert(AuthUser(claims));
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(reason = %err, "rejected bearer token");
            AppError::unauthorized().into_response()
        }
    }
}
