use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::jwt::{Claims, JwtKeys};
use crate::error::ApiError;

/// Extracts and validates the bearer token, yielding the caller's claims.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header".into()))?;

        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(_) => {
                warn!("invalid or expired token");
                Err(ApiError::Unauthorized("Invalid or expired token".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::{Role, User};
    use crate::state::AppState;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;
    use time::OffsetDateTime;

    fn state_and_token() -> (AppState, String) {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let user = User {
            id: 7,
            name: "user".into(),
            email: "user@gmail.com".into(),
            encrypted_password: "hash".into(),
            role_id: 1,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let role = Role {
            id: 1,
            name: "member".into(),
        };
        let token = keys.create_token_from_user(&user, &role).expect("sign");
        (state, token)
    }

    #[tokio::test]
    async fn extracts_claims_from_bearer_token() {
        let (state, token) = state_and_token();
        let request = Request::builder()
            .header("Authorization", format!("Bearer {token}"))
            .body(())
            .expect("request");
        let (mut parts, _) = request.into_parts();
        let AuthUser(claims) = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .expect("extract");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role.name, "member");
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let (state, _) = state_and_token();
        let request = Request::builder().body(()).expect("request");
        let (mut parts, _) = request.into_parts();
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("rejection");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_non_bearer_scheme() {
        let (state, token) = state_and_token();
        let request = Request::builder()
            .header("Authorization", format!("Token {token}"))
            .body(())
            .expect("request");
        let (mut parts, _) = request.into_parts();
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("rejection");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejection_uses_the_error_envelope() {
        let (state, _) = state_and_token();
        let request = Request::builder()
            .header("Authorization", "Bearer not-a-jwt")
            .body(())
            .expect("request");
        let (mut parts, _) = request.into_parts();
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("rejection");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["error"]["name"], "UnauthorizedError");
        assert_eq!(body["error"]["message"], "Invalid or expired token");
        assert_eq!(body["error"]["details"], serde_json::Value::Null);
    }
}
