use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::auth::repo::{Role, User};
use crate::config::JwtConfig;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleClaim {
    pub id: i32,
    pub name: String,
}

/// Token payload asserting user identity and role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user ID
    pub name: String,
    pub email: String,
    pub role: RoleClaim,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            ttl: Duration::from_secs((ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    /// Signs a token carrying the user's identity and role. Deterministic
    /// given the same user, role, secret and issue instant.
    pub fn create_token_from_user(&self, user: &User, role: &Role) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: RoleClaim {
                id: role.id,
                name: role.name.clone(),
            },
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = user.id, role = %role.name, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::fake())
    }

    fn sample_user() -> User {
        User {
            id: 1,
            name: "user".into(),
            email: "user@gmail.com".into(),
            encrypted_password: "hash".into(),
            role_id: 1,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn member_role() -> Role {
        Role {
            id: 1,
            name: "member".into(),
        }
    }

    #[tokio::test]
    async fn token_roundtrips_user_identity_and_role() {
        let keys = make_keys();
        let token = keys
            .create_token_from_user(&sample_user(), &member_role())
            .expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.name, "user");
        assert_eq!(claims.email, "user@gmail.com");
        assert_eq!(claims.role, member_role_claim());
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    fn member_role_claim() -> RoleClaim {
        RoleClaim {
            id: 1,
            name: "member".into(),
        }
    }

    #[tokio::test]
    async fn identical_input_yields_identical_identity_claims() {
        let keys = make_keys();
        let user = sample_user();
        let role = member_role();
        let a = keys.create_token_from_user(&user, &role).expect("sign a");
        let b = keys.create_token_from_user(&user, &role).expect("sign b");
        let ca = keys.verify(&a).expect("verify a");
        let cb = keys.verify(&b).expect("verify b");
        assert_eq!(ca.sub, cb.sub);
        assert_eq!(ca.email, cb.email);
        assert_eq!(ca.role, cb.role);
    }

    #[tokio::test]
    async fn verify_rejects_token_signed_with_other_secret() {
        let keys = make_keys();
        let mut other = make_keys();
        other.encoding = EncodingKey::from_secret(b"other-secret");
        let token = other
            .create_token_from_user(&sample_user(), &member_role())
            .expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_garbage() {
        let keys = make_keys();
        assert!(keys.verify("not-a-jwt").is_err());
    }
}
