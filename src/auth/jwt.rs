use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::AuthError;
use crate::store::{Role, User};

/// Token payload. The field names are part of the wire contract: clients
/// decode the token body and read the camelCase names directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

/// HS256 signing/verification keys derived from the configured secret.
/// Constructed once from config and passed around explicitly.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::hours(config.ttl_hours),
        }
    }

    /// Issue a token for a verified user, expiring `ttl` from now.
    pub fn issue(&self, user: &User) -> anyhow::Result<String> {
        let exp = OffsetDateTime::now_utc() + self.ttl;
        let token = self.sign(user, exp)?;
        debug!(user_id = %user.id, "token issued");
        Ok(token)
    }

    fn sign(&self, user: &User, exp: OffsetDateTime) -> anyhow::Result<String> {
        let claims = Claims {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role,
            exp: exp.unix_timestamp() as usize,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Decode and verify signature + expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data =
            decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })?;
        debug!(user_id = %data.claims.id, "token verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: "unit-test-secret".into(),
            ttl_hours: 24,
        })
    }

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: "grace@example.com".into(),
            password_hash: String::new(),
            bio: None,
            address: None,
            occupation: None,
            expertise: None,
            role: Role::Mentor,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn issued_token_carries_identity_and_role() {
        let keys = keys();
        let user = sample_user();
        let token = keys.issue(&user).expect("issue");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.first_name, "Grace");
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Mentor);
    }

    #[test]
    fn fresh_token_is_valid_well_within_ttl() {
        // One hour into a 24-hour window.
        let keys = keys();
        let user = sample_user();
        let exp = OffsetDateTime::now_utc() + Duration::hours(23);
        let token = keys.sign(&user, exp).expect("sign");
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        // 25 hours after issuance of a 24-hour token.
        let keys = keys();
        let user = sample_user();
        let exp = OffsetDateTime::now_utc() - Duration::hours(1);
        let token = keys.sign(&user, exp).expect("sign");
        assert_eq!(keys.verify(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn garbage_token_is_invalid_not_expired() {
        assert_eq!(
            keys().verify("not.a.token"),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = JwtKeys::new(&JwtConfig {
            secret: "some-other-secret".into(),
            ttl_hours: 24,
        });
        let token = other.issue(&sample_user()).expect("issue");
        assert_eq!(keys().verify(&token), Err(AuthError::InvalidToken));
    }
}
