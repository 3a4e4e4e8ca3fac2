pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtKeys};

use crate::error::{AuthError, OpResult};
use crate::store::{User, UserStore};

const BEARER_PREFIX: &str = "Bearer ";

/// Resolve the `Authorization` header to a user record.
///
/// Absent or non-Bearer header → `Unauthenticated`; bad signature/structure →
/// `InvalidToken`; past expiry → `TokenExpired`; a subject id that no longer
/// exists (deleted after issuance) → `InvalidToken`. Side-effect free.
pub async fn authenticate(
    users: &dyn UserStore,
    keys: &JwtKeys,
    authorization: Option<&str>,
) -> OpResult<User> {
    let header = authorization.ok_or(AuthError::Unauthenticated)?;
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::Unauthenticated)?;
    let claims = keys.verify(token)?;
    let user = users.find_by_id(claims.id).await?;
    Ok(user.ok_or(AuthError::InvalidToken)?)
}
