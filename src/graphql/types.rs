use async_graphql::{ComplexObject, Context, Error, Result, SimpleObject, ID};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::state::AppState;
use crate::store::{MentorshipSession, User};

/// Public view of a user. The password hash never crosses this boundary.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User")]
pub struct UserType {
    pub id: ID,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Wire form of the role: USER, MENTOR or ADMIN.
    pub role: String,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub occupation: Option<String>,
    pub expertise: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<User> for UserType {
    fn from(user: User) -> Self {
        Self {
            id: ID(user.id.to_string()),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role.as_str().to_string(),
            bio: user.bio,
            address: user.address,
            occupation: user.occupation,
            expertise: user.expertise,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "MentorshipSession", complex)]
pub struct SessionType {
    pub id: ID,
    /// PENDING, ACCEPTED or REJECTED.
    pub status: String,
    pub questions: Option<String>,
    pub created_at: OffsetDateTime,
    #[graphql(skip)]
    pub mentor_id: Uuid,
    #[graphql(skip)]
    pub mentee_id: Uuid,
}

#[ComplexObject]
impl SessionType {
    async fn mentor(&self, ctx: &Context<'_>) -> Result<UserType> {
        resolve_participant(ctx, self.mentor_id).await
    }

    async fn mentee(&self, ctx: &Context<'_>) -> Result<UserType> {
        resolve_participant(ctx, self.mentee_id).await
    }
}

async fn resolve_participant(ctx: &Context<'_>, id: Uuid) -> Result<UserType> {
    let state = ctx.data_unchecked::<AppState>();
    let user = state
        .users
        .find_by_id(id)
        .await
        .map_err(|e| Error::new(e.to_string()))?
        .ok_or_else(|| Error::new("User not found"))?;
    Ok(user.into())
}

impl From<MentorshipSession> for SessionType {
    fn from(session: MentorshipSession) -> Self {
        Self {
            id: ID(session.id.to_string()),
            status: session.status.as_str().to_string(),
            questions: session.questions,
            created_at: session.created_at,
            mentor_id: session.mentor_id,
            mentee_id: session.mentee_id,
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct RegisterUserPayload {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, SimpleObject)]
pub struct LoginUserPayload {
    pub success: bool,
    pub message: String,
    pub token: Option<String>,
}

#[derive(Debug, SimpleObject)]
pub struct ChangeUserRolePayload {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, SimpleObject)]
pub struct RequestSessionPayload {
    pub success: bool,
    pub message: String,
    pub session: Option<SessionType>,
}

#[derive(Debug, SimpleObject)]
pub struct RespondSessionPayload {
    pub success: bool,
    pub message: String,
    pub session: Option<SessionType>,
}
