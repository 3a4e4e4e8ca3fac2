use async_graphql::{Context, Error, Object, Result};

use super::types::{SessionType, UserType};
use super::{caller, raise};
use crate::sessions::service as sessions_service;
use crate::state::AppState;
use crate::store::Role;
use crate::users::service as users_service;

pub struct Query;

#[Object]
impl Query {
    /// All user profiles, optionally filtered by role. Requires no
    /// authentication.
    async fn all_users(&self, ctx: &Context<'_>, role: Option<String>) -> Result<Vec<UserType>> {
        let state = ctx.data_unchecked::<AppState>();
        let filter = match role {
            Some(value) => Some(
                value
                    .parse::<Role>()
                    .map_err(|_| Error::new("Invalid role"))?,
            ),
            None => None,
        };
        let users = state
            .users
            .list(filter)
            .await
            .map_err(|e| Error::new(e.to_string()))?;
        Ok(users.into_iter().map(UserType::from).collect())
    }

    /// The authenticated caller's own profile.
    async fn current_user(&self, ctx: &Context<'_>) -> Result<UserType> {
        let user = caller(ctx).await.map_err(raise)?;
        Ok(user.into())
    }

    /// A mentor's public profile by email.
    async fn mentor_profile(&self, ctx: &Context<'_>, email: String) -> Result<UserType> {
        let state = ctx.data_unchecked::<AppState>();
        let mentor = users_service::mentor_profile(state.users.as_ref(), &email)
            .await
            .map_err(raise)?;
        Ok(mentor.into())
    }

    /// Sessions belonging to the caller: as mentor for mentors, as mentee
    /// for everyone else.
    async fn my_mentorship_sessions(&self, ctx: &Context<'_>) -> Result<Vec<SessionType>> {
        let user = caller(ctx).await.map_err(raise)?;
        let state = ctx.data_unchecked::<AppState>();
        let sessions = sessions_service::sessions_for(state.sessions.as_ref(), &user)
            .await
            .map_err(raise)?;
        Ok(sessions.into_iter().map(SessionType::from).collect())
    }
}
