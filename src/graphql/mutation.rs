use async_graphql::{Context, Object, Result, ID};

use super::types::{
    ChangeUserRolePayload, LoginUserPayload, RegisterUserPayload, RequestSessionPayload,
    RespondSessionPayload, SessionType,
};
use super::{caller, raise};
use crate::error::OpError;
use crate::sessions::service as sessions_service;
use crate::state::AppState;
use crate::users::service as users_service;
use crate::users::RegisterInput;

pub struct Mutation;

#[Object]
impl Mutation {
    /// Create an account. Expected failures (taken email, bad email format)
    /// come back as `success: false` with a message, not as errors.
    #[allow(clippy::too_many_arguments)]
    async fn register_user(
        &self,
        ctx: &Context<'_>,
        first_name: String,
        last_name: String,
        email: String,
        password: String,
        bio: Option<String>,
        address: Option<String>,
        occupation: Option<String>,
        expertise: Option<String>,
    ) -> Result<RegisterUserPayload> {
        let state = ctx.data_unchecked::<AppState>();
        let input = RegisterInput {
            first_name,
            last_name,
            email,
            password,
            bio,
            address,
            occupation,
            expertise,
        };
        match users_service::register(state.users.as_ref(), input).await {
            Ok(_) => Ok(RegisterUserPayload {
                success: true,
                message: "User registered successfully".into(),
            }),
            Err(OpError::Rejected(message)) => Ok(RegisterUserPayload {
                success: false,
                message: message.into(),
            }),
            Err(err) => Err(raise(err)),
        }
    }

    async fn login_user(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> Result<LoginUserPayload> {
        let state = ctx.data_unchecked::<AppState>();
        match users_service::login(state.users.as_ref(), &state.jwt, &email, &password).await {
            Ok(token) => Ok(LoginUserPayload {
                success: true,
                message: "Login successful".into(),
                token: Some(token),
            }),
            Err(OpError::Rejected(message)) => Ok(LoginUserPayload {
                success: false,
                message: message.into(),
                token: None,
            }),
            Err(err) => Err(raise(err)),
        }
    }

    /// Admin-only role change. A non-admin caller gets a reported
    /// `Unauthorized`, not a top-level error. Argument names are snake_case
    /// for compatibility with existing clients.
    async fn change_user_role(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "user_email")] user_email: String,
        #[graphql(name = "new_role")] new_role: String,
    ) -> Result<ChangeUserRolePayload> {
        let admin = caller(ctx).await.map_err(raise)?;
        let state = ctx.data_unchecked::<AppState>();
        match users_service::change_role(state.users.as_ref(), &admin, &user_email, &new_role).await
        {
            Ok(()) => Ok(ChangeUserRolePayload {
                success: true,
                message: "User role updated successfully".into(),
            }),
            Err(OpError::Rejected(message)) => Ok(ChangeUserRolePayload {
                success: false,
                message: message.into(),
            }),
            Err(err) => Err(raise(err)),
        }
    }

    /// Mentee-only. A caller whose role is not USER gets a top-level error;
    /// this asymmetry with the other mutations is intentional.
    async fn request_mentorship_session(
        &self,
        ctx: &Context<'_>,
        mentor_email: String,
        questions: Option<String>,
    ) -> Result<RequestSessionPayload> {
        let mentee = caller(ctx).await.map_err(raise)?;
        let state = ctx.data_unchecked::<AppState>();
        match sessions_service::request_session(
            state.users.as_ref(),
            state.sessions.as_ref(),
            &mentee,
            &mentor_email,
            questions,
        )
        .await
        {
            Ok(session) => Ok(RequestSessionPayload {
                success: true,
                message: "Mentorship session requested".into(),
                session: Some(SessionType::from(session)),
            }),
            Err(OpError::Rejected(message)) => Ok(RequestSessionPayload {
                success: false,
                message: message.into(),
                session: None,
            }),
            Err(err) => Err(raise(err)),
        }
    }

    /// Mentor-only; same raised role gate as `requestMentorshipSession`.
    /// A session id that does not parse or belongs to another mentor is
    /// reported as "Session not found" either way.
    async fn respond_to_mentorship_session(
        &self,
        ctx: &Context<'_>,
        session_id: ID,
        action: String,
    ) -> Result<RespondSessionPayload> {
        let mentor = caller(ctx).await.map_err(raise)?;
        let state = ctx.data_unchecked::<AppState>();
        match sessions_service::respond_to_session(
            state.sessions.as_ref(),
            &mentor,
            session_id.as_str(),
            &action,
        )
        .await
        {
            Ok(session) => Ok(RespondSessionPayload {
                success: true,
                message: "Mentorship session updated".into(),
                session: Some(SessionType::from(session)),
            }),
            Err(OpError::Rejected(message)) => Ok(RespondSessionPayload {
                success: false,
                message: message.into(),
                session: None,
            }),
            Err(err) => Err(raise(err)),
        }
    }
}
