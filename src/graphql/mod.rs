mod mutation;
mod query;
mod types;

pub use mutation::Mutation;
pub use query::Query;
pub use types::{SessionType, UserType};

use async_graphql::{Context, EmptySubscription, Error, Schema};

use crate::auth;
use crate::error::{OpError, OpResult};
use crate::state::AppState;
use crate::store::User;

pub type AppSchema = Schema<Query, Mutation, EmptySubscription>;

/// Raw `Authorization` header, injected per-request by the axum handler.
pub struct AuthHeader(pub Option<String>);

pub fn build_schema(state: AppState) -> AppSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(state)
        .finish()
}

/// Run the authentication gate for the current request.
pub(crate) async fn caller(ctx: &Context<'_>) -> OpResult<User> {
    let state = ctx.data_unchecked::<AppState>();
    let header = ctx
        .data_opt::<AuthHeader>()
        .and_then(|h| h.0.as_deref());
    auth::authenticate(state.users.as_ref(), &state.jwt, header).await
}

/// Convert a raised failure into a top-level GraphQL error. Reported
/// (`Rejected`) failures never reach this in mutations; in queries, which
/// have no result envelope, they degrade to top-level errors too.
pub(crate) fn raise(err: OpError) -> Error {
    Error::new(err.to_string())
}
