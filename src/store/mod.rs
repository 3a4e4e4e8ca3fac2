use async_trait::async_trait;
use uuid::Uuid;

pub mod memory;
pub mod pg;
mod types;

pub use memory::MemoryStore;
pub use pg::PgStore;
pub use types::{
    MentorshipSession, NewSession, NewUser, Role, SessionStatus, User,
};

/// Credential store: user records keyed by id and unique email.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> anyhow::Result<User>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn set_role(&self, id: Uuid, role: Role) -> anyhow::Result<()>;
    /// All users, optionally narrowed to one role.
    async fn list(&self, role: Option<Role>) -> anyhow::Result<Vec<User>>;
}

/// Session store: mentorship sessions referencing two users.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: NewSession) -> anyhow::Result<MentorshipSession>;
    /// Lookup with the ownership check folded in: returns the session only
    /// when `mentor_id` matches, so a foreign session is indistinguishable
    /// from a missing one.
    async fn find_for_mentor(
        &self,
        id: Uuid,
        mentor_id: Uuid,
    ) -> anyhow::Result<Option<MentorshipSession>>;
    async fn set_status(&self, id: Uuid, status: SessionStatus) -> anyhow::Result<()>;
    async fn list_for_mentor(&self, mentor_id: Uuid) -> anyhow::Result<Vec<MentorshipSession>>;
    async fn list_for_mentee(&self, mentee_id: Uuid) -> anyhow::Result<Vec<MentorshipSession>>;
}
