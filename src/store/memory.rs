use std::sync::Mutex;

use anyhow::bail;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    MentorshipSession, NewSession, NewUser, Role, SessionStatus, SessionStore, User, UserStore,
};

/// In-memory store used by unit and schema tests. Enforces the same email
/// uniqueness the database does so duplicate races fail loudly here too.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    sessions: Mutex<Vec<MentorshipSession>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let mut users = self.users.lock().expect("user store lock");
        if users.iter().any(|u| u.email == user.email) {
            bail!("duplicate email {}", user.email);
        }
        let user = User {
            id: Uuid::new_v4(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            bio: user.bio,
            address: user.address,
            occupation: user.occupation,
            expertise: user.expertise,
            role: user.role,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().expect("user store lock");
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().expect("user store lock");
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> anyhow::Result<()> {
        let mut users = self.users.lock().expect("user store lock");
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.role = role;
        }
        Ok(())
    }

    async fn list(&self, role: Option<Role>) -> anyhow::Result<Vec<User>> {
        let users = self.users.lock().expect("user store lock");
        Ok(users
            .iter()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, session: NewSession) -> anyhow::Result<MentorshipSession> {
        let session = MentorshipSession {
            id: Uuid::new_v4(),
            mentor_id: session.mentor_id,
            mentee_id: session.mentee_id,
            status: SessionStatus::Pending,
            questions: session.questions,
            created_at: OffsetDateTime::now_utc(),
        };
        let mut sessions = self.sessions.lock().expect("session store lock");
        sessions.push(session.clone());
        Ok(session)
    }

    async fn find_for_mentor(
        &self,
        id: Uuid,
        mentor_id: Uuid,
    ) -> anyhow::Result<Option<MentorshipSession>> {
        let sessions = self.sessions.lock().expect("session store lock");
        Ok(sessions
            .iter()
            .find(|s| s.id == id && s.mentor_id == mentor_id)
            .cloned())
    }

    async fn set_status(&self, id: Uuid, status: SessionStatus) -> anyhow::Result<()> {
        let mut sessions = self.sessions.lock().expect("session store lock");
        if let Some(session) = sessions.iter_mut().find(|s| s.id == id) {
            session.status = status;
        }
        Ok(())
    }

    async fn list_for_mentor(&self, mentor_id: Uuid) -> anyhow::Result<Vec<MentorshipSession>> {
        let sessions = self.sessions.lock().expect("session store lock");
        Ok(sessions
            .iter()
            .filter(|s| s.mentor_id == mentor_id)
            .cloned()
            .collect())
    }

    async fn list_for_mentee(&self, mentee_id: Uuid) -> anyhow::Result<Vec<MentorshipSession>> {
        let sessions = self.sessions.lock().expect("session store lock");
        Ok(sessions
            .iter()
            .filter(|s| s.mentee_id == mentee_id)
            .cloned()
            .collect())
    }
}
