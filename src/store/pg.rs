use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    MentorshipSession, NewSession, NewUser, Role, SessionStatus, SessionStore, User, UserStore,
};

/// Postgres-backed store. Single-row writes only; the database's row-level
/// atomicity is the entire concurrency story.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Raw row shape; `role`/`status` arrive as TEXT and are parsed on the way
/// out so invalid values surface as errors instead of leaking upward.
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    bio: Option<String>,
    address: Option<String>,
    occupation: Option<String>,
    expertise: Option<String>,
    role: String,
    created_at: OffsetDateTime,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> anyhow::Result<User> {
        let role = row
            .role
            .parse::<Role>()
            .with_context(|| format!("users row {} carries role {:?}", row.id, row.role))?;
        Ok(User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password_hash: row.password_hash,
            bio: row.bio,
            address: row.address,
            occupation: row.occupation,
            expertise: row.expertise,
            role,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct SessionRow {
    id: Uuid,
    mentor_id: Uuid,
    mentee_id: Uuid,
    status: String,
    questions: Option<String>,
    created_at: OffsetDateTime,
}

impl TryFrom<SessionRow> for MentorshipSession {
    type Error = anyhow::Error;

    fn try_from(row: SessionRow) -> anyhow::Result<MentorshipSession> {
        let status = row.status.parse::<SessionStatus>().with_context(|| {
            format!("mentorship_sessions row {} carries status {:?}", row.id, row.status)
        })?;
        Ok(MentorshipSession {
            id: row.id,
            mentor_id: row.mentor_id,
            mentee_id: row.mentee_id,
            status,
            questions: row.questions,
            created_at: row.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, \
                            bio, address, occupation, expertise, role, created_at";

const SESSION_COLUMNS: &str = "id, mentor_id, mentee_id, status, questions, created_at";

#[async_trait]
impl UserStore for PgStore {
    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash,
                               bio, address, occupation, expertise, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.bio)
        .bind(&user.address)
        .bind(&user.occupation)
        .bind(&user.expertise)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .context("insert user")?;
        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1",
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn set_role(&self, id: Uuid, role: Role) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(id)
            .bind(role.as_str())
            .execute(&self.pool)
            .await
            .context("update user role")?;
        Ok(())
    }

    async fn list(&self, role: Option<Role>) -> anyhow::Result<Vec<User>> {
        let rows = match role {
            Some(role) => {
                sqlx::query_as::<_, UserRow>(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY created_at",
                ))
                .bind(role.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, UserRow>(&format!(
                    "SELECT {USER_COLUMNS} FROM users ORDER BY created_at",
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.into_iter().map(User::try_from).collect()
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn create(&self, session: NewSession) -> anyhow::Result<MentorshipSession> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            r#"
            INSERT INTO mentorship_sessions (mentor_id, mentee_id, questions)
            VALUES ($1, $2, $3)
            RETURNING {SESSION_COLUMNS}
            "#,
        ))
        .bind(session.mentor_id)
        .bind(session.mentee_id)
        .bind(&session.questions)
        .fetch_one(&self.pool)
        .await
        .context("insert mentorship session")?;
        row.try_into()
    }

    async fn find_for_mentor(
        &self,
        id: Uuid,
        mentor_id: Uuid,
    ) -> anyhow::Result<Option<MentorshipSession>> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM mentorship_sessions WHERE id = $1 AND mentor_id = $2",
        ))
        .bind(id)
        .bind(mentor_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(MentorshipSession::try_from).transpose()
    }

    async fn set_status(&self, id: Uuid, status: SessionStatus) -> anyhow::Result<()> {
        sqlx::query("UPDATE mentorship_sessions SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .context("update session status")?;
        Ok(())
    }

    async fn list_for_mentor(&self, mentor_id: Uuid) -> anyhow::Result<Vec<MentorshipSession>> {
        let rows = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM mentorship_sessions \
             WHERE mentor_id = $1 ORDER BY created_at DESC",
        ))
        .bind(mentor_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(MentorshipSession::try_from).collect()
    }

    async fn list_for_mentee(&self, mentee_id: Uuid) -> anyhow::Result<Vec<MentorshipSession>> {
        let rows = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM mentorship_sessions \
             WHERE mentee_id = $1 ORDER BY created_at DESC",
        ))
        .bind(mentee_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(MentorshipSession::try_from).collect()
    }
}
