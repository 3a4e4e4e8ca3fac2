use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Error)]
#[error("unrecognized role")]
pub struct ParseRoleError;

/// A user holds exactly one role; new accounts start as `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Mentor,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Mentor => "MENTOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "MENTOR" => Ok(Role::Mentor),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(ParseRoleError),
        }
    }
}

#[derive(Debug, Error)]
#[error("unrecognized session status")]
pub struct ParseStatusError;

/// Session lifecycle: starts `Pending`, settled by the mentor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Pending => "PENDING",
            SessionStatus::Accepted => "ACCEPTED",
            SessionStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(SessionStatus::Pending),
            "ACCEPTED" => Ok(SessionStatus::Accepted),
            "REJECTED" => Ok(SessionStatus::Rejected),
            _ => Err(ParseStatusError),
        }
    }
}

/// User record as persisted. Plaintext passwords never reach this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub occupation: Option<String>,
    pub expertise: Option<String>,
    pub role: Role,
    pub created_at: OffsetDateTime,
}

/// Creation payload; id and created_at are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub occupation: Option<String>,
    pub expertise: Option<String>,
    pub role: Role,
}

/// Mentorship session linking one mentor and one mentee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorshipSession {
    pub id: Uuid,
    pub mentor_id: Uuid,
    pub mentee_id: Uuid,
    pub status: SessionStatus,
    pub questions: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub mentor_id: Uuid,
    pub mentee_id: Uuid,
    pub questions: Option<String>,
}
