use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::JwtKeys;
use crate::config::AdminConfig;
use crate::error::{OpError, OpResult};
use crate::store::{NewUser, Role, User, UserStore};

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub occupation: Option<String>,
    pub expertise: Option<String>,
}

/// Create a new account with role USER. Emails are stored exactly as given,
/// never trimmed or lowercased.
pub async fn register(users: &dyn UserStore, input: RegisterInput) -> OpResult<User> {
    if !is_valid_email(&input.email) {
        return Err(OpError::Rejected("Invalid email address"));
    }
    if users.find_by_email(&input.email).await?.is_some() {
        return Err(OpError::Rejected("Email already exists"));
    }

    let password_hash = hash_password(&input.password)?;
    let user = users
        .create(NewUser {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            password_hash,
            bio: input.bio,
            address: input.address,
            occupation: input.occupation,
            expertise: input.expertise,
            role: Role::User,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Verify credentials and issue a token. Unknown email and wrong password are
/// deliberately indistinguishable to the caller.
pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> OpResult<String> {
    let Some(user) = users.find_by_email(email).await? else {
        return Err(OpError::Rejected("Invalid credentials"));
    };
    if !verify_password(password, &user.password_hash)? {
        return Err(OpError::Rejected("Invalid credentials"));
    }

    let token = keys.issue(&user)?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(token)
}

/// Admin-only role change. Checks run in order: caller role, target lookup,
/// role value; updates the target in place. No self-demotion guard.
pub async fn change_role(
    users: &dyn UserStore,
    caller: &User,
    target_email: &str,
    new_role: &str,
) -> OpResult<()> {
    if caller.role != Role::Admin {
        return Err(OpError::Rejected("Unauthorized"));
    }
    let Some(target) = users.find_by_email(target_email).await? else {
        return Err(OpError::Rejected("User not found"));
    };
    let Ok(role) = new_role.parse::<Role>() else {
        return Err(OpError::Rejected("Invalid role"));
    };

    users.set_role(target.id, role).await?;
    info!(
        admin_id = %caller.id,
        target = %target.email,
        role = %role,
        "user role changed"
    );
    Ok(())
}

/// Public mentor profile lookup. A user with another role is reported the
/// same way as a missing one.
pub async fn mentor_profile(users: &dyn UserStore, email: &str) -> OpResult<User> {
    let mentor = users
        .find_by_email(email)
        .await?
        .filter(|u| u.role == Role::Mentor);
    mentor.ok_or(OpError::Rejected("Mentor not found"))
}

/// Startup bootstrap: make sure one admin account exists. No-op when the
/// configured email is already taken.
pub async fn ensure_admin(users: &dyn UserStore, admin: &AdminConfig) -> anyhow::Result<()> {
    if users.find_by_email(&admin.email).await?.is_some() {
        info!(email = %admin.email, "admin user already exists");
        return Ok(());
    }

    let password_hash = hash_password(&admin.password)?;
    let user = users
        .create(NewUser {
            first_name: "Admin".into(),
            last_name: "User".into(),
            email: admin.email.clone(),
            password_hash,
            bio: None,
            address: None,
            occupation: None,
            expertise: None,
            role: Role::Admin,
        })
        .await?;
    info!(user_id = %user.id, email = %user.email, "admin user created");
    Ok(())
}
