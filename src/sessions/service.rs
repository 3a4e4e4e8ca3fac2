use tracing::info;
use uuid::Uuid;

use crate::error::{OpError, OpResult};
use crate::store::{
    MentorshipSession, NewSession, Role, SessionStatus, SessionStore, User, UserStore,
};

/// Mentee-only. Unlike the account mutations, a wrong caller role here aborts
/// the operation instead of reporting a soft failure.
pub async fn request_session(
    users: &dyn UserStore,
    sessions: &dyn SessionStore,
    caller: &User,
    mentor_email: &str,
    questions: Option<String>,
) -> OpResult<MentorshipSession> {
    if caller.role != Role::User {
        return Err(OpError::Forbidden(
            "Only regular users can request mentorship sessions",
        ));
    }
    let mentor = users
        .find_by_email(mentor_email)
        .await?
        .filter(|u| u.role == Role::Mentor);
    let Some(mentor) = mentor else {
        return Err(OpError::Rejected("Mentor not found"));
    };

    let session = sessions
        .create(NewSession {
            mentor_id: mentor.id,
            mentee_id: caller.id,
            questions,
        })
        .await?;
    info!(
        session_id = %session.id,
        mentee_id = %caller.id,
        mentor_id = %mentor.id,
        "mentorship session requested"
    );
    Ok(session)
}

/// Mentor-only. The lookup is scoped to the caller, so a session owned by
/// another mentor reads as "Session not found", and an id that does not even
/// parse reads the same. A session that is already settled is overwritten
/// without complaint; see DESIGN.md.
pub async fn respond_to_session(
    sessions: &dyn SessionStore,
    caller: &User,
    session_id: &str,
    action: &str,
) -> OpResult<MentorshipSession> {
    if caller.role != Role::Mentor {
        return Err(OpError::Forbidden(
            "Only mentors can respond to mentorship sessions",
        ));
    }
    let Ok(session_id) = Uuid::parse_str(session_id) else {
        return Err(OpError::Rejected("Session not found"));
    };
    let Some(session) = sessions.find_for_mentor(session_id, caller.id).await? else {
        return Err(OpError::Rejected("Session not found"));
    };
    let status = match action {
        "accept" => SessionStatus::Accepted,
        "reject" => SessionStatus::Rejected,
        _ => return Err(OpError::Rejected("Invalid action")),
    };

    sessions.set_status(session.id, status).await?;
    info!(
        session_id = %session.id,
        mentor_id = %caller.id,
        status = %status,
        "mentorship session responded"
    );
    Ok(MentorshipSession { status, ..session })
}

/// Sessions belonging to the caller: as mentor when the caller is a mentor,
/// as mentee otherwise.
pub async fn sessions_for(
    sessions: &dyn SessionStore,
    caller: &User,
) -> OpResult<Vec<MentorshipSession>> {
    let list = match caller.role {
        Role::Mentor => sessions.list_for_mentor(caller.id).await?,
        _ => sessions.list_for_mentee(caller.id).await?,
    };
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, NewUser};

    async fn user_with_role(store: &MemoryStore, email: &str, role: Role) -> User {
        UserStore::create(
            store,
            NewUser {
                first_name: "Test".into(),
                last_name: "Person".into(),
                email: email.into(),
                password_hash: "x".into(),
                bio: None,
                address: None,
                occupation: None,
                expertise: None,
                role,
            })
            .await
            .expect("create user")
    }

    fn rejected_message(err: OpError) -> &'static str {
        match err {
            OpError::Rejected(msg) => msg,
            other => panic!("expected reported failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn request_against_non_mentor_creates_nothing() {
        let store = MemoryStore::new();
        let mentee = user_with_role(&store, "mentee@example.com", Role::User).await;
        user_with_role(&store, "plain@example.com", Role::User).await;

        let err = request_session(&store, &store, &mentee, "plain@example.com", None)
            .await
            .unwrap_err();
        assert_eq!(rejected_message(err), "Mentor not found");
        assert!(store.list_for_mentee(mentee.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn request_against_unknown_email_is_mentor_not_found() {
        let store = MemoryStore::new();
        let mentee = user_with_role(&store, "mentee@example.com", Role::User).await;

        let err = request_session(&store, &store, &mentee, "nobody@example.com", None)
            .await
            .unwrap_err();
        assert_eq!(rejected_message(err), "Mentor not found");
    }

    #[tokio::test]
    async fn mentor_caller_is_forbidden_from_requesting() {
        let store = MemoryStore::new();
        let mentor = user_with_role(&store, "mentor@example.com", Role::Mentor).await;

        let err = request_session(&store, &store, &mentor, "mentor@example.com", None)
            .await
            .unwrap_err();
        assert!(matches!(err, OpError::Forbidden(_)));
    }

    #[tokio::test]
    async fn admin_caller_is_forbidden_from_requesting() {
        let store = MemoryStore::new();
        let admin = user_with_role(&store, "admin@example.com", Role::Admin).await;
        user_with_role(&store, "mentor@example.com", Role::Mentor).await;

        let err = request_session(&store, &store, &admin, "mentor@example.com", None)
            .await
            .unwrap_err();
        assert!(matches!(err, OpError::Forbidden(_)));
    }

    #[tokio::test]
    async fn request_creates_pending_session_with_questions() {
        let store = MemoryStore::new();
        let mentee = user_with_role(&store, "mentee@example.com", Role::User).await;
        let mentor = user_with_role(&store, "mentor@example.com", Role::Mentor).await;

        let session = request_session(
            &store,
            &store,
            &mentee,
            "mentor@example.com",
            Some("How do I start?".into()),
        )
        .await
        .expect("request");
        assert_eq!(session.status, SessionStatus::Pending);
        assert_eq!(session.mentor_id, mentor.id);
        assert_eq!(session.mentee_id, mentee.id);
        assert_eq!(session.questions.as_deref(), Some("How do I start?"));
    }

    #[tokio::test]
    async fn non_mentor_caller_is_forbidden_from_responding() {
        let store = MemoryStore::new();
        let mentee = user_with_role(&store, "mentee@example.com", Role::User).await;

        let err = respond_to_session(&store, &mentee, &Uuid::new_v4().to_string(), "accept")
            .await
            .unwrap_err();
        assert!(matches!(err, OpError::Forbidden(_)));
    }

    #[tokio::test]
    async fn unparseable_session_id_reads_as_not_found() {
        let store = MemoryStore::new();
        let mentor = user_with_role(&store, "mentor@example.com", Role::Mentor).await;

        let err = respond_to_session(&store, &mentor, "definitely-not-a-uuid", "accept")
            .await
            .unwrap_err();
        assert_eq!(rejected_message(err), "Session not found");
    }

    #[tokio::test]
    async fn responding_to_anothers_session_reads_as_not_found() {
        let store = MemoryStore::new();
        let mentee = user_with_role(&store, "mentee@example.com", Role::User).await;
        user_with_role(&store, "owner@example.com", Role::Mentor).await;
        let other = user_with_role(&store, "other@example.com", Role::Mentor).await;
        let session = request_session(&store, &store, &mentee, "owner@example.com", None)
            .await
            .expect("request");

        let err = respond_to_session(&store, &other, &session.id.to_string(), "accept")
            .await
            .unwrap_err();
        assert_eq!(rejected_message(err), "Session not found");
        // Untouched.
        let kept = store.find_for_mentor(session.id, session.mentor_id).await.unwrap().unwrap();
        assert_eq!(kept.status, SessionStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_action_is_rejected() {
        let store = MemoryStore::new();
        let mentee = user_with_role(&store, "mentee@example.com", Role::User).await;
        let mentor = user_with_role(&store, "mentor@example.com", Role::Mentor).await;
        let session = request_session(&store, &store, &mentee, "mentor@example.com", None)
            .await
            .expect("request");

        let err = respond_to_session(&store, &mentor, &session.id.to_string(), "postpone")
            .await
            .unwrap_err();
        assert_eq!(rejected_message(err), "Invalid action");
        let kept = store.find_for_mentor(session.id, mentor.id).await.unwrap().unwrap();
        assert_eq!(kept.status, SessionStatus::Pending);
    }

    #[tokio::test]
    async fn accept_and_reject_settle_the_session() {
        let store = MemoryStore::new();
        let mentee = user_with_role(&store, "mentee@example.com", Role::User).await;
        let mentor = user_with_role(&store, "mentor@example.com", Role::Mentor).await;
        let first = request_session(&store, &store, &mentee, "mentor@example.com", None)
            .await
            .expect("request");
        let second = request_session(&store, &store, &mentee, "mentor@example.com", None)
            .await
            .expect("request");

        let accepted = respond_to_session(&store, &mentor, &first.id.to_string(), "accept")
            .await
            .expect("accept");
        assert_eq!(accepted.status, SessionStatus::Accepted);
        let rejected = respond_to_session(&store, &mentor, &second.id.to_string(), "reject")
            .await
            .expect("reject");
        assert_eq!(rejected.status, SessionStatus::Rejected);
    }

    // Pins the current behavior: a settled session can be re-responded and
    // the status is silently overwritten. Flagged in DESIGN.md, not fixed.
    #[tokio::test]
    async fn second_response_overwrites_status() {
        let store = MemoryStore::new();
        let mentee = user_with_role(&store, "mentee@example.com", Role::User).await;
        let mentor = user_with_role(&store, "mentor@example.com", Role::Mentor).await;
        let session = request_session(&store, &store, &mentee, "mentor@example.com", None)
            .await
            .expect("request");

        respond_to_session(&store, &mentor, &session.id.to_string(), "accept")
            .await
            .expect("accept");
        respond_to_session(&store, &mentor, &session.id.to_string(), "reject")
            .await
            .expect("reject over accept");
        let settled = store.find_for_mentor(session.id, mentor.id).await.unwrap().unwrap();
        assert_eq!(settled.status, SessionStatus::Rejected);
    }

    #[tokio::test]
    async fn listing_follows_caller_role() {
        let store = MemoryStore::new();
        let mentee = user_with_role(&store, "mentee@example.com", Role::User).await;
        let mentor = user_with_role(&store, "mentor@example.com", Role::Mentor).await;
        let session = request_session(&store, &store, &mentee, "mentor@example.com", None)
            .await
            .expect("request");

        let mentee_view = sessions_for(&store, &mentee).await.expect("mentee list");
        let mentor_view = sessions_for(&store, &mentor).await.expect("mentor list");
        assert_eq!(mentee_view.len(), 1);
        assert_eq!(mentor_view.len(), 1);
        assert_eq!(mentee_view[0].id, session.id);
        assert_eq!(mentor_view[0].id, session.id);

        // An uninvolved mentor sees nothing.
        let bystander = user_with_role(&store, "bystander@example.com", Role::Mentor).await;
        assert!(sessions_for(&store, &bystander).await.unwrap().is_empty());
    }
}
