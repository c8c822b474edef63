//! Explicit user session context.
//!
//! Authentication itself belongs to the hosted identity service; this module
//! only models what the rest of the crate sees of it. A session is a value the
//! caller owns and passes along: it begins at sign-in and ends when
//! [`SessionContext::sign_out`] consumes it. There is no process-wide
//! "current user".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("already signed in as {0}")]
    AlreadySignedIn(String),

    #[error("user profile {0} has no username")]
    MissingUsername(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Profile row associated with an authenticated user.
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// An authenticated session.
pub struct Session {
    profile: UserProfile,
    started_at: DateTime<Utc>,
}

impl Session {
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionContext {
    #[default]
    Anonymous,
    SignedIn(Session),
}

impl SessionContext {
    /// Begin a session for `profile`.
    pub fn sign_in(self, profile: UserProfile) -> Result<Self, SessionError> {
        self.sign_in_at(profile, Utc::now())
    }

    pub fn sign_in_at(
        self,
        profile: UserProfile,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if let SessionContext::SignedIn(existing) = &self {
            return Err(SessionError::AlreadySignedIn(
                existing.profile.username.clone(),
            ));
        }
        if profile.username.trim().is_empty() {
            return Err(SessionError::MissingUsername(profile.id));
        }
        info!(user = %profile.username, "session started");
        Ok(SessionContext::SignedIn(Session {
            profile,
            started_at,
        }))
    }

    /// End the session. Signing out while anonymous is a no-op.
    pub fn sign_out(self) -> Self {
        if let SessionContext::SignedIn(session) = self {
            info!(user = %session.profile.username, "session ended");
        }
        SessionContext::Anonymous
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionContext::Anonymous => None,
            SessionContext::SignedIn(session) => Some(session),
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session().map(Session::profile)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn profile(username: &str) -> UserProfile {
        UserProfile {
            id: "u-1".into(),
            email: "spore@example.org".into(),
            username: username.into(),
            avatar_url: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn lifecycle_runs_anonymous_signed_in_anonymous() {
        let ctx = SessionContext::default();
        assert!(!ctx.is_signed_in());

        let started = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let ctx = ctx.sign_in_at(profile("sporeprint"), started).unwrap();
        assert_eq!(ctx.user().map(|u| u.username.as_str()), Some("sporeprint"));
        assert_eq!(ctx.session().unwrap().started_at(), started);

        let ctx = ctx.sign_out();
        assert_eq!(ctx, SessionContext::Anonymous);
        assert_eq!(ctx.sign_out(), SessionContext::Anonymous);
    }

    #[test]
    fn double_sign_in_is_rejected() {
        let ctx = SessionContext::Anonymous.sign_in(profile("a")).unwrap();
        let err = ctx.sign_in(profile("b")).unwrap_err();
        assert_eq!(err, SessionError::AlreadySignedIn("a".into()));
    }

    #[test]
    fn blank_username_is_rejected() {
        let err = SessionContext::Anonymous.sign_in(profile(" ")).unwrap_err();
        assert_eq!(err, SessionError::MissingUsername("u-1".into()));
    }

    #[test]
    fn profile_deserializes_from_profile_row() {
        let parsed: UserProfile = serde_json::from_str(
            r#"{"id":"u-9","email":"a@b.c","username":"hypha","created_at":"2024-02-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(parsed.username, "hypha");
        assert!(parsed.avatar_url.is_none());
    }
}
