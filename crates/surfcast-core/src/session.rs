//! Explicit session context
//!
//! The authenticated user is resolved once by the caller (the app shell or the
//! CLI) and handed to services at invocation time. Services never query the
//! auth backend themselves.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Profile metadata carried by the auth provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

/// Authenticated user as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub metadata: UserMetadata,
}

impl SessionUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            metadata: UserMetadata::default(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    user: Option<SessionUser>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: SessionUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// The current user, or `Unauthorized` when nobody is logged in.
    pub fn require_user(&self) -> Result<&SessionUser, AppError> {
        self.user
            .as_ref()
            .filter(|u| !u.id.trim().is_empty())
            .ok_or_else(|| AppError::Unauthorized("You must be logged in to upload.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_session_has_no_user() {
        let session = SessionContext::anonymous();
        assert!(session.user().is_none());
        assert!(matches!(
            session.require_user(),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn blank_user_id_is_not_a_login() {
        let session = SessionContext::authenticated(SessionUser::new("  "));
        assert!(session.require_user().is_err());
    }

    #[test]
    fn authenticated_session_returns_user() {
        let session =
            SessionContext::authenticated(SessionUser::new("user-1").with_email("a@b.c"));
        let user = session.require_user().unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.email.as_deref(), Some("a@b.c"));
    }
}
