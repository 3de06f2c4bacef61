//! Acting identity threaded explicitly through every task operation.

use super::{TaskDomainError, UserId};

/// The authenticated user on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActingIdentity {
    user_id: UserId,
}

impl ActingIdentity {
    /// Wraps an already validated user identifier.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Builds an identity from the user carried by a session, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AuthenticationRequired`] when the session
    /// carries no user or a blank one.
    pub fn authenticated(session_user: Option<&str>) -> Result<Self, TaskDomainError> {
        let raw = session_user
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(TaskDomainError::AuthenticationRequired)?;
        Ok(Self::new(UserId::new(raw)?))
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }
}
