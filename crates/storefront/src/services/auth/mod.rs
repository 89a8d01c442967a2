//! Authentication service.
//!
//! Sign-in is simulated: after a fixed delay any well-formed email with a
//! non-empty password is accepted and mock credentials are issued.

mod error;

pub use error::AuthError;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use larkspur_core::{Email, UserId, UserRole};

use crate::models::{AuthState, User};

/// Token handed out by the simulated sign-in.
pub const MOCK_TOKEN: &str = "mock-jwt-token";

/// Display name given to every simulated account.
const MOCK_NAME: &str = "John Doe";

/// Read/write access to the shopper's authentication state.
///
/// The checkout only reads `is_authenticated`; the sign-in step writes
/// credentials once the simulated login resolves.
pub trait AuthStore {
    /// Whether a session token is present.
    fn is_authenticated(&self) -> bool;

    /// Store the user and token returned by a successful sign-in.
    fn set_credentials(&mut self, user: User, token: String);
}

impl AuthStore for AuthState {
    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn set_credentials(&mut self, user: User, token: String) {
        self.user = Some(user);
        self.token = Some(token);
    }
}

/// Credentials issued by a successful sign-in.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: User,
    pub token: String,
}

/// Simulated authentication service.
#[derive(Debug, Clone, Copy)]
pub struct AuthService {
    delay: Duration,
}

impl AuthService {
    /// Create a service that resolves sign-ins after `delay`.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidCredentials` if the password is empty.
    #[tracing::instrument(skip(self, password))]
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Credentials, AuthError> {
        tokio::time::sleep(self.delay).await;

        let email = Email::parse(email)?;

        if password.expose_secret().is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(email = %email, "simulated sign-in accepted");

        Ok(Credentials {
            user: User {
                id: UserId::new(1),
                email,
                name: MOCK_NAME.to_owned(),
                role: UserRole::User,
            },
            token: MOCK_TOKEN.to_owned(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_issues_mock_credentials() {
        let service = AuthService::new(Duration::ZERO);
        let creds = service
            .login_with_password("jane@example.com", &SecretString::from("hunter22"))
            .await
            .unwrap();

        assert_eq!(creds.token, MOCK_TOKEN);
        assert_eq!(creds.user.email.as_str(), "jane@example.com");
        assert_eq!(creds.user.name, "John Doe");
        assert_eq!(creds.user.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_email() {
        let service = AuthService::new(Duration::ZERO);
        let result = service
            .login_with_password("not-an-email", &SecretString::from("pw"))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidEmail(_))));
    }

    #[tokio::test]
    async fn test_login_rejects_empty_password() {
        let service = AuthService::new(Duration::ZERO);
        let result = service
            .login_with_password("jane@example.com", &SecretString::from(""))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_waits_for_configured_delay() {
        let service = AuthService::new(Duration::from_secs(1));
        let started = tokio::time::Instant::now();

        service
            .login_with_password("jane@example.com", &SecretString::from("pw"))
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[test]
    fn test_auth_state_store() {
        let mut state = AuthState::default();
        assert!(!state.is_authenticated());

        state.set_credentials(
            User {
                id: UserId::new(1),
                email: Email::parse("jane@example.com").unwrap(),
                name: "Jane".to_owned(),
                role: UserRole::User,
            },
            MOCK_TOKEN.to_owned(),
        );

        assert!(state.is_authenticated());
        assert_eq!(state.user.as_ref().map(|u| u.name.as_str()), Some("Jane"));
    }
}
