use chrono::Utc;

use crate::model::config::AuthConfig;
use crate::model::session::{Session, User};

/// Error from a session store
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("stored session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("session io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where the current session lives between invocations.
pub trait SessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError>;
    fn save(&mut self, session: &Session) -> Result<(), SessionError>;
    fn clear(&mut self) -> Result<(), SessionError>;
}

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error("email not found")]
    UnknownEmail,
    #[error("wrong password")]
    WrongPassword,
    #[error("not logged in (run `ib login <email>` first)")]
    NotLoggedIn,
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Checks credentials against the configured pair and manages the session.
pub struct AuthService<S: SessionStore> {
    credential: AuthConfig,
    store: S,
}

impl<S: SessionStore> AuthService<S> {
    pub fn new(credential: AuthConfig, store: S) -> Self {
        AuthService { credential, store }
    }

    /// Verify the credential pair and persist a fresh session.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Session, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if email != self.credential.email {
            log::info!("login rejected: unknown email");
            return Err(AuthError::UnknownEmail);
        }
        if password != self.credential.password {
            log::info!("login rejected: wrong password for {}", email);
            return Err(AuthError::WrongPassword);
        }

        let session = Session {
            user: User {
                id: uuid::Uuid::new_v4().simple().to_string(),
                email: email.to_string(),
            },
            logged_in_at: Utc::now(),
        };
        self.store.save(&session)?;
        log::info!("logged in as {}", email);
        Ok(session)
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.store.clear()?;
        Ok(())
    }

    /// The stored session, if any. A corrupt stored session is discarded.
    pub fn current(&mut self) -> Result<Option<Session>, AuthError> {
        match self.store.load() {
            Ok(session) => Ok(session),
            Err(SessionError::Corrupt(e)) => {
                log::warn!("discarding unreadable session: {}", e);
                self.store.clear()?;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The stored session, or `NotLoggedIn`.
    pub fn require(&mut self) -> Result<Session, AuthError> {
        self.current()?.ok_or(AuthError::NotLoggedIn)
    }
}

/// Session store that lives only as long as the value.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Option<Session>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.session.clone())
    }

    fn save(&mut self, session: &Session) -> Result<(), SessionError> {
        self.session = Some(session.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.session = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService<MemorySessionStore> {
        AuthService::new(
            AuthConfig {
                email: "admin@example.com".into(),
                password: "secret".into(),
            },
            MemorySessionStore::default(),
        )
    }

    #[test]
    fn login_success_persists_session() {
        let mut auth = service();
        let session = auth.login("admin@example.com", "secret").unwrap();
        assert_eq!(session.user.email, "admin@example.com");
        assert!(!session.user.id.is_empty());
        assert_eq!(auth.current().unwrap(), Some(session));
    }

    #[test]
    fn login_validation_order() {
        let mut auth = service();
        assert!(matches!(auth.login("", "secret"), Err(AuthError::MissingCredentials)));
        assert!(matches!(auth.login("admin@example.com", ""), Err(AuthError::MissingCredentials)));
        assert!(matches!(auth.login("who@example.com", "nope"), Err(AuthError::UnknownEmail)));
        assert!(matches!(auth.login("admin@example.com", "nope"), Err(AuthError::WrongPassword)));
        assert_eq!(auth.current().unwrap(), None);
    }

    #[test]
    fn logout_clears_session() {
        let mut auth = service();
        auth.login("admin@example.com", "secret").unwrap();
        auth.logout().unwrap();
        assert!(matches!(auth.require(), Err(AuthError::NotLoggedIn)));
    }

    struct CorruptStore {
        cleared: bool,
    }

    impl SessionStore for CorruptStore {
        fn load(&self) -> Result<Option<Session>, SessionError> {
            if self.cleared {
                return Ok(None);
            }
            Err(serde_json::from_str::<Session>("{").unwrap_err().into())
        }
        fn save(&mut self, _session: &Session) -> Result<(), SessionError> {
            Ok(())
        }
        fn clear(&mut self) -> Result<(), SessionError> {
            self.cleared = true;
            Ok(())
        }
    }

    #[test]
    fn corrupt_session_is_discarded() {
        let mut auth = AuthService::new(AuthConfig::default(), CorruptStore { cleared: false });
        assert_eq!(auth.current().unwrap(), None);
        assert!(auth.store.cleared);
    }
}
