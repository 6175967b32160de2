// Admin Session Module
// Token-keyed sessions for the admin panel. A session lives for a fixed
// absolute duration from login time (not sliding); every protected access
// re-checks the age and removes expired sessions as a side effect.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Absolute session lifetime from login
pub const SESSION_MAX_AGE: Duration = Duration::from_secs(2 * 60 * 60);

/// Result of validating a session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCheck {
    Valid,
    Expired,
    Missing,
}

#[derive(Debug, Clone, Copy)]
struct Session {
    login_time: Instant,
}

/// Store of active admin sessions
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    max_age: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_max_age(SESSION_MAX_AGE)
    }

    /// Custom lifetime, used by tests to exercise expiry
    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_age,
        }
    }

    /// Create a session and return its token. The caller has already
    /// verified the admin password.
    pub fn create(&self) -> String {
        let token = Uuid::new_v4().to_string();
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.insert(
                token.clone(),
                Session {
                    login_time: Instant::now(),
                },
            );
        }
        token
    }

    /// Check a token; an expired session is removed before reporting
    pub fn check(&self, token: &str) -> SessionCheck {
        let mut sessions = match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match sessions.get(token) {
            None => SessionCheck::Missing,
            Some(session) if session.login_time.elapsed() <= self.max_age => SessionCheck::Valid,
            Some(_) => {
                sessions.remove(token);
                SessionCheck::Expired
            }
        }
    }

    /// Destroy a session unconditionally
    pub fn destroy(&self, token: &str) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(token);
        }
    }

    pub fn active_count(&self) -> usize {
        self.sessions.lock().map(|sessions| sessions.len()).unwrap_or(0)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
