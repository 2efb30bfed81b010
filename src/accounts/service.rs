//! Signup, login and the signed-in rider

use time::OffsetDateTime;
use uuid::Uuid;

use super::{CurrentSession, SessionStore, SignupForm, UserProfile, UserStore};
use crate::error::{AuthError, StoreError};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

pub struct AccountService<U, S>
where
    U: UserStore,
    S: SessionStore,
{
    users: U,
    sessions: S,
}

impl<U, S> AccountService<U, S>
where
    U: UserStore,
    S: SessionStore,
{
    pub fn new(users: U, sessions: S) -> Self {
        Self {
            users,
            sessions,
        }
    }

    pub fn users(&self) -> &U {
        &self.users
    }

    /// Register a rider and sign them in
    pub fn signup(&mut self, form: SignupForm) -> Result<UserProfile, AuthError> {
        let existing = self.users.list()?;

        if existing.iter().any(|u| u.email == form.email) {
            return Err(AuthError::EmailTaken(form.email));
        }
        if existing.iter().any(|u| u.username == form.username) {
            return Err(AuthError::UsernameTaken(form.username));
        }

        let id = self.next_user_id()?;
        let user = form.into_profile(id);
        self.users.put(user.clone())?;
        self.open_session(&user)?;

        tracing::info!(user_id = %user.id, username = %user.username, "Rider registered");

        Ok(user)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let user = self
            .users
            .find_by_email(email)?
            .filter(|u| u.password.as_deref() == Some(password))
            .ok_or(AuthError::InvalidCredentials)?;

        self.open_session(&user)?;

        tracing::info!(user_id = %user.id, "Rider signed in");

        Ok(user)
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.sessions.delete()?;

        Ok(())
    }

    /// Rider of the stored session. Unreadable or dangling sessions are
    /// discarded and read as signed out.
    pub fn current_user(&mut self) -> Result<Option<UserProfile>, AuthError> {
        let session = match self.sessions.get() {
            Ok(Some(session)) => session,
            Ok(None) => return Ok(None),
            Err(StoreError::Corrupt(key)) => {
                tracing::warn!(key = %key, "Discarding unreadable session");
                self.sessions.delete()?;
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match self.users.get(&session.user_id)? {
            Some(user) => Ok(Some(user)),
            None => {
                tracing::warn!(user_id = %session.user_id, "Session points to a missing rider");
                self.sessions.delete()?;
                Ok(None)
            }
        }
    }

    fn open_session(&mut self, user: &UserProfile) -> Result<(), StoreError> {
        self.sessions.put(CurrentSession {
            user_id: user.id.clone(),
            signed_in_at: OffsetDateTime::now_utc(),
        })
    }

    /// `u_` followed by 9 base-36 characters, unused in the store
    fn next_user_id(&self) -> Result<String, StoreError> {
        loop {
            let id = format!("u_{}", base36(Uuid::new_v4().as_u128(), ID_LEN));
            if self.users.get(&id)?.is_none() {
                return Ok(id);
            }
        }
    }
}

fn base36(mut value: u128, len: usize) -> String {
    let mut out = vec![b'0'; len];

    for slot in out.iter_mut().rev() {
        *slot = ID_ALPHABET[(value % 36) as usize];
        value /= 36;
    }

    String::from_utf8_lossy(&out).into_owned()
}
