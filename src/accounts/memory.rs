//! In-memory stores

use std::collections::BTreeMap;

use super::{CurrentSession, SessionStore, UserProfile, UserStore};
use crate::error::StoreError;

/// Users and session kept in memory, gone with the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: BTreeMap<String, UserProfile>,
    session: Option<CurrentSession>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.users.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<UserProfile>, StoreError> {
        Ok(self.users.values().cloned().collect())
    }

    fn put(&mut self, user: UserProfile) -> Result<(), StoreError> {
        self.users.insert(user.id.clone(), user);

        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        Ok(self.users.remove(id).is_some())
    }
}

impl SessionStore for MemoryStore {
    fn get(&self) -> Result<Option<CurrentSession>, StoreError> {
        Ok(self.session.clone())
    }

    fn put(&mut self, session: CurrentSession) -> Result<(), StoreError> {
        self.session = Some(session);

        Ok(())
    }

    fn delete(&mut self) -> Result<(), StoreError> {
        self.session = None;

        Ok(())
    }
}
