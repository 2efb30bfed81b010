//! JSON files in a directory, one per storage key

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CurrentSession, SessionStore, UserProfile, UserStore};
use crate::error::StoreError;

const USERS_FILE: &str = "users.json";
const SESSION_FILE: &str = "session.json";

/// Local storage analogue: `users.json` holds every rider, `session.json`
/// the signed-in one
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>, StoreError> {
        let raw = match fs::read(self.dir.join(file)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|_| StoreError::Corrupt(file.to_string()))
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(file), serde_json::to_vec_pretty(value)?)?;

        Ok(())
    }

    fn remove(&self, file: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.dir.join(file)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn users(&self) -> Result<Vec<UserProfile>, StoreError> {
        Ok(self.read(USERS_FILE)?.unwrap_or_default())
    }
}

impl UserStore for JsonFileStore {
    fn get(&self, id: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.users()?.into_iter().find(|u| u.id == id))
    }

    fn list(&self) -> Result<Vec<UserProfile>, StoreError> {
        self.users()
    }

    fn put(&mut self, user: UserProfile) -> Result<(), StoreError> {
        let mut users = self.users()?;

        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }

        self.write(USERS_FILE, &users)
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut users = self.users()?;
        let before = users.len();
        users.retain(|u| u.id != id);

        if users.len() == before {
            return Ok(false);
        }

        self.write(USERS_FILE, &users)?;

        Ok(true)
    }
}

impl SessionStore for JsonFileStore {
    fn get(&self) -> Result<Option<CurrentSession>, StoreError> {
        self.read(SESSION_FILE)
    }

    fn put(&mut self, session: CurrentSession) -> Result<(), StoreError> {
        self.write(SESSION_FILE, &session)
    }

    fn delete(&mut self) -> Result<(), StoreError> {
        self.remove(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use time::macros::datetime;

    use super::*;
    use crate::accounts::SignupForm;
    use crate::error::StoreError;

    fn rider(id: &str, email: &str) -> UserProfile {
        SignupForm {
            email: email.to_string(),
            password: "secret".to_string(),
            username: id.to_string(),
            ..SignupForm::default()
        }
        .into_profile(id.to_string())
    }

    #[test]
    fn users_round_trip_through_disk() -> Result<(), String> {
        let dir = tempfile::tempdir().map_err(|e| e.to_string())?;
        let mut store = JsonFileStore::new(dir.path().join("velopro"));

        assert!(store.list().map_err(|e| e.to_string())?.is_empty());

        UserStore::put(&mut store, rider("u_1", "ana@velopro.app")).map_err(|e| e.to_string())?;
        UserStore::put(&mut store, rider("u_2", "bia@velopro.app")).map_err(|e| e.to_string())?;

        let reopened = JsonFileStore::new(dir.path().join("velopro"));
        assert_eq!(2, reopened.list().map_err(|e| e.to_string())?.len());

        let found = reopened
            .find_by_email("bia@velopro.app")
            .map_err(|e| e.to_string())?
            .ok_or("not found")?;
        assert_eq!("u_2", found.id);

        assert!(UserStore::delete(&mut store, "u_1").map_err(|e| e.to_string())?);
        assert!(!UserStore::delete(&mut store, "u_1").map_err(|e| e.to_string())?);
        assert!(UserStore::get(&store, "u_1").map_err(|e| e.to_string())?.is_none());

        Ok(())
    }

    #[test]
    fn session_slot() -> Result<(), String> {
        let dir = tempfile::tempdir().map_err(|e| e.to_string())?;
        let mut store = JsonFileStore::new(dir.path());

        let session = CurrentSession {
            user_id: "u_1".to_string(),
            signed_in_at: datetime!(2024-05-20 7:00 UTC),
        };
        SessionStore::put(&mut store, session.clone()).map_err(|e| e.to_string())?;
        assert_eq!(Some(session), SessionStore::get(&store).map_err(|e| e.to_string())?);

        SessionStore::delete(&mut store).map_err(|e| e.to_string())?;
        SessionStore::delete(&mut store).map_err(|e| e.to_string())?;
        assert_eq!(None, SessionStore::get(&store).map_err(|e| e.to_string())?);

        Ok(())
    }

    #[test]
    fn unreadable_session_is_corrupt() -> Result<(), String> {
        let dir = tempfile::tempdir().map_err(|e| e.to_string())?;
        fs::write(dir.path().join("session.json"), "{not json").map_err(|e| e.to_string())?;

        let store = JsonFileStore::new(dir.path());
        match SessionStore::get(&store) {
            Err(StoreError::Corrupt(key)) => assert_eq!("session.json", key),
            other => return Err(format!("unexpected {:?}", other)),
        }

        Ok(())
    }
}
