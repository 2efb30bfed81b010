//! Rider accounts over injected persistence
//!
//! Stores only know how to get, put and delete records. Signup and login
//! rules live in [`AccountService`].

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::StoreError;

mod json_file;
mod memory;
pub mod profile;
mod service;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use profile::{BikeType, RiderLevel, SignupForm, UserProfile, DEFAULT_AVATAR};
pub use service::AccountService;

/// The signed-in rider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSession {
    pub user_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub signed_in_at: OffsetDateTime,
}

/// Registered riders keyed by id
pub trait UserStore {
    fn get(&self, id: &str) -> Result<Option<UserProfile>, StoreError>;

    fn list(&self) -> Result<Vec<UserProfile>, StoreError>;

    /// Insert or replace by id
    fn put(&mut self, user: UserProfile) -> Result<(), StoreError>;

    /// Returns whether something was removed
    fn delete(&mut self, id: &str) -> Result<bool, StoreError>;

    fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.list()?.into_iter().find(|u| u.email == email))
    }
}

/// Slot for the signed-in rider.
///
/// `get` fails with [`StoreError::Corrupt`] when the stored record cannot be read back.
pub trait SessionStore {
    fn get(&self) -> Result<Option<CurrentSession>, StoreError>;

    fn put(&mut self, session: CurrentSession) -> Result<(), StoreError>;

    fn delete(&mut self) -> Result<(), StoreError>;
}
