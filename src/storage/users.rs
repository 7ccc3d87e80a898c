//! User store backed by `users.json`.

use super::document::{self, DocumentShape};
use super::{RecordStore, StorageError, USERS_FILE};
use crate::models::User;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Stored form of a user; the username is the map key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    name: String,
    password: String,
}

type UserMap = BTreeMap<String, UserRecord>;

/// User accounts keyed by username.
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    /// Open the store in `data_dir`, creating the directory if needed.
    ///
    /// The document itself is only created by the first write.
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        document::ensure_dir(data_dir)?;
        Ok(Self {
            path: data_dir.join(USERS_FILE),
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_users(&self) -> Result<UserMap, StorageError> {
        Ok(document::load(&self.path, DocumentShape::Object)?.unwrap_or_default())
    }

    fn write_users(&self, users: &UserMap) -> Result<(), StorageError> {
        document::save(&self.path, users)
    }

    fn check_username(user: &User) -> Result<(), StorageError> {
        if user.username.is_empty() {
            return Err(StorageError::InvalidRecord(
                "user has an empty username".to_string(),
            ));
        }
        Ok(())
    }
}

impl RecordStore for UserStore {
    type Key = str;
    type Record = User;

    fn read_all(&self) -> Result<Vec<User>, StorageError> {
        Ok(self
            .read_users()?
            .into_iter()
            .map(|(username, record)| User {
                username,
                name: record.name,
                password: record.password,
            })
            .collect())
    }

    fn get(&self, username: &str) -> Result<Option<User>, StorageError> {
        if username.is_empty() {
            return Ok(None);
        }

        let mut users = self.read_users()?;
        Ok(users.remove(username).map(|record| User {
            username: username.to_string(),
            name: record.name,
            password: record.password,
        }))
    }

    fn create(&self, user: &User) -> Result<bool, StorageError> {
        Self::check_username(user)?;

        let mut users = self.read_users()?;
        if users.contains_key(&user.username) {
            return Ok(false);
        }

        users.insert(
            user.username.clone(),
            UserRecord {
                name: user.name.clone(),
                password: user.password.clone(),
            },
        );
        self.write_users(&users)?;
        tracing::debug!(username = %user.username, "created user");
        Ok(true)
    }

    fn update(&self, user: &User) -> Result<bool, StorageError> {
        Self::check_username(user)?;

        let mut users = self.read_users()?;
        let Some(record) = users.get_mut(&user.username) else {
            return Ok(false);
        };
        record.name = user.name.clone();
        record.password = user.password.clone();
        self.write_users(&users)?;
        Ok(true)
    }

    fn delete(&self, username: &str) -> Result<bool, StorageError> {
        let mut users = self.read_users()?;
        if users.remove(username).is_none() {
            return Ok(false);
        }
        self.write_users(&users)?;
        Ok(true)
    }
}
