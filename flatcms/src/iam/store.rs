// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::password::{PasswordError, hash_password, verify_password};
use super::yaml_store::{YamlStoreError, read_yaml_file, write_yaml_file};
use crate::config::PasswordConfig;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// `username: <argon2 PHC hash>`, kept sorted on disk.
pub type UsersData = BTreeMap<String, String>;

const USERS_LABEL: &str = "users";

#[derive(Debug)]
pub enum UserStoreError {
    Storage(YamlStoreError),
    Password(PasswordError),
    Task(String),
}

impl std::fmt::Display for UserStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStoreError::Storage(err) => write!(f, "User storage error: {}", err),
            UserStoreError::Password(err) => write!(f, "Password error: {}", err),
            UserStoreError::Task(msg) => write!(f, "User store task failed: {}", msg),
        }
    }
}

impl std::error::Error for UserStoreError {}

impl From<YamlStoreError> for UserStoreError {
    fn from(err: YamlStoreError) -> Self {
        UserStoreError::Storage(err)
    }
}

impl From<PasswordError> for UserStoreError {
    fn from(err: PasswordError) -> Self {
        UserStoreError::Password(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created,
    UsernameTaken,
}

/// Credential file access. Hashing and file I/O run on the blocking pool;
/// registrations are serialized so read-check-write never interleaves.
#[derive(Clone)]
pub struct UserStore {
    inner: Arc<Inner>,
}

struct Inner {
    users_file: PathBuf,
    params: PasswordConfig,
    write_lock: Mutex<()>,
}

impl UserStore {
    pub fn new(users_file: PathBuf, params: PasswordConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                users_file,
                params,
                write_lock: Mutex::new(()),
            }),
        }
    }

    pub fn users_file(&self) -> &Path {
        &self.inner.users_file
    }

    pub async fn contains(&self, username: &str) -> Result<bool, UserStoreError> {
        let path = self.inner.users_file.clone();
        let username = username.to_string();
        run_blocking(move || Ok(load_users(&path)?.contains_key(&username))).await
    }

    /// True when `username` exists and `password` matches its stored hash.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, UserStoreError> {
        let path = self.inner.users_file.clone();
        let username = username.to_string();
        let password = password.to_string();
        run_blocking(move || {
            let users = load_users(&path)?;
            match users.get(&username) {
                Some(stored_hash) => Ok(verify_password(&password, stored_hash)?),
                None => Ok(false),
            }
        })
        .await
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<RegisterOutcome, UserStoreError> {
        let _guard = self.inner.write_lock.lock().await;
        let path = self.inner.users_file.clone();
        let params = self.inner.params;
        let username = username.to_string();
        let password = password.to_string();
        run_blocking(move || {
            let mut users = load_users(&path)?;
            if users.contains_key(&username) {
                return Ok(RegisterOutcome::UsernameTaken);
            }
            let hash = hash_password(&password, &params)?;
            users.insert(username.clone(), hash);
            write_yaml_file(&path, USERS_LABEL, &users)?;
            log::info!("Registered user '{}'", username);
            Ok(RegisterOutcome::Created)
        })
        .await
    }
}

pub fn load_users(path: &Path) -> Result<UsersData, YamlStoreError> {
    Ok(read_yaml_file(path, USERS_LABEL)?.unwrap_or_default())
}

pub fn save_users(path: &Path, users: &UsersData) -> Result<(), YamlStoreError> {
    write_yaml_file(path, USERS_LABEL, users)
}

async fn run_blocking<F, R>(task: F) -> Result<R, UserStoreError>
where
    F: FnOnce() -> Result<R, UserStoreError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| UserStoreError::Task(err.to_string()))?
}
