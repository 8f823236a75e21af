// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action, log_warning};
use crate::config::ValidatedConfig;
use crate::iam::{UserStoreError, UsersData, hash_password, load_users, save_users};
use crate::runtime_paths::USERS_FILE_NAME;
use argon2::password_hash::rand_core::{OsRng, RngCore};
use std::path::Path;

pub const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD_LENGTH: usize = 16;
const PASSWORD_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Seeds `users.yaml` with an admin account when the file is missing or
/// holds no users. The generated password is printed once.
pub fn ensure_users(root: &Path, config: &ValidatedConfig) -> Result<bool, BootstrapError> {
    let users_path = root.join(USERS_FILE_NAME);
    let existing = load_users(&users_path).map_err(UserStoreError::from)?;
    if !existing.is_empty() {
        return Ok(false);
    }

    let password = generate_password();
    let hash = hash_password(&password, &config.password).map_err(UserStoreError::from)?;

    let mut users = UsersData::new();
    users.insert(ADMIN_USERNAME.to_string(), hash);
    save_users(&users_path, &users).map_err(UserStoreError::from)?;

    log_action(format!("created {} with user {}", USERS_FILE_NAME, ADMIN_USERNAME));
    log_warning(format!(
        "{} password: {} (change this immediately)",
        ADMIN_USERNAME, password
    ));

    Ok(true)
}

fn generate_password() -> String {
    let mut bytes = [0u8; ADMIN_PASSWORD_LENGTH];
    OsRng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|byte| PASSWORD_CHARS[(*byte as usize) % PASSWORD_CHARS.len()] as char)
        .collect()
}
