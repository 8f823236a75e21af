// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod password;
mod store;
pub(crate) mod yaml_store;

pub use password::{PasswordError, hash_password, verify_password};
pub use store::{RegisterOutcome, UserStore, UserStoreError, UsersData, load_users, save_users};
pub use yaml_store::YamlStoreError;
