// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub verify_password: String,
}

pub const WELCOME_MESSAGE: &str = "Welcome!";
pub const SIGNED_OUT_MESSAGE: &str = "You have been signed out.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Incorrect username or password.";
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Username and password are required.";
pub const USERNAME_TAKEN_MESSAGE: &str = "Username is already taken.";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match.";
pub const ACCOUNT_CREATED_MESSAGE: &str = "Account created successfully.";
