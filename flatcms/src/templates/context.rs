// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::session::{Flash, RequestContext};
use minijinja::{Value, context};

#[derive(Debug, Clone)]
pub struct ErrorPageContext {
    app_name: String,
}

impl ErrorPageContext {
    pub fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        context! {
            app_name => &self.app_name,
            username => Value::UNDEFINED,
        }
    }
}

/// Values every page shares: site name, signed-in user and pending flash.
/// Building one consumes the flash messages of the session.
#[derive(Debug, Clone)]
pub struct LayoutContext {
    app_name: String,
    username: Option<String>,
    flash: Flash,
}

impl LayoutContext {
    pub fn new(app_name: &str, session: &RequestContext) -> Self {
        Self {
            app_name: app_name.to_string(),
            username: session.username(),
            flash: session.take_flash(),
        }
    }

    /// Page-level error shown inline (form re-renders), on top of any flash.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.flash.error = Some(message.into());
        self
    }

    pub fn to_value(&self, title: &str) -> Value {
        context! {
            app_name => &self.app_name,
            title => title,
            username => &self.username,
            flash_success => &self.flash.success,
            flash_error => &self.flash.error,
        }
    }
}
