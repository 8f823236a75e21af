// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::sync::Arc;

use crate::config::ValidatedConfig;
use crate::content::{DocumentStore, ImageStore};
use crate::iam::UserStore;
use crate::public::error::ErrorRenderer;
use crate::public::markdown::HtmlSanitizer;
use crate::runtime_paths::RuntimePaths;
use crate::session::SessionStore;
use crate::templates::{MiniJinjaEngine, TemplateEngine};

pub struct AppState {
    pub templates: Arc<dyn TemplateEngine>,
    pub error_renderer: ErrorRenderer,
    pub html_sanitizer: HtmlSanitizer,
    pub sessions: SessionStore,
    pub documents: DocumentStore,
    pub images: ImageStore,
    pub users: UserStore,
    pub runtime_paths: RuntimePaths,
}

impl AppState {
    /// Must be called inside a running actix/tokio system: the session
    /// store spawns its actor task.
    pub fn new(config: &ValidatedConfig, runtime_paths: RuntimePaths) -> Self {
        Self {
            templates: Arc::new(MiniJinjaEngine::new()),
            error_renderer: ErrorRenderer::new(config.app.name.clone()),
            html_sanitizer: HtmlSanitizer::new(),
            sessions: SessionStore::new(&config.session),
            documents: DocumentStore::new(runtime_paths.data_dir.clone()),
            images: ImageStore::new(runtime_paths.images_dir.clone()),
            users: UserStore::new(runtime_paths.users_file.clone(), config.password),
            runtime_paths,
        }
    }
}
