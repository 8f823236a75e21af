// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::app_state::AppState;
use crate::public::error::serve_500;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Result};
use minijinja::Value;

mod context;
mod engine;

pub use context::{ErrorPageContext, LayoutContext};
pub use engine::{MiniJinjaEngine, TemplateEngine};

/// Render a minijinja template with the given context
pub fn render_minijinja_template(
    engine: &dyn TemplateEngine,
    template_name: &str,
    context: Value,
) -> Result<String, minijinja::Error> {
    engine.render(template_name, context)
}

/// Renders a full page, falling back to the 500 page when the template fails.
pub fn render_page(
    app_state: &AppState,
    template_name: &str,
    context: Value,
    status: StatusCode,
) -> Result<HttpResponse> {
    match render_minijinja_template(app_state.templates.as_ref(), template_name, context) {
        Ok(html) => Ok(HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
            .body(html)),
        Err(err) => {
            log::error!("Failed to render template '{}': {}", template_name, err);
            serve_500(&app_state.error_renderer, None)
        }
    }
}
