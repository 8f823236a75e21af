// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::content::DocumentError;
use crate::session::RequestContext;
use crate::templates::{ErrorPageContext, TemplateEngine, render_minijinja_template};
use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, Result};

#[derive(Clone)]
pub struct ErrorRenderer {
    app_name: String,
}

impl ErrorRenderer {
    pub fn new(app_name: String) -> Self {
        Self { app_name }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}

pub fn serve_404(
    renderer: &ErrorRenderer,
    template_engine: Option<&dyn TemplateEngine>,
) -> Result<HttpResponse> {
    let html = render_error_page(
        renderer.app_name(),
        template_engine,
        "error_404.html",
        fallback_404_html,
    );
    Ok(no_store(HttpResponse::NotFound()).body(html))
}

pub fn serve_500(
    renderer: &ErrorRenderer,
    template_engine: Option<&dyn TemplateEngine>,
) -> Result<HttpResponse> {
    let html = render_error_page(
        renderer.app_name(),
        template_engine,
        "error_500.html",
        fallback_500_html,
    );
    Ok(no_store(HttpResponse::InternalServerError()).body(html))
}

fn render_error_page(
    app_name: &str,
    template_engine: Option<&dyn TemplateEngine>,
    template_name: &str,
    fallback: fn(&str) -> String,
) -> String {
    let context = ErrorPageContext::new(app_name).to_value();
    match template_engine {
        Some(engine) => match render_minijinja_template(engine, template_name, context) {
            Ok(html) => html,
            Err(e) => {
                log::error!("Failed to render {} error template: {}", template_name, e);
                fallback(app_name)
            }
        },
        None => fallback(app_name),
    }
}

fn no_store(mut builder: actix_web::HttpResponseBuilder) -> actix_web::HttpResponseBuilder {
    builder
        .content_type("text/html; charset=utf-8")
        .insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
        .insert_header(("Pragma", "no-cache"))
        .insert_header(("Expires", "0"));
    builder
}

/// 302 to `location`.
pub fn redirect_to(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location))
        .finish()
}

/// Flashes `message` as an error and redirects.
pub fn redirect_with_error(
    session: &RequestContext,
    message: impl Into<String>,
    location: &str,
) -> HttpResponse {
    session.flash_error(message);
    redirect_to(location)
}

/// Request mistakes become a flash error and a redirect; I/O failures are
/// logged and answered with the 500 page.
pub fn document_error_response(
    err: DocumentError,
    session: &RequestContext,
    renderer: &ErrorRenderer,
    template_engine: &dyn TemplateEngine,
    location: &str,
) -> Result<HttpResponse> {
    if err.is_user_error() {
        log::debug!("Rejected document request: {}", err);
        return Ok(redirect_with_error(session, err.to_string(), location));
    }
    log::error!("Document operation failed: {}", err);
    serve_500(renderer, Some(template_engine))
}

fn fallback_404_html(app_name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>404 - Page Not Found | {}</title></head>
<body><h1>404 - Page Not Found</h1></body></html>"#,
        app_name
    )
}

fn fallback_500_html(app_name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>500 - Internal Server Error | {}</title></head>
<body><h1>500 - Internal Server Error</h1></body></html>"#,
        app_name
    )
}
