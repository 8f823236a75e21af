// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::error::{self, document_error_response, redirect_with_error};
use super::markdown::render_document_body;
use crate::app_state::AppState;
use crate::content::{DocumentError, DocumentKind};
use crate::security::{PathCheck, canonical_path_checks};
use crate::session::RequestContext;
use crate::templates::{LayoutContext, render_page};
use crate::util::detect_mime_type;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Result, web};
use log::debug;
use minijinja::context;

pub async fn index(
    app_state: web::Data<AppState>,
    session: RequestContext,
) -> Result<HttpResponse> {
    let listing = async {
        Ok::<_, DocumentError>((
            app_state.documents.list().await?,
            app_state.images.list().await?,
        ))
    };
    let (documents, images) = match listing.await {
        Ok(listing) => listing,
        Err(err) => {
            return document_error_response(
                err,
                &session,
                &app_state.error_renderer,
                app_state.templates.as_ref(),
                "/",
            );
        }
    };

    let layout = LayoutContext::new(app_state.error_renderer.app_name(), &session);
    render_page(
        &app_state,
        "public/index.html",
        context! {
            documents => documents,
            images => images,
            ..layout.to_value("Documents")
        },
        StatusCode::OK,
    )
}

pub async fn view_document(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
    session: RequestContext,
) -> Result<HttpResponse> {
    let name = path.into_inner();
    let kind = DocumentKind::from_name(&name);

    let (template_kind, body) = if kind == DocumentKind::Image {
        if !app_state.images.exists(&name).await {
            debug!("Image page requested for missing '{}'", name);
            return Ok(redirect_with_error(
                &session,
                DocumentError::NotFound(name).to_string(),
                "/",
            ));
        }
        ("image", String::new())
    } else {
        let source = match app_state.documents.read(&name).await {
            Ok(source) => source,
            Err(err) => {
                return document_error_response(
                    err,
                    &session,
                    &app_state.error_renderer,
                    app_state.templates.as_ref(),
                    "/",
                );
            }
        };
        let body = render_document_body(kind, source, &app_state.html_sanitizer);
        (body.template_kind(), body.into_inner())
    };

    let layout = LayoutContext::new(app_state.error_renderer.app_name(), &session);
    render_page(
        &app_state,
        "public/document.html",
        context! {
            name => &name,
            kind => template_kind,
            body => body,
            ..layout.to_value(&name)
        },
        StatusCode::OK,
    )
}

pub async fn serve_image(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let name = path.into_inner();
    let not_found = || {
        error::serve_404(
            &app_state.error_renderer,
            Some(app_state.templates.as_ref()),
        )
    };

    let Some(candidate) = app_state.images.path(&name) else {
        return not_found();
    };
    let resolved = match canonical_path_checks(&candidate, app_state.images.images_dir()) {
        Ok(resolved) => resolved,
        Err(PathCheck::Missing) | Err(PathCheck::Escaped) => return not_found(),
    };

    let bytes = match tokio::fs::read(&resolved).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return not_found(),
        Err(err) => {
            log::error!("Failed to read image '{}': {}", name, err);
            return error::serve_500(&app_state.error_renderer, Some(app_state.templates.as_ref()));
        }
    };

    let mime_type = detect_mime_type(&resolved, &bytes);
    Ok(HttpResponse::Ok()
        .content_type(mime_type)
        .insert_header(("Cache-Control", "no-cache"))
        .insert_header(("X-Content-Type-Options", "nosniff"))
        .body(bytes))
}

pub async fn not_found(app_state: web::Data<AppState>) -> Result<HttpResponse> {
    error::serve_404(&app_state.error_renderer, Some(app_state.templates.as_ref()))
}
