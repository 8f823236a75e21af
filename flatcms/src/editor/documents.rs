// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::app_state::AppState;
use crate::content::{DocumentError, DocumentKind};
use crate::public::error::{document_error_response, redirect_to};
use crate::session::RequestContext;
use crate::templates::{LayoutContext, render_page};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Result, web};
use minijinja::context;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct NewDocumentForm {
    #[serde(default)]
    pub new_document: String,
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub file_contents: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameForm {
    #[serde(default)]
    pub new_name: String,
}

#[derive(Debug, Deserialize)]
pub struct InsertImageForm {
    #[serde(default)]
    pub image: String,
}

fn failure(
    app_state: &AppState,
    session: &RequestContext,
    err: DocumentError,
) -> Result<HttpResponse> {
    document_error_response(
        err,
        session,
        &app_state.error_renderer,
        app_state.templates.as_ref(),
        "/",
    )
}

fn render_new_form(
    app_state: &AppState,
    session: &RequestContext,
    new_document: &str,
    error: Option<String>,
    status: StatusCode,
) -> Result<HttpResponse> {
    let mut layout = LayoutContext::new(app_state.error_renderer.app_name(), session);
    if let Some(message) = error {
        layout = layout.with_error(message);
    }
    render_page(
        app_state,
        "editor/new.html",
        context! {
            new_document => new_document,
            ..layout.to_value("New Document")
        },
        status,
    )
}

fn render_rename_form(
    app_state: &AppState,
    session: &RequestContext,
    name: &str,
    new_name: &str,
    error: Option<String>,
    status: StatusCode,
) -> Result<HttpResponse> {
    let mut layout = LayoutContext::new(app_state.error_renderer.app_name(), session);
    if let Some(message) = error {
        layout = layout.with_error(message);
    }
    render_page(
        app_state,
        "editor/rename.html",
        context! {
            name => name,
            new_name => new_name,
            ..layout.to_value(&format!("Rename {}", name))
        },
        status,
    )
}

pub async fn new_form(
    app_state: web::Data<AppState>,
    session: RequestContext,
) -> Result<HttpResponse> {
    render_new_form(&app_state, &session, "", None, StatusCode::OK)
}

pub async fn create(
    form: web::Form<NewDocumentForm>,
    app_state: web::Data<AppState>,
    session: RequestContext,
) -> Result<HttpResponse> {
    match app_state.documents.create(&form.new_document).await {
        Ok(name) => {
            session.flash_success(format!("{} has been created.", name));
            Ok(redirect_to("/"))
        }
        Err(err) if err.is_user_error() => render_new_form(
            &app_state,
            &session,
            form.new_document.trim(),
            Some(err.to_string()),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        Err(err) => failure(&app_state, &session, err),
    }
}

pub async fn edit_form(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
    session: RequestContext,
) -> Result<HttpResponse> {
    let name = path.into_inner();
    let contents = match app_state.documents.read(&name).await {
        Ok(contents) => contents,
        Err(err) => return failure(&app_state, &session, err),
    };
    let accepts_images = DocumentKind::from_name(&name).accepts_image_references();
    let images = if accepts_images {
        match app_state.images.list().await {
            Ok(images) => images,
            Err(err) => return failure(&app_state, &session, err),
        }
    } else {
        Vec::new()
    };

    let layout = LayoutContext::new(app_state.error_renderer.app_name(), &session);
    render_page(
        &app_state,
        "editor/edit.html",
        context! {
            name => &name,
            contents => contents,
            accepts_images => accepts_images,
            images => images,
            ..layout.to_value(&format!("Edit {}", name))
        },
        StatusCode::OK,
    )
}

pub async fn save(
    path: web::Path<String>,
    form: web::Form<EditForm>,
    app_state: web::Data<AppState>,
    session: RequestContext,
) -> Result<HttpResponse> {
    let name = path.into_inner();
    match app_state.documents.save(&name, &form.file_contents).await {
        Ok(()) => {
            session.flash_success(format!("{} has been updated.", name));
            Ok(redirect_to("/"))
        }
        Err(err) => failure(&app_state, &session, err),
    }
}

pub async fn delete(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
    session: RequestContext,
) -> Result<HttpResponse> {
    let name = path.into_inner();
    match app_state.documents.delete(&name).await {
        Ok(()) => {
            session.flash_success(format!("{} has been deleted.", name));
            Ok(redirect_to("/"))
        }
        Err(err) => failure(&app_state, &session, err),
    }
}

pub async fn duplicate(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
    session: RequestContext,
) -> Result<HttpResponse> {
    let name = path.into_inner();
    match app_state.documents.duplicate(&name).await {
        Ok(copy_name) => {
            session.flash_success(format!("{} has been duplicated as {}.", name, copy_name));
            Ok(redirect_to("/"))
        }
        Err(err) => failure(&app_state, &session, err),
    }
}

pub async fn rename_form(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
    session: RequestContext,
) -> Result<HttpResponse> {
    let name = path.into_inner();
    if !app_state.documents.exists(&name).await {
        return failure(&app_state, &session, DocumentError::NotFound(name));
    }
    render_rename_form(&app_state, &session, &name, &name, None, StatusCode::OK)
}

pub async fn rename(
    path: web::Path<String>,
    form: web::Form<RenameForm>,
    app_state: web::Data<AppState>,
    session: RequestContext,
) -> Result<HttpResponse> {
    let name = path.into_inner();
    match app_state.documents.rename(&name, &form.new_name).await {
        Ok(new_name) => {
            session.flash_success(format!("{} has been renamed to {}.", name, new_name));
            Ok(redirect_to("/"))
        }
        Err(err @ DocumentError::NotFound(_)) => failure(&app_state, &session, err),
        Err(err) if err.is_user_error() => render_rename_form(
            &app_state,
            &session,
            &name,
            form.new_name.trim(),
            Some(err.to_string()),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        Err(err) => failure(&app_state, &session, err),
    }
}

pub async fn insert_image(
    path: web::Path<String>,
    form: web::Form<InsertImageForm>,
    app_state: web::Data<AppState>,
    session: RequestContext,
) -> Result<HttpResponse> {
    let name = path.into_inner();
    let image = form.image.trim();
    match app_state
        .documents
        .insert_image_reference(&name, image, &app_state.images)
        .await
    {
        Ok(_) => {
            session.flash_success(format!("{} has been inserted into {}.", image, name));
            Ok(redirect_to("/"))
        }
        Err(err) => failure(&app_state, &session, err),
    }
}
