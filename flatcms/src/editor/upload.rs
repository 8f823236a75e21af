// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::app_state::AppState;
use crate::config::ValidatedConfig;
use crate::content::{DocumentError, UploadOutcome, image_extension_list};
use crate::public::error::{redirect_to, serve_500};
use crate::session::RequestContext;
use crate::templates::{LayoutContext, render_page};
use actix_multipart::{Field, Multipart};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Result, web};
use futures_util::StreamExt;
use minijinja::context;

const IMAGE_FIELD: &str = "image";

fn render_upload_form(
    app_state: &AppState,
    config: &ValidatedConfig,
    session: &RequestContext,
    error: Option<String>,
    status: StatusCode,
) -> Result<HttpResponse> {
    let mut layout = LayoutContext::new(app_state.error_renderer.app_name(), session);
    if let Some(message) = error {
        layout = layout.with_error(message);
    }
    render_page(
        app_state,
        "editor/upload.html",
        context! {
            allowed_extensions => image_extension_list(),
            max_file_size_mb => config.upload.max_file_size_mb,
            ..layout.to_value("Upload Image")
        },
        status,
    )
}

pub async fn upload_form(
    app_state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    session: RequestContext,
) -> Result<HttpResponse> {
    render_upload_form(&app_state, &config, &session, None, StatusCode::OK)
}

pub async fn upload(
    mut payload: Multipart,
    app_state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    session: RequestContext,
) -> Result<HttpResponse> {
    let mut result = Err(DocumentError::MissingUpload);
    while let Some(field) = payload.next().await {
        let field = field?;
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        result = store_image_field(field, &app_state, &config).await;
        break;
    }

    match result {
        Ok((name, _)) => {
            session.flash_success(format!("{} has been uploaded.", name));
            Ok(redirect_to("/"))
        }
        Err(err) if err.is_user_error() => {
            log::info!("Upload rejected: {}", err);
            render_upload_form(
                &app_state,
                &config,
                &session,
                Some(err.to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            )
        }
        Err(err) => {
            log::error!("Upload failed: {}", err);
            serve_500(&app_state.error_renderer, Some(app_state.templates.as_ref()))
        }
    }
}

/// Reads one file field, enforcing name, type and size before storing it.
async fn store_image_field(
    mut field: Field,
    app_state: &AppState,
    config: &ValidatedConfig,
) -> Result<(String, UploadOutcome), DocumentError> {
    let name = field
        .content_disposition()
        .and_then(|disposition| disposition.get_filename())
        .map(base_name)
        .unwrap_or_default();
    if name.is_empty() {
        return Err(DocumentError::MissingUpload);
    }
    app_state.images.check_upload_name(&name)?;

    let limit = config.upload.max_file_size_bytes();
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk =
            chunk.map_err(|err| DocumentError::Io(std::io::Error::other(err.to_string())))?;
        bytes.extend_from_slice(&chunk);
        if let Some(limit) = limit
            && bytes.len() as u64 > limit
        {
            return Err(DocumentError::TooLarge {
                name,
                limit_mb: config.upload.max_file_size_mb,
            });
        }
    }

    let outcome = app_state
        .images
        .save_upload(&name, &bytes, config.upload.overwrite_existing)
        .await?;
    Ok((name, outcome))
}

/// Browsers may send a full client path; keep only the last component.
fn base_name(filename: &str) -> String {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
