// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::types::{
    ACCOUNT_CREATED_MESSAGE, INVALID_CREDENTIALS_MESSAGE, MISSING_CREDENTIALS_MESSAGE,
    PASSWORD_MISMATCH_MESSAGE, SIGNED_OUT_MESSAGE, SignInForm, SignUpForm,
    USERNAME_TAKEN_MESSAGE, WELCOME_MESSAGE,
};
use crate::app_state::AppState;
use crate::iam::{RegisterOutcome, UserStoreError};
use crate::public::error::{redirect_to, serve_500};
use crate::session::RequestContext;
use crate::templates::{LayoutContext, render_page};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Result, web};
use minijinja::context;

const SIGN_IN_PATH: &str = "/users/signin";

fn render_account_form(
    app_state: &AppState,
    session: &RequestContext,
    template_name: &str,
    title: &str,
    form_username: &str,
    error: Option<&str>,
) -> Result<HttpResponse> {
    let mut layout = LayoutContext::new(app_state.error_renderer.app_name(), session);
    let status = match error {
        Some(message) => {
            layout = layout.with_error(message);
            StatusCode::UNPROCESSABLE_ENTITY
        }
        None => StatusCode::OK,
    };
    render_page(
        app_state,
        template_name,
        context! {
            form_username => form_username,
            ..layout.to_value(title)
        },
        status,
    )
}

fn storage_failure(app_state: &AppState, err: UserStoreError) -> Result<HttpResponse> {
    log::error!("User store failure: {}", err);
    serve_500(&app_state.error_renderer, Some(app_state.templates.as_ref()))
}

pub async fn signin_form(
    app_state: web::Data<AppState>,
    session: RequestContext,
) -> Result<HttpResponse> {
    render_account_form(&app_state, &session, "users/signin.html", "Sign In", "", None)
}

pub async fn signin(
    form: web::Form<SignInForm>,
    app_state: web::Data<AppState>,
    session: RequestContext,
) -> Result<HttpResponse> {
    let username = form.username.trim();
    let authenticated = if username.is_empty() || form.password.is_empty() {
        false
    } else {
        match app_state.users.authenticate(username, &form.password).await {
            Ok(authenticated) => authenticated,
            Err(err) => return storage_failure(&app_state, err),
        }
    };

    if !authenticated {
        log::info!("Failed sign-in attempt for '{}'", username);
        return render_account_form(
            &app_state,
            &session,
            "users/signin.html",
            "Sign In",
            username,
            Some(INVALID_CREDENTIALS_MESSAGE),
        );
    }

    log::info!("User '{}' signed in", username);
    session.sign_in(username);
    session.flash_success(WELCOME_MESSAGE);
    Ok(redirect_to("/"))
}

pub async fn signup_form(
    app_state: web::Data<AppState>,
    session: RequestContext,
) -> Result<HttpResponse> {
    render_account_form(&app_state, &session, "users/signup.html", "Sign Up", "", None)
}

pub async fn signup(
    form: web::Form<SignUpForm>,
    app_state: web::Data<AppState>,
    session: RequestContext,
) -> Result<HttpResponse> {
    let username = form.username.trim();
    let reject = |message: &str| {
        render_account_form(
            &app_state,
            &session,
            "users/signup.html",
            "Sign Up",
            username,
            Some(message),
        )
    };

    if username.is_empty() || form.password.is_empty() {
        return reject(MISSING_CREDENTIALS_MESSAGE);
    }
    match app_state.users.contains(username).await {
        Ok(true) => return reject(USERNAME_TAKEN_MESSAGE),
        Ok(false) => {}
        Err(err) => return storage_failure(&app_state, err),
    }
    if form.password != form.verify_password {
        return reject(PASSWORD_MISMATCH_MESSAGE);
    }

    match app_state.users.register(username, &form.password).await {
        Ok(RegisterOutcome::Created) => {
            session.flash_success(ACCOUNT_CREATED_MESSAGE);
            Ok(redirect_to(SIGN_IN_PATH))
        }
        Ok(RegisterOutcome::UsernameTaken) => reject(USERNAME_TAKEN_MESSAGE),
        Err(err) => storage_failure(&app_state, err),
    }
}

pub async fn signout(session: RequestContext) -> Result<HttpResponse> {
    if let Some(username) = session.username() {
        log::info!("User '{}' signed out", username);
    }
    session.sign_out();
    session.flash_success(SIGNED_OUT_MESSAGE);
    Ok(redirect_to("/"))
}
