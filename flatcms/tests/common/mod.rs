// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use flatcms::app_state::AppState;
use flatcms::config::ValidatedConfig;
use flatcms::iam::{UsersData, hash_password, save_users};
use flatcms::session::{SessionData, SessionMiddlewareFactory, generate_session_id};
use flatcms::util::test_config::TEST_PASSWORD_PARAMS;
use flatcms::util::test_fixtures::TestFixtureRoot;
use flatcms::{editor, login, public};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "secret";

pub struct TestHarness {
    pub fixture: TestFixtureRoot,
    pub config: Arc<ValidatedConfig>,
    pub app_state: Arc<AppState>,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::with_config(flatcms::util::test_config()).await
    }

    pub async fn with_config(config: ValidatedConfig) -> Self {
        let fixture = TestFixtureRoot::new_unique("integration").expect("fixture root");
        let runtime_paths = fixture.runtime_paths().expect("runtime paths");

        let mut users = UsersData::new();
        users.insert(
            ADMIN_USERNAME.to_string(),
            hash_password(ADMIN_PASSWORD, &TEST_PASSWORD_PARAMS).expect("admin hash"),
        );
        save_users(&runtime_paths.users_file, &users).expect("seed users");

        let app_state = Arc::new(AppState::new(&config, runtime_paths));

        Self {
            fixture,
            config: Arc::new(config),
            app_state,
        }
    }

    pub fn write_document(&self, name: &str, content: &str) {
        self.fixture
            .write_document(name, content)
            .expect("write document");
    }

    pub fn document_path(&self, name: &str) -> PathBuf {
        self.app_state.runtime_paths.data_dir.join(name)
    }

    pub fn read_document(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.document_path(name)).ok()
    }

    pub fn image_path(&self, name: &str) -> PathBuf {
        self.app_state.runtime_paths.images_dir.join(name)
    }

    /// Creates a server-side session for the admin and returns its cookie.
    pub async fn signed_in_cookie(&self) -> Cookie<'static> {
        let session_id = generate_session_id();
        self.app_state
            .sessions
            .save(
                &session_id,
                SessionData {
                    username: Some(ADMIN_USERNAME.to_string()),
                    ..SessionData::default()
                },
            )
            .await;
        Cookie::new(self.config.session.cookie_name.clone(), session_id)
    }

    pub async fn session_for(&self, cookie: &Cookie<'_>) -> Option<SessionData> {
        self.app_state.sessions.load(cookie.value()).await
    }
}

pub fn build_test_app(
    harness: &TestHarness,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::from(harness.config.clone()))
        .app_data(web::Data::from(harness.app_state.clone()))
        .wrap(SessionMiddlewareFactory::new(
            harness.app_state.sessions.clone(),
            &harness.config.session,
        ))
        .configure(login::configure)
        .configure(editor::configure)
        .configure(public::configure)
        .default_service(web::to(public::handlers::not_found))
}

pub fn location(resp: &ServiceResponse) -> String {
    resp.headers()
        .get("Location")
        .expect("location header")
        .to_str()
        .expect("location string")
        .to_string()
}

pub fn session_cookie(resp: &ServiceResponse, harness: &TestHarness) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == harness.config.session.cookie_name)
        .map(|cookie| cookie.into_owned())
}

pub async fn body_text(resp: ServiceResponse) -> String {
    let body = test::read_body(resp).await;
    String::from_utf8_lossy(&body).into_owned()
}
