// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;

pub mod handlers;
pub mod types;

/// Account routes. Registered as plain resources: a `/users` scope would
/// capture `/users/{action}` document routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users/signin")
            .route(web::get().to(handlers::signin_form))
            .route(web::post().to(handlers::signin)),
    )
    .service(
        web::resource("/users/signup")
            .route(web::get().to(handlers::signup_form))
            .route(web::post().to(handlers::signup)),
    )
    .service(web::resource("/users/signout").route(web::post().to(handlers::signout)));
}
