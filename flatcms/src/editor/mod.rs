// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;

pub mod documents;
pub mod middleware;
pub mod upload;

pub use middleware::{RequireSignedIn, SIGN_IN_REQUIRED_MESSAGE};

/// Routes that change content. Every resource sits behind `RequireSignedIn`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/new")
            .wrap(RequireSignedIn)
            .route(web::get().to(documents::new_form)),
    )
    .service(
        web::resource("/create")
            .wrap(RequireSignedIn)
            .route(web::post().to(documents::create)),
    )
    .service(
        web::resource("/upload")
            .wrap(RequireSignedIn)
            .route(web::get().to(upload::upload_form))
            .route(web::post().to(upload::upload)),
    )
    .service(
        web::resource("/{file}/edit")
            .wrap(RequireSignedIn)
            .route(web::get().to(documents::edit_form))
            .route(web::post().to(documents::save)),
    )
    .service(
        web::resource("/{file}/delete")
            .wrap(RequireSignedIn)
            .route(web::post().to(documents::delete)),
    )
    .service(
        web::resource("/{file}/duplicate")
            .wrap(RequireSignedIn)
            .route(web::post().to(documents::duplicate)),
    )
    .service(
        web::resource("/{file}/rename")
            .wrap(RequireSignedIn)
            .route(web::get().to(documents::rename_form))
            .route(web::post().to(documents::rename)),
    )
    .service(
        web::resource("/{file}/insert-image")
            .wrap(RequireSignedIn)
            .route(web::post().to(documents::insert_image)),
    );
}
