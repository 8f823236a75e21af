// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::session::SessionRequest;
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::LOCATION,
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

pub const SIGN_IN_REQUIRED_MESSAGE: &str = "You must be signed in to do that.";

/// Middleware that requires a signed-in session - otherwise flashes an error and redirects to /
pub struct RequireSignedIn;

impl<S, B> Transform<S, ServiceRequest> for RequireSignedIn
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireSignedInService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSignedInService { service }))
    }
}

pub struct RequireSignedInService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireSignedInService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !req.request().is_signed_in() {
            log::info!(
                "Blocked {} {} without a signed-in session",
                req.method(),
                req.path()
            );
            if let Some(session) = req.request().session_context() {
                session.flash_error(SIGN_IN_REQUIRED_MESSAGE);
            }

            let (req, _) = req.into_parts();
            let response = HttpResponse::Found()
                .insert_header((LOCATION, "/"))
                .finish()
                .map_into_right_body();

            return Box::pin(async move { Ok(ServiceResponse::new(req, response)) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            // Map normal responses to left body
            fut.await.map(ServiceResponse::map_into_left_body)
        })
    }
}
