// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::context::{SessionHandle, SessionSlot};
use super::store::{SessionStore, generate_session_id, is_plausible_session_id};
use crate::config::SessionConfig;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{Error, HttpMessage};
use std::cell::RefCell;
use std::future::{Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

#[derive(Clone)]
struct CookieSettings {
    name: String,
    secure: bool,
}

/// Loads the session named by the cookie before the handler runs and
/// persists any change after it returns.
pub struct SessionMiddlewareFactory {
    store: SessionStore,
    cookie: CookieSettings,
}

impl SessionMiddlewareFactory {
    pub fn new(store: SessionStore, config: &SessionConfig) -> Self {
        Self {
            store,
            cookie: CookieSettings {
                name: config.cookie_name.clone(),
                secure: config.secure_cookie,
            },
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddleware {
            service: Rc::new(service),
            store: self.store.clone(),
            cookie: self.cookie.clone(),
        }))
    }
}

pub struct SessionMiddleware<S> {
    service: Rc<S>,
    store: SessionStore,
    cookie: CookieSettings,
}

impl<S, B> Service<ServiceRequest> for SessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let store = self.store.clone();
        let cookie = self.cookie.clone();

        Box::pin(async move {
            let cookie_id = req
                .cookie(&cookie.name)
                .map(|c| c.value().to_string())
                .filter(|value| is_plausible_session_id(value));

            let mut slot = SessionSlot::default();
            if let Some(id) = cookie_id
                && let Some(data) = store.load(&id).await
            {
                slot.id = Some(id);
                slot.loaded = data.clone();
                slot.data = data;
            }

            let handle: SessionHandle = Rc::new(RefCell::new(slot));
            req.extensions_mut().insert(handle.clone());

            let mut res = service.call(req).await?;

            let slot = std::mem::take(&mut *handle.borrow_mut());
            if let Some(new_id) = persist(&store, slot).await {
                let session_cookie = Cookie::build(cookie.name.clone(), new_id)
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .secure(cookie.secure)
                    .finish();
                if let Err(err) = res.response_mut().add_cookie(&session_cookie) {
                    log::error!("Failed to set session cookie: {}", err);
                }
            }

            Ok(res)
        })
    }
}

/// Writes the slot back to the store. Returns the id to send to the
/// browser when a new one was issued.
async fn persist(store: &SessionStore, slot: SessionSlot) -> Option<String> {
    let SessionSlot {
        mut id,
        data,
        loaded,
        rotate,
    } = slot;

    if rotate && let Some(old_id) = id.take() {
        store.remove(&old_id).await;
    }

    match id {
        Some(existing) => {
            if data != loaded {
                store.save(&existing, data).await;
            }
            None
        }
        None if data.is_empty() => None,
        None => {
            let new_id = generate_session_id();
            store.save(&new_id, data).await;
            Some(new_id)
        }
    }
}
