// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::store::SessionData;
use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use std::cell::RefCell;
use std::future::{Ready, ready};
use std::rc::Rc;

/// Per-request session slot shared between the middleware and handlers.
#[derive(Debug, Default)]
pub(crate) struct SessionSlot {
    /// Id of a session that exists in the store.
    pub(crate) id: Option<String>,
    pub(crate) data: SessionData,
    pub(crate) loaded: SessionData,
    /// Issue a fresh id when persisting (sign-in and sign-out).
    pub(crate) rotate: bool,
}

pub(crate) type SessionHandle = Rc<RefCell<SessionSlot>>;

/// One-shot messages shown on the next rendered page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Request-scoped view of the visitor's session. Extract it in handlers;
/// changes are written back once the response is produced.
#[derive(Clone)]
pub struct RequestContext {
    slot: SessionHandle,
}

impl RequestContext {
    pub(crate) fn from_handle(slot: SessionHandle) -> Self {
        Self { slot }
    }

    pub fn username(&self) -> Option<String> {
        self.slot.borrow().data.username.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.slot.borrow().data.username.is_some()
    }

    pub fn sign_in(&self, username: &str) {
        let mut slot = self.slot.borrow_mut();
        slot.data.username = Some(username.to_string());
        slot.rotate = true;
    }

    pub fn sign_out(&self) {
        let mut slot = self.slot.borrow_mut();
        slot.data.username = None;
        slot.rotate = true;
    }

    pub fn flash_success(&self, message: impl Into<String>) {
        self.slot.borrow_mut().data.success = Some(message.into());
    }

    pub fn flash_error(&self, message: impl Into<String>) {
        self.slot.borrow_mut().data.error = Some(message.into());
    }

    /// Removes and returns pending flash messages.
    pub fn take_flash(&self) -> Flash {
        let mut slot = self.slot.borrow_mut();
        Flash {
            success: slot.data.success.take(),
            error: slot.data.error.take(),
        }
    }
}

impl FromRequest for RequestContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(req.session_context().ok_or_else(|| {
            log::error!("Session middleware is not installed for {}", req.path());
            actix_web::error::ErrorInternalServerError("session unavailable")
        }))
    }
}

pub trait SessionRequest {
    fn session_context(&self) -> Option<RequestContext>;
    fn session_username(&self) -> Option<String>;

    fn is_signed_in(&self) -> bool {
        self.session_username().is_some()
    }
}

impl SessionRequest for HttpRequest {
    fn session_context(&self) -> Option<RequestContext> {
        self.extensions()
            .get::<SessionHandle>()
            .cloned()
            .map(RequestContext::from_handle)
    }

    fn session_username(&self) -> Option<String> {
        self.session_context().and_then(|context| context.username())
    }
}
