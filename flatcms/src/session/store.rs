// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::{MAX_IDLE_TIMEOUT_MINUTES, SessionConfig};
use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};

const SESSION_CHANNEL_DEPTH: usize = 256;
const SESSION_ID_PREFIX: &str = "sid_";

/// Everything the server remembers about a browser between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    pub username: Option<String>,
    pub success: Option<String>,
    pub error: Option<String>,
}

impl SessionData {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.success.is_none() && self.error.is_none()
    }
}

/// Server-side session map owned by a single task.
#[derive(Clone)]
pub struct SessionStore {
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        let (sender, receiver) = mpsc::channel(SESSION_CHANNEL_DEPTH);
        let minutes = config.idle_timeout_minutes.min(MAX_IDLE_TIMEOUT_MINUTES);
        let mut state = SessionState::new(Duration::from_secs(minutes * 60), config.max_sessions);
        tokio::spawn(async move {
            state.run(receiver).await;
        });
        Self { sender }
    }

    /// Returns the session and extends its idle deadline.
    pub async fn load(&self, session_id: &str) -> Option<SessionData> {
        let (reply, receive) = oneshot::channel();
        let command = SessionCommand::Load {
            session_id: session_id.to_string(),
            reply,
        };
        if self.sender.send(command).await.is_err() {
            log::error!("🚨 CRITICAL: SessionStore channel closed");
            return None;
        }
        receive.await.unwrap_or(None)
    }

    /// Stores `data`; an empty session is dropped instead.
    pub async fn save(&self, session_id: &str, data: SessionData) {
        let command = if data.is_empty() {
            SessionCommand::Remove {
                session_id: session_id.to_string(),
            }
        } else {
            SessionCommand::Save {
                session_id: session_id.to_string(),
                data,
            }
        };
        if self.sender.send(command).await.is_err() {
            log::error!("🚨 CRITICAL: SessionStore channel closed");
        }
    }

    pub async fn remove(&self, session_id: &str) {
        let command = SessionCommand::Remove {
            session_id: session_id.to_string(),
        };
        if self.sender.send(command).await.is_err() {
            log::error!("🚨 CRITICAL: SessionStore channel closed");
        }
    }

    pub async fn session_count(&self) -> usize {
        let (reply, receive) = oneshot::channel();
        if self.sender.send(SessionCommand::Count { reply }).await.is_err() {
            return 0;
        }
        receive.await.unwrap_or(0)
    }
}

enum SessionCommand {
    Load {
        session_id: String,
        reply: oneshot::Sender<Option<SessionData>>,
    },
    Save {
        session_id: String,
        data: SessionData,
    },
    Remove {
        session_id: String,
    },
    Count {
        reply: oneshot::Sender<usize>,
    },
}

struct SessionRecord {
    data: SessionData,
    expires_at: Instant,
}

struct SessionState {
    sessions: HashMap<String, SessionRecord>,
    session_order: VecDeque<String>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionState {
    fn new(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            session_order: VecDeque::new(),
            idle_timeout,
            max_sessions,
        }
    }

    async fn run(&mut self, mut receiver: mpsc::Receiver<SessionCommand>) {
        while let Some(command) = receiver.recv().await {
            let now = Instant::now();
            match command {
                SessionCommand::Load { session_id, reply } => {
                    let _ = reply.send(self.load(&session_id, now));
                }
                SessionCommand::Save { session_id, data } => {
                    self.save(session_id, data, now);
                }
                SessionCommand::Remove { session_id } => {
                    self.remove(&session_id);
                }
                SessionCommand::Count { reply } => {
                    self.cleanup_expired(now);
                    let _ = reply.send(self.sessions.len());
                }
            }
        }
    }

    /// Idle deadline from `now`; saturates instead of overflowing `Instant`.
    fn deadline(&self, now: Instant) -> Instant {
        now.checked_add(self.idle_timeout)
            .or_else(|| now.checked_add(Duration::from_secs(MAX_IDLE_TIMEOUT_MINUTES * 60)))
            .unwrap_or(now)
    }

    fn load(&mut self, session_id: &str, now: Instant) -> Option<SessionData> {
        let deadline = self.deadline(now);
        let record = self.sessions.get_mut(session_id)?;
        if record.expires_at <= now {
            self.remove(session_id);
            return None;
        }
        record.expires_at = deadline;
        Some(record.data.clone())
    }

    fn save(&mut self, session_id: String, data: SessionData, now: Instant) {
        let expires_at = self.deadline(now);
        if let Some(record) = self.sessions.get_mut(&session_id) {
            record.data = data;
            record.expires_at = expires_at;
            return;
        }

        self.cleanup_expired(now);
        self.sessions
            .insert(session_id.clone(), SessionRecord { data, expires_at });
        self.session_order.push_back(session_id);
        self.prune_overflow();
    }

    fn remove(&mut self, session_id: &str) {
        if self.sessions.remove(session_id).is_some() {
            self.session_order.retain(|id| id != session_id);
        }
    }

    fn cleanup_expired(&mut self, now: Instant) {
        self.sessions.retain(|_, record| record.expires_at > now);
        let sessions = &self.sessions;
        self.session_order.retain(|id| sessions.contains_key(id));
    }

    fn prune_overflow(&mut self) {
        while self.sessions.len() > self.max_sessions {
            match self.session_order.pop_front() {
                Some(oldest) => {
                    log::debug!("Session capacity reached, evicting oldest session");
                    self.sessions.remove(&oldest);
                }
                None => break,
            }
        }
    }
}

pub fn generate_session_id() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    format!("{}{}", SESSION_ID_PREFIX, URL_SAFE_NO_PAD.encode(bytes))
}

/// Cheap shape check so arbitrary cookie values never reach the store.
pub fn is_plausible_session_id(value: &str) -> bool {
    value
        .strip_prefix(SESSION_ID_PREFIX)
        .is_some_and(|rest| {
            !rest.is_empty()
                && rest.len() <= 64
                && rest
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}
