// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use crate::config::CONFIG_FILE_NAME;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4567;
const DEFAULT_WORKERS: u16 = 4;

/// Writes a default `config.yaml` unless one already exists.
pub fn ensure_config(root: &Path) -> Result<bool, BootstrapError> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        return Ok(false);
    }

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&config_path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };

    file.write_all(default_config_yaml().as_bytes())?;
    file.sync_all()?;

    log_action(format!(
        "created {} listening on {}:{}",
        CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT
    ));

    Ok(true)
}

fn default_config_yaml() -> String {
    format!(
        "server:\n  host: \"{host}\"\n  port: {port}\n  workers: {workers}\n\napp:\n  name: \"flatcms\"\n  description: \"A flat-file document manager\"\n\nlogging:\n  level: \"info\"\n\nsession:\n  cookie_name: \"flatcms_session\"\n  idle_timeout_minutes: 120\n  max_sessions: 10000\n  secure_cookie: false\n\nupload:\n  max_file_size_mb: 10\n  overwrite_existing: true\n\npassword:\n  memory_kib: 19456\n  iterations: 2\n  parallelism: 1\n",
        host = DEFAULT_HOST,
        port = DEFAULT_PORT,
        workers = DEFAULT_WORKERS,
    )
}
