// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const MAX_TEMP_ATTEMPTS: u32 = 100;

#[derive(Debug)]
pub struct YamlStoreError {
    message: String,
}

impl YamlStoreError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for YamlStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for YamlStoreError {}

/// Reads and decodes `path`; a missing or blank file yields `None`.
pub(crate) fn read_yaml_file<T: DeserializeOwned>(
    path: &Path,
    label: &str,
) -> Result<Option<T>, YamlStoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(YamlStoreError::new(format!(
                "Failed to read {} file: {}",
                label, err
            )));
        }
    };
    if content.trim().is_empty() {
        return Ok(None);
    }
    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|err| YamlStoreError::new(format!("Failed to parse {} file: {}", label, err)))
}

/// Replaces `path` atomically: temp file in the same directory, fsync, rename.
pub(crate) fn write_yaml_file<T: Serialize>(
    path: &Path,
    label: &str,
    value: &T,
) -> Result<(), YamlStoreError> {
    let content = serde_yaml::to_string(value)
        .map_err(|err| YamlStoreError::new(format!("Failed to serialize {}: {}", label, err)))?;
    let parent = path
        .parent()
        .ok_or_else(|| YamlStoreError::new(format!("{} file path has no parent", label)))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| YamlStoreError::new(format!("{} file path has no file name", label)))?;

    let (mut file, temp_path) = create_temp_file(parent, file_name, label)?;
    let discard = |step: &str, err: std::io::Error| {
        let _ = fs::remove_file(&temp_path);
        YamlStoreError::new(format!("Failed to {} {} file: {}", step, label, err))
    };

    #[cfg(unix)]
    {
        if let Ok(metadata) = fs::metadata(path) {
            fs::set_permissions(&temp_path, metadata.permissions())
                .map_err(|err| discard("set permissions on temp", err))?;
        }
    }

    file.write_all(content.as_bytes())
        .map_err(|err| discard("write temp", err))?;
    file.sync_all().map_err(|err| discard("sync temp", err))?;
    fs::rename(&temp_path, path).map_err(|err| discard("replace", err))?;

    #[cfg(unix)]
    {
        if let Err(err) = fs::File::open(parent).and_then(|dir| dir.sync_all()) {
            log::warn!("Directory sync after writing {} failed: {}", label, err);
        }
    }

    Ok(())
}

fn create_temp_file(
    parent: &Path,
    file_name: &str,
    label: &str,
) -> Result<(fs::File, PathBuf), YamlStoreError> {
    for attempt in 0..MAX_TEMP_ATTEMPTS {
        let temp_path = parent.join(format!(
            ".{}.tmp.{}.{}",
            file_name,
            std::process::id(),
            attempt
        ));
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
        {
            Ok(file) => return Ok((file, temp_path)),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(YamlStoreError::new(format!(
                    "Failed to create temp {} file: {}",
                    label, err
                )));
            }
        }
    }
    Err(YamlStoreError::new(format!(
        "Failed to create temp {} file after {} attempts",
        label, MAX_TEMP_ATTEMPTS
    )))
}
