// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::{CONFIG_FILE_NAME, ConfigError};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const USERS_FILE_NAME: &str = "users.yaml";
pub const DATA_DIR_NAME: &str = "data";
pub const IMAGES_DIR_NAME: &str = "images";

#[derive(Debug, Clone)]
pub struct RuntimePaths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub users_file: PathBuf,
    pub data_dir: PathBuf,
    pub images_dir: PathBuf,
}

impl RuntimePaths {
    /// Resolves the layout under `root`. The config and users files must
    /// already exist; the content directories are created on demand.
    pub fn from_root(root: &Path) -> Result<Self, ConfigError> {
        let root = if root.as_os_str().is_empty() {
            Path::new(".")
        } else {
            root
        };
        fs::create_dir_all(root)
            .map_err(|err| invalid("Failed to create runtime root", root, err))?;
        let root = root
            .canonicalize()
            .map_err(|err| invalid("Failed to resolve runtime root", root, err))?;

        let config_file = root.join(CONFIG_FILE_NAME);
        let users_file = root.join(USERS_FILE_NAME);
        for file in [&config_file, &users_file] {
            check_writable_file(file)?;
        }

        Ok(Self {
            data_dir: prepare_content_dir(&root.join(DATA_DIR_NAME))?,
            images_dir: prepare_content_dir(&root.join(IMAGES_DIR_NAME))?,
            config_file,
            users_file,
            root,
        })
    }
}

fn invalid(context: &str, path: &Path, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::ValidationError(format!("{} '{}': {}", context, path.display(), err))
}

fn check_writable_file(path: &Path) -> Result<(), ConfigError> {
    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !path.is_file() {
        return Err(invalid(
            &format!("{} must be a writable file", label),
            path,
            "missing",
        ));
    }
    fs::OpenOptions::new()
        .append(true)
        .open(path)
        .map(drop)
        .map_err(|err| invalid(&format!("{} must be a writable file", label), path, err))
}

/// Creates the directory if needed, proves it accepts new files and returns
/// its canonical form.
fn prepare_content_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    fs::create_dir_all(path).map_err(|err| invalid("Failed to create directory", path, err))?;
    if !path.is_dir() {
        return Err(invalid("Expected a directory", path, "not a directory"));
    }

    // Dot-prefixed so a crash between create and remove never shows up in listings.
    let probe = path.join(format!(".flatcms-write-check-{}", Uuid::new_v4()));
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&probe)
        .map_err(|err| invalid("Directory must be writable", path, err))?;
    fs::remove_file(&probe).map_err(|err| invalid("Failed to remove probe file", &probe, err))?;

    path.canonicalize()
        .map_err(|err| invalid("Failed to resolve directory", path, err))
}
