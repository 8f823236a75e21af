// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::CONFIG_FILE_NAME;
use crate::runtime_paths::{DATA_DIR_NAME, IMAGES_DIR_NAME, RuntimePaths, USERS_FILE_NAME};

/// Scratch runtime root under `target/test-fixtures`, removed on drop.
#[derive(Debug)]
pub struct TestFixtureRoot {
    path: PathBuf,
}

impl TestFixtureRoot {
    pub fn new_fixed(name: &str) -> std::io::Result<Self> {
        let root = fixtures_root().join(name);
        if root.exists() {
            fs::remove_dir_all(&root)?;
        }
        fs::create_dir_all(&root)?;
        Ok(Self { path: root })
    }

    pub fn new_unique(prefix: &str) -> std::io::Result<Self> {
        let name = format!("{}-{}", prefix, Uuid::new_v4());
        Self::new_fixed(&name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data_dir(&self) -> PathBuf {
        self.path.join(DATA_DIR_NAME)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.path.join(IMAGES_DIR_NAME)
    }

    pub fn users_file(&self) -> PathBuf {
        self.path.join(USERS_FILE_NAME)
    }

    pub fn init_runtime_layout(&self) -> std::io::Result<()> {
        fs::create_dir_all(self.data_dir())?;
        fs::create_dir_all(self.images_dir())?;
        Ok(())
    }

    pub fn write_document(&self, name: &str, content: &str) -> std::io::Result<()> {
        fs::write(self.data_dir().join(name), content)
    }

    pub fn write_image(&self, name: &str, bytes: &[u8]) -> std::io::Result<()> {
        fs::write(self.images_dir().join(name), bytes)
    }

    pub fn runtime_paths(&self) -> std::io::Result<RuntimePaths> {
        self.init_runtime_layout()?;
        Ok(RuntimePaths {
            root: self.path.canonicalize()?,
            config_file: self.path.join(CONFIG_FILE_NAME),
            users_file: self.users_file(),
            data_dir: self.data_dir().canonicalize()?,
            images_dir: self.images_dir().canonicalize()?,
        })
    }
}

impl Drop for TestFixtureRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn fixtures_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let repo_root = manifest_dir.parent().unwrap_or(&manifest_dir);
    repo_root.join("target").join("test-fixtures")
}
