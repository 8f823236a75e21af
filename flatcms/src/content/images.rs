// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::documents::{DocumentError, is_file, list_files};
use super::kind::is_allowed_image;
use super::locks::KeyedLocks;
use super::names::validate_document_name;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Created,
    Replaced,
}

/// Uploaded images, kept apart from documents.
#[derive(Clone)]
pub struct ImageStore {
    images_dir: PathBuf,
    locks: KeyedLocks,
}

impl ImageStore {
    pub fn new(images_dir: PathBuf) -> Self {
        Self {
            images_dir,
            locks: KeyedLocks::new(),
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub async fn list(&self) -> Result<Vec<String>, DocumentError> {
        Ok(list_files(&self.images_dir).await?)
    }

    pub async fn exists(&self, name: &str) -> bool {
        match self.path(name) {
            Some(path) => is_file(&path).await,
            None => false,
        }
    }

    /// Location of `name`, or `None` when it is not a storable name.
    pub fn path(&self, name: &str) -> Option<PathBuf> {
        validate_document_name(name).ok()?;
        Some(self.images_dir.join(name))
    }

    /// Checks name and type before any bytes are accepted.
    pub fn check_upload_name(&self, name: &str) -> Result<(), DocumentError> {
        validate_document_name(name)?;
        if !is_allowed_image(name) {
            return Err(DocumentError::DisallowedImageType(name.to_string()));
        }
        Ok(())
    }

    /// Stores `bytes` as `name`. The data goes to a hidden temp file first and
    /// is renamed into place, so readers never see a partial image.
    pub async fn save_upload(
        &self,
        name: &str,
        bytes: &[u8],
        overwrite_existing: bool,
    ) -> Result<UploadOutcome, DocumentError> {
        self.check_upload_name(name)?;
        let target = self.images_dir.join(name);

        let _guard = self.locks.lock(name).await;
        let existed = tokio::fs::try_exists(&target).await?;
        if existed && !overwrite_existing {
            return Err(DocumentError::AlreadyExists(name.to_string()));
        }

        let temp_path = self
            .images_dir
            .join(format!(".{}.upload.{}", name, Uuid::new_v4().simple()));
        if let Err(err) = write_new_file(&temp_path, bytes).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(err.into());
        }
        if let Err(err) = tokio::fs::rename(&temp_path, &target).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(err.into());
        }

        if existed {
            log::warn!("Upload replaced existing image '{}'", name);
            Ok(UploadOutcome::Replaced)
        } else {
            log::info!("Stored uploaded image '{}' ({} bytes)", name, bytes.len());
            Ok(UploadOutcome::Created)
        }
    }
}

async fn write_new_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}
