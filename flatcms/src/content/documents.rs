// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::images::ImageStore;
use super::kind::{DocumentKind, image_extension_list};
use super::locks::KeyedLocks;
use super::names::{NameError, normalize_new_name, validate_document_name};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Prefix given to duplicated documents.
pub const COPY_PREFIX: &str = "copy_";

#[derive(Debug)]
pub enum DocumentError {
    NotFound(String),
    AlreadyExists(String),
    InvalidName(String),
    ImageName(String),
    EmptyName,
    UnsupportedImageTarget(String),
    DisallowedImageType(String),
    MissingUpload,
    TooLarge { name: String, limit_mb: u64 },
    Io(std::io::Error),
}

impl DocumentError {
    /// Errors caused by the request rather than the server.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, DocumentError::Io(_))
    }
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::NotFound(name) => write!(f, "{} does not exist.", name),
            DocumentError::AlreadyExists(name) => write!(f, "{} already exists.", name),
            DocumentError::InvalidName(name) => {
                write!(f, "{} is not a valid document name.", name)
            }
            DocumentError::ImageName(name) => write!(
                f,
                "{} is an image name. Images are added from the upload page.",
                name
            ),
            DocumentError::EmptyName => write!(f, "A name is required."),
            DocumentError::UnsupportedImageTarget(_) => write!(
                f,
                "Images can only be inserted into Markdown or HTML documents."
            ),
            DocumentError::DisallowedImageType(_) => write!(
                f,
                "Only {} files can be uploaded.",
                image_extension_list()
            ),
            DocumentError::MissingUpload => write!(f, "Choose an image to upload."),
            DocumentError::TooLarge { name, limit_mb } => {
                write!(f, "{} is larger than the {} MB upload limit.", name, limit_mb)
            }
            DocumentError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DocumentError {
    fn from(err: std::io::Error) -> Self {
        DocumentError::Io(err)
    }
}

impl From<NameError> for DocumentError {
    fn from(err: NameError) -> Self {
        match err {
            NameError::Empty => DocumentError::EmptyName,
            NameError::Invalid(name) => DocumentError::InvalidName(name),
            NameError::ImageExtension(name) => DocumentError::ImageName(name),
        }
    }
}

/// Flat directory of text documents. Every mutation holds the lock of each
/// name it touches.
#[derive(Clone)]
pub struct DocumentStore {
    data_dir: PathBuf,
    locks: KeyedLocks,
}

impl DocumentStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            locks: KeyedLocks::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub async fn list(&self) -> Result<Vec<String>, DocumentError> {
        Ok(list_files(&self.data_dir).await?)
    }

    pub async fn exists(&self, name: &str) -> bool {
        match self.existing_path(name) {
            Ok(path) => is_file(&path).await,
            Err(_) => false,
        }
    }

    /// Reads under the name's lock so a concurrent save or insert is never
    /// observed half written.
    pub async fn read(&self, name: &str) -> Result<String, DocumentError> {
        let path = self.existing_path(name)?;
        let _guard = self.locks.lock(name).await;
        if !is_file(&path).await {
            return Err(DocumentError::NotFound(name.to_string()));
        }
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(err) => Err(not_found_or_io(err, name)),
        }
    }

    /// Replaces the whole content of an existing document.
    pub async fn save(&self, name: &str, contents: &str) -> Result<(), DocumentError> {
        let path = self.existing_path(name)?;
        let _guard = self.locks.lock(name).await;
        if !is_file(&path).await {
            return Err(DocumentError::NotFound(name.to_string()));
        }
        tokio::fs::write(&path, contents).await?;
        log::info!("Saved document '{}' ({} bytes)", name, contents.len());
        Ok(())
    }

    /// Creates an empty document from user input and returns the stored name.
    pub async fn create(&self, input: &str) -> Result<String, DocumentError> {
        let name = normalize_new_name(input)?;
        let path = self.data_dir.join(&name);
        let _guard = self.locks.lock(&name).await;
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(_) => {
                log::info!("Created document '{}'", name);
                Ok(name)
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                Err(DocumentError::AlreadyExists(name))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete(&self, name: &str) -> Result<(), DocumentError> {
        let path = self.existing_path(name)?;
        let _guard = self.locks.lock(name).await;
        if !is_file(&path).await {
            return Err(DocumentError::NotFound(name.to_string()));
        }
        tokio::fs::remove_file(&path)
            .await
            .map_err(|err| not_found_or_io(err, name))?;
        log::info!("Deleted document '{}'", name);
        Ok(())
    }

    /// Copies `name` to `copy_<name>` and returns the new name.
    pub async fn duplicate(&self, name: &str) -> Result<String, DocumentError> {
        let source = self.existing_path(name)?;
        let copy_name = format!("{}{}", COPY_PREFIX, name);
        validate_document_name(&copy_name)?;
        let target = self.data_dir.join(&copy_name);

        let _guard = self.locks.lock_many(&[name, &copy_name]).await;
        if !is_file(&source).await {
            return Err(DocumentError::NotFound(name.to_string()));
        }
        let contents = tokio::fs::read(&source)
            .await
            .map_err(|err| not_found_or_io(err, name))?;
        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(DocumentError::AlreadyExists(copy_name));
            }
            Err(err) => return Err(err.into()),
        };
        file.write_all(&contents).await?;
        file.flush().await?;
        log::info!("Duplicated document '{}' as '{}'", name, copy_name);
        Ok(copy_name)
    }

    /// Renames `name` using the normalized `new_input` and returns the new name.
    pub async fn rename(&self, name: &str, new_input: &str) -> Result<String, DocumentError> {
        let source = self.existing_path(name)?;
        let new_name = normalize_new_name(new_input)?;
        let target = self.data_dir.join(&new_name);

        let _guard = self.locks.lock_many(&[name, &new_name]).await;
        if !is_file(&source).await {
            return Err(DocumentError::NotFound(name.to_string()));
        }
        if new_name == name || tokio::fs::try_exists(&target).await? {
            return Err(DocumentError::AlreadyExists(new_name));
        }
        tokio::fs::rename(&source, &target).await?;
        log::info!("Renamed document '{}' to '{}'", name, new_name);
        Ok(new_name)
    }

    /// Appends a reference to `image` on its own line and returns the snippet.
    pub async fn insert_image_reference(
        &self,
        name: &str,
        image: &str,
        images: &ImageStore,
    ) -> Result<String, DocumentError> {
        let path = self.existing_path(name)?;
        let _guard = self.locks.lock(name).await;
        if !is_file(&path).await {
            return Err(DocumentError::NotFound(name.to_string()));
        }
        let snippet = DocumentKind::from_name(name)
            .image_reference(image)
            .ok_or_else(|| DocumentError::UnsupportedImageTarget(name.to_string()))?;
        if !images.exists(image).await {
            return Err(DocumentError::NotFound(image.to_string()));
        }

        let current = tokio::fs::read(&path)
            .await
            .map_err(|err| not_found_or_io(err, name))?;
        let mut addition = String::new();
        if !current.is_empty() && !current.ends_with(b"\n") {
            addition.push('\n');
        }
        addition.push_str(&snippet);
        addition.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .await?;
        file.write_all(addition.as_bytes()).await?;
        file.flush().await?;
        log::info!("Inserted image '{}' into '{}'", image, name);
        Ok(snippet)
    }

    /// Path of a document that is expected to exist. Names that could never
    /// have been stored are reported as missing.
    fn existing_path(&self, name: &str) -> Result<PathBuf, DocumentError> {
        validate_document_name(name).map_err(|_| DocumentError::NotFound(name.to_string()))?;
        Ok(self.data_dir.join(name))
    }
}

/// Sorted names of the regular files in `dir`, dot-files excluded.
pub(crate) async fn list_files(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            log::warn!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

pub(crate) async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

fn not_found_or_io(err: std::io::Error, name: &str) -> DocumentError {
    if err.kind() == ErrorKind::NotFound {
        DocumentError::NotFound(name.to_string())
    } else {
        DocumentError::Io(err)
    }
}
