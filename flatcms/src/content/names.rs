// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::kind::is_allowed_image;
use std::path::Path;

/// Extension appended to new names that have none.
pub const DEFAULT_EXTENSION: &str = "txt";

#[derive(Debug, PartialEq, Eq)]
pub enum NameError {
    Empty,
    Invalid(String),
    ImageExtension(String),
}

/// Checks a bare file name for a flat directory: no separators, no `..`,
/// no leading dot and no control characters.
pub fn validate_document_name(name: &str) -> Result<(), NameError> {
    if name.trim().is_empty() {
        return Err(NameError::Empty);
    }
    let invalid = name != name.trim()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.starts_with('.')
        || name.chars().any(char::is_control)
        || Path::new(name).is_absolute();
    if invalid {
        return Err(NameError::Invalid(name.to_string()));
    }
    Ok(())
}

/// Trims user input, appends `.txt` when there is no extension and validates.
/// Image extensions are refused: those names are served from `images/`.
pub fn normalize_new_name(input: &str) -> Result<String, NameError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }
    let name = if Path::new(trimmed).extension().is_some() {
        trimmed.to_string()
    } else {
        format!("{}.{}", trimmed, DEFAULT_EXTENSION)
    };
    validate_document_name(&name)?;
    if is_allowed_image(&name) {
        return Err(NameError::ImageExtension(name));
    }
    Ok(name)
}
