// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::warn;
use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq, Eq)]
pub enum PathCheck {
    /// The file does not exist (or cannot be resolved).
    Missing,
    /// The file resolves outside the allowed directory.
    Escaped,
}

/// Resolves `file_path` and makes sure it stays inside `base_dir_canonical`.
/// Symlinks pointing out of the directory are treated as escapes.
pub fn canonical_path_checks(
    file_path: &Path,
    base_dir_canonical: &Path,
) -> Result<PathBuf, PathCheck> {
    let canonical_file_path = file_path.canonicalize().map_err(|_| PathCheck::Missing)?;

    match canonical_file_path.strip_prefix(base_dir_canonical) {
        Ok(remaining) if remaining.as_os_str().is_empty() => Err(PathCheck::Escaped),
        Ok(remaining) => {
            let remaining_str = remaining.to_string_lossy();
            if remaining_str.contains("..") || remaining.is_absolute() {
                warn!(
                    "🚨 SECURITY: Suspicious remaining path after strip_prefix: {}",
                    remaining_str
                );
                return Err(PathCheck::Escaped);
            }
            Ok(canonical_file_path)
        }
        Err(_) => {
            warn!(
                "🚨 SECURITY: Path escapes its directory: {} (base {})",
                canonical_file_path.display(),
                base_dir_canonical.display()
            );
            Err(PathCheck::Escaped)
        }
    }
}
