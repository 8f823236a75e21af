// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod documents;
mod images;
mod kind;
mod locks;
mod names;

pub use documents::{COPY_PREFIX, DocumentError, DocumentStore};
pub use images::{ImageStore, UploadOutcome};
pub use kind::{DocumentKind, IMAGE_EXTENSIONS, image_extension_list, is_allowed_image};
pub use locks::{KeyedGuard, KeyedLocks};
pub use names::{DEFAULT_EXTENSION, NameError, normalize_new_name, validate_document_name};
