// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::path::Path;

/// Extensions accepted for uploads and rendered as images, lower case.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "png", "gif", "jpg"];

/// How a file is presented, decided once from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Markdown,
    Html,
    Image,
    PlainText,
}

impl DocumentKind {
    pub fn from_name(name: &str) -> Self {
        match extension_lowercase(name).as_deref() {
            Some("md") => DocumentKind::Markdown,
            Some("html") | Some("htm") => DocumentKind::Html,
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => DocumentKind::Image,
            _ => DocumentKind::PlainText,
        }
    }

    pub fn accepts_image_references(self) -> bool {
        matches!(self, DocumentKind::Markdown | DocumentKind::Html)
    }

    /// The snippet that embeds `image` in a document of this kind.
    pub fn image_reference(self, image: &str) -> Option<String> {
        let src = format!("/images/{}", urlencoding::encode(image));
        match self {
            DocumentKind::Markdown => Some(format!("![{}]({})", escape_alt_text(image), src)),
            DocumentKind::Html => Some(format!(
                r#"<img src="{}" alt="{}">"#,
                src,
                escape_attribute(image)
            )),
            DocumentKind::Image | DocumentKind::PlainText => None,
        }
    }
}

pub fn is_allowed_image(name: &str) -> bool {
    DocumentKind::from_name(name) == DocumentKind::Image
}

/// Human readable allow-list, e.g. `.jpeg, .png, .gif, .jpg`.
pub fn image_extension_list() -> String {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(", ")
}

fn extension_lowercase(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Backslash-escapes the characters that would end a Markdown link label.
fn escape_alt_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
