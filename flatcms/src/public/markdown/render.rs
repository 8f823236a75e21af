// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::HtmlSanitizer;
use crate::content::DocumentKind;
use pulldown_cmark::{Options, Parser, html};

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Markdown to sanitized HTML.
pub fn render_markdown(markdown: &str, sanitizer: &HtmlSanitizer) -> String {
    let parser = Parser::new_ext(markdown, markdown_options());
    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, parser);
    sanitizer.clean(&html_output)
}

/// Body of a document page. `Markup` is safe HTML; `Text` is escaped by the
/// template.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderedBody {
    Markup(String),
    Text(String),
}

impl RenderedBody {
    pub fn template_kind(&self) -> &'static str {
        match self {
            RenderedBody::Markup(_) => "markup",
            RenderedBody::Text(_) => "text",
        }
    }

    pub fn into_inner(self) -> String {
        match self {
            RenderedBody::Markup(body) | RenderedBody::Text(body) => body,
        }
    }
}

pub fn render_document_body(
    kind: DocumentKind,
    source: String,
    sanitizer: &HtmlSanitizer,
) -> RenderedBody {
    match kind {
        DocumentKind::Markdown => RenderedBody::Markup(render_markdown(&source, sanitizer)),
        DocumentKind::Html => RenderedBody::Markup(sanitizer.clean(&source)),
        DocumentKind::Image | DocumentKind::PlainText => RenderedBody::Text(source),
    }
}
