// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use minijinja::{Environment, Value, default_auto_escape_callback};

pub trait TemplateEngine: Send + Sync {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error>;
}

pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(default_auto_escape_callback);
        env.set_loader(embedded_template_loader);
        Self { env }
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template_name)?;
        tmpl.render(context)
    }
}

/// Template loader for minijinja that loads from embedded sources
fn embedded_template_loader(name: &str) -> Result<Option<String>, minijinja::Error> {
    let template_content = match name {
        "layout.html" => Some(include_str!("../public/templates/layout.html")),

        // Error pages
        "error_404.html" => Some(include_str!("../public/templates/error_404.html")),
        "error_500.html" => Some(include_str!("../public/templates/error_500.html")),

        // Public pages
        "public/index.html" => Some(include_str!("../public/templates/index.html")),
        "public/document.html" => Some(include_str!("../public/templates/document.html")),

        // Editor pages
        "editor/edit.html" => Some(include_str!("../editor/templates/edit.html")),
        "editor/new.html" => Some(include_str!("../editor/templates/new.html")),
        "editor/rename.html" => Some(include_str!("../editor/templates/rename.html")),
        "editor/upload.html" => Some(include_str!("../editor/templates/upload.html")),

        // Account pages
        "users/signin.html" => Some(include_str!("../login/templates/signin.html")),
        "users/signup.html" => Some(include_str!("../login/templates/signup.html")),

        _ => None,
    };

    Ok(template_content.map(|s| s.to_string()))
}
