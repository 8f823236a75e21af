// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use env_logger::Logger;
use log::{Level, Log, Metadata, Record, SetLoggerError};

/// Rewrites the level of records whose target starts with `target_prefix`
/// and whose level equals `from`.
#[derive(Debug, Clone)]
pub struct LevelRule {
    pub target_prefix: String,
    pub from: Level,
    pub to: Level,
}

impl LevelRule {
    pub fn new(target_prefix: &str, from: Level, to: Level) -> Self {
        Self {
            target_prefix: target_prefix.to_string(),
            from,
            to,
        }
    }
}

/// Rules applied by the server logger; html5ever (via ammonia) is chatty at debug.
pub fn default_rules() -> Vec<LevelRule> {
    vec![LevelRule::new("html5ever", Level::Debug, Level::Trace)]
}

struct RemappingLogger {
    inner: Logger,
    rules: Vec<LevelRule>,
}

impl RemappingLogger {
    fn remap(&self, target: &str, level: Level) -> Level {
        remap_level(&self.rules, target, level)
    }
}

fn remap_level(rules: &[LevelRule], target: &str, level: Level) -> Level {
    rules
        .iter()
        .find(|rule| rule.from == level && target.starts_with(&rule.target_prefix))
        .map(|rule| rule.to)
        .unwrap_or(level)
}

impl Log for RemappingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let remapped = Metadata::builder()
            .level(self.remap(metadata.target(), metadata.level()))
            .target(metadata.target())
            .build();
        self.inner.enabled(&remapped)
    }

    fn log(&self, record: &Record) {
        let level = self.remap(record.target(), record.level());
        self.inner.log(
            &Record::builder()
                .level(level)
                .target(record.target())
                .args(*record.args())
                .module_path(record.module_path())
                .file(record.file())
                .line(record.line())
                .build(),
        );
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Installs `logger` as the global logger, wrapped with the given level rules.
pub fn init_logger(rules: Vec<LevelRule>, logger: Logger) -> Result<(), SetLoggerError> {
    let max_level = logger.filter();
    log::set_boxed_logger(Box::new(RemappingLogger {
        inner: logger,
        rules,
    }))?;
    log::set_max_level(max_level);
    Ok(())
}
