// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use crate::config::{
    AppConfig, LoggingConfig, PasswordConfig, ServerConfig, SessionConfig, UploadConfig,
    ValidatedConfig,
};

/// Argon2 costs low enough to keep hashing fast in tests.
pub const TEST_PASSWORD_PARAMS: PasswordConfig = PasswordConfig {
    memory_kib: 64,
    iterations: 1,
    parallelism: 1,
};

#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    config: ValidatedConfig,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ValidatedConfig {
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 5466,
                    workers: 1,
                },
                app: AppConfig {
                    name: "Test App".to_string(),
                    description: "Test Description".to_string(),
                },
                logging: LoggingConfig {
                    level: "info".to_string(),
                },
                session: SessionConfig {
                    cookie_name: "test_session".to_string(),
                    ..SessionConfig::default()
                },
                upload: UploadConfig::default(),
                password: TEST_PASSWORD_PARAMS,
            },
        }
    }

    pub fn with_upload_limit_mb(mut self, max_file_size_mb: u64) -> Self {
        self.config.upload.max_file_size_mb = max_file_size_mb;
        self
    }

    pub fn with_upload_overwrite(mut self, overwrite_existing: bool) -> Self {
        self.config.upload.overwrite_existing = overwrite_existing;
        self
    }

    pub fn build(self) -> ValidatedConfig {
        self.config
    }
}

pub fn test_config() -> ValidatedConfig {
    TestConfigBuilder::new().build()
}
