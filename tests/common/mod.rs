// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use reifycfg::domain::{Config, Meta, Value};
use reifycfg::reify_struct;
use std::sync::OnceLock;
use std::time::Duration;

static TRACING: OnceLock<()> = OnceLock::new();

/// Installs a test-writer subscriber once per test binary.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Database {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

reify_struct! {
    Database {
        host: validate("required"),
        port: validate("min=1, max=65535"),
        timeout,
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Logging {
    pub level: String,
    pub json: bool,
}

reify_struct! {
    Logging { level, json }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AppConfig {
    pub name: String,
    pub workers: u8,
    pub tags: Vec<String>,
    pub db: Database,
    pub logging: Logging,
    pub backup: Option<Database>,
}

reify_struct! {
    AppConfig {
        name: rename("app_name"),
        workers,
        tags,
        db,
        logging: squash(),
        backup,
    }
}

/// A full application config with provenance from `app.yaml`.
pub fn app_config() -> Config {
    let meta = Meta::new("app.yaml");
    Config::new()
        .with("app_name", "billing")
        .with("workers", 4i64)
        .with("tags", Value::array(vec!["blue", "green"]))
        .with(
            "db",
            Config::new()
                .with("host", "db.internal")
                .with("port", Value::int(5432).with_meta(meta.clone().at_line(6)))
                .with("timeout", "2s"),
        )
        .with("level", "info")
        .with("json", true)
        .with_meta(meta)
}
