//! Engine Configuration
//!
//! One explicit struct, loaded from the environment exactly once at startup
//! and passed into constructors. Components never reach for env vars
//! themselves.

use std::path::PathBuf;
use tasklist_core::application::worker::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_MAX_ATTEMPTS, DEFAULT_VISIBILITY_TIMEOUT_MS,
};

const DEFAULT_DB_PATH: &str = "~/.tasklist/data.db";
const DEFAULT_ARTIFACT_ROOT: &str = "~/.tasklist/artifacts";
const DEFAULT_OUTBOX_DIR: &str = "~/.tasklist/outbox";
const DEFAULT_SENDER_EMAIL: &str = "no-reply@tasklist.local";
const DEFAULT_RPC_PORT: u16 = 9538;
const DEFAULT_PURGE_RETENTION_DAYS: i64 = 7;
const DEFAULT_RATE_LIMIT_BURST: u32 = 200;
const DEFAULT_RATE_LIMIT_PER_SEC: u32 = 100;

/// Engine configuration (env prefix: TASKLIST_)
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub db_path: String,
    pub rpc_port: u16,
    pub artifact_root: PathBuf,
    pub artifact_base_url: String,
    pub outbox_dir: PathBuf,
    pub sender_email: String,
    pub visibility_timeout_ms: i64,
    pub max_attempts: i32,
    pub batch_size: usize,
    pub purge_retention_days: i64,
    pub rate_limit_burst: u32,
    pub rate_limit_per_sec: u32,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn expanded_path(name: &str, default: &str) -> PathBuf {
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let artifact_root = expanded_path("TASKLIST_ARTIFACT_ROOT", DEFAULT_ARTIFACT_ROOT);
        let artifact_base_url = std::env::var("TASKLIST_ARTIFACT_BASE_URL")
            .unwrap_or_else(|_| format!("file://{}", artifact_root.display()));

        Self {
            db_path: std::env::var("TASKLIST_DB_PATH")
                .map(|p| shellexpand::tilde(&p).into_owned())
                .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_DB_PATH).into_owned()),
            rpc_port: env_or("TASKLIST_RPC_PORT", DEFAULT_RPC_PORT),
            artifact_root,
            artifact_base_url,
            outbox_dir: expanded_path("TASKLIST_OUTBOX_DIR", DEFAULT_OUTBOX_DIR),
            sender_email: std::env::var("TASKLIST_SENDER_EMAIL")
                .unwrap_or_else(|_| DEFAULT_SENDER_EMAIL.to_string()),
            visibility_timeout_ms: env_or(
                "TASKLIST_VISIBILITY_TIMEOUT_MS",
                DEFAULT_VISIBILITY_TIMEOUT_MS,
            ),
            max_attempts: env_or("TASKLIST_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS),
            batch_size: env_or("TASKLIST_BATCH_SIZE", DEFAULT_BATCH_SIZE),
            purge_retention_days: env_or(
                "TASKLIST_PURGE_RETENTION_DAYS",
                DEFAULT_PURGE_RETENTION_DAYS,
            ),
            rate_limit_burst: env_or("TASKLIST_RATE_LIMIT_BURST", DEFAULT_RATE_LIMIT_BURST),
            rate_limit_per_sec: env_or("TASKLIST_RATE_LIMIT_RATE", DEFAULT_RATE_LIMIT_PER_SEC),
        }
    }
}
