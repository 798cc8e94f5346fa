//! Environment-backed configuration

use tb_core::export::DEFAULT_DELIMITER;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_PATH: &str = "taskboard.db";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_SESSION_TTL_HOURS: i64 = 8;

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn port() -> u16 {
    env_value("TASKBOARD_PORT")
        .and_then(|raw| raw.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

pub fn database_path() -> String {
    env_value("TASKBOARD_DB").unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
}

pub fn admin_username() -> String {
    env_value("TASKBOARD_ADMIN_USER").unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string())
}

pub fn admin_password() -> String {
    env_value("TASKBOARD_ADMIN_PASSWORD").unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string())
}

pub fn session_ttl_hours() -> i64 {
    env_value("TASKBOARD_SESSION_TTL_HOURS")
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|ttl| *ttl > 0)
        .unwrap_or(DEFAULT_SESSION_TTL_HOURS)
}

/// First byte of `TASKBOARD_CSV_DELIMITER`, when set.
pub fn csv_delimiter() -> u8 {
    env_value("TASKBOARD_CSV_DELIMITER")
        .and_then(|raw| raw.into_bytes().into_iter().next())
        .unwrap_or(DEFAULT_DELIMITER)
}
