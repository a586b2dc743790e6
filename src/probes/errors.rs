use std::time::Duration;

/// Why a probe reported its target as down.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("AMQP error: {0}")]
    Amqp(#[from] lapin::Error),
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("TDengine returned code {code}: {desc}")]
    Taos { code: i64, desc: String },
}
