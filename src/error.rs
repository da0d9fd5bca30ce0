use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("screen dimensions must be positive and finite, got {width}x{height}")]
    NonPositiveScreen { width: f32, height: f32 },
    #[error("tick interval must be positive and finite, got {0}s")]
    NonPositiveTickInterval(f32),
    #[error("tick interval must not exceed {max}s, got {secs}s")]
    TickIntervalTooLong { secs: f32, max: f32 },
    #[error("spawn probability per tick must lie in [0, 1], got {0}")]
    SpawnProbabilityOutOfRange(f64),
    #[error("{field} must be non-negative and finite, got {value}")]
    InvalidPhysics { field: &'static str, value: f32 },
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config overrides: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("step interval must be positive and finite, got {dt}s")]
    InvalidStep { dt: f32 },
}
