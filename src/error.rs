//! Error type for the edges of the crate
//!
//! The physics tick itself never fails; degenerate geometry is substituted or
//! skipped in place. Only configuration and spawning can be rejected.

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is out of range or non-finite.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A spawn request carried an unusable mass or position.
    #[error("invalid spawn: {0}")]
    InvalidSpawn(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidSpawn("mass must be > 0".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid spawn"));
        assert!(msg.contains("mass"));
    }

    #[test]
    fn json_errors_convert() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
