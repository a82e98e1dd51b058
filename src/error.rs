use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring a scene.
///
/// Gameplay itself never fails: stale contacts and empty touches are no-ops.
#[derive(Debug, Error)]
pub enum Error {
    /// A settings value is out of range or inconsistent.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Reading a settings file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A settings file is not valid JSON for [`crate::Settings`].
    #[error("settings parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidSettings("block width must be > 0".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid settings"));
        assert!(msg.contains("block width"));
    }

    #[test]
    fn json_errors_convert() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
