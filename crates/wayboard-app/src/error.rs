use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid session: {0}")]
    Session(#[source] serde_json::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error("surface is not mounted or has no area")]
    NotMounted,

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_errors_are_not_session_errors() {
        let err: AppError = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(matches!(err, AppError::Json(_)));
        assert!(err.to_string().starts_with("JSON serialization failed"));
        assert_eq!(err.exit_code(), 1);
    }
}
