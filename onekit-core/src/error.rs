use std::path::PathBuf;
use thiserror::Error;

/// Failures with a fixed meaning for callers and exit codes.
///
/// Operations return `anyhow::Result` and wrap these with context; the CLI
/// downcasts to pick an exit code.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("directory already exists: {0} (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    #[error("{what} not found: {path}")]
    NotFound { what: &'static str, path: PathBuf },

    #[error("not a node module (no module descriptor in {0})")]
    NotAModule(PathBuf),

    #[error("failed to parse {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("git {command} failed: {message}")]
    GitOperationFailed { command: String, message: String },

    #[error("failed to update {path}: {message}")]
    PartialApplyFailure { path: PathBuf, message: String },

    #[error("current {kind} name could not be detected, pass --old-name")]
    UnknownCurrentName { kind: String },
}

impl NodeError {
    pub fn invalid_name(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn not_found(what: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            what,
            path: path.into(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// True for errors caused by bad user input rather than the environment.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidName { .. }
                | Self::NotFound { .. }
                | Self::NotAModule(_)
                | Self::ParseError { .. }
                | Self::UnknownCurrentName { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_subject() {
        let err = NodeError::invalid_name("1abc", "must not start with a digit");
        assert_eq!(
            err.to_string(),
            "invalid name '1abc': must not start with a digit"
        );

        let err = NodeError::not_found("manifest", "/ws/west.yml");
        assert_eq!(err.to_string(), "manifest not found: /ws/west.yml");
    }

    #[test]
    fn test_invalid_input_classification() {
        assert!(NodeError::NotAModule(PathBuf::from("x")).is_invalid_input());
        assert!(!NodeError::AlreadyExists(PathBuf::from("x")).is_invalid_input());
        assert!(!NodeError::GitOperationFailed {
            command: "push".into(),
            message: "denied".into(),
        }
        .is_invalid_input());
    }
}
