use std::path::PathBuf;

/// Unified error type for the picker core.
///
/// Almost everything in the picker is total: navigation clamps or wraps,
/// storage reads degrade to empty defaults, favorites toggles cannot fail.
/// The variants here cover the few genuinely reportable conditions. Only
/// `TargetUnavailable` is user-facing; it aborts the insertion without
/// mutating any state.
#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    /// No text field could be resolved for the current page context.
    ///
    /// Recoverable: the user focuses a field and retries. The message names
    /// the detected context(s) so they know where to look.
    #[error("please focus a text field in {}", contexts.join(", "))]
    TargetUnavailable {
        /// Human-readable labels of the detected page contexts.
        contexts: Vec<String>,
    },

    /// An explicitly provided config file is missing or malformed.
    #[error("invalid config at {path}: {detail}")]
    InvalidConfig {
        /// Path that was attempted.
        path: PathBuf,
        /// What went wrong.
        detail: String,
    },

    /// Malformed command-line invocation.
    #[error("{detail} (try --help)")]
    Usage {
        /// What was wrong with the invocation.
        detail: String,
    },

    /// I/O failure outside the store (terminal setup, event read).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the smilepick crates.
pub type PickerResult<T> = Result<T, PickerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_unavailable_names_contexts() {
        let err = PickerError::TargetUnavailable {
            contexts: vec!["the forum".to_owned(), "game chat".to_owned()],
        };
        let msg = err.to_string();
        assert!(msg.contains("the forum, game chat"), "got: {msg}");
    }

    #[test]
    fn invalid_config_mentions_path() {
        let err = PickerError::InvalidConfig {
            path: PathBuf::from("/tmp/picker.json"),
            detail: "expected object".to_owned(),
        };
        assert!(err.to_string().contains("/tmp/picker.json"));
    }
}
