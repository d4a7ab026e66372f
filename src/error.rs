//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum InspectorError {
    #[error("Config error: {reason}")]
    Config { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Input decoding
    // ─────────────────────────────────────────────────────────────
    #[error("Input error at line {line}: {reason}")]
    Input { line: usize, reason: String },

    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl FixSuggestion for InspectorError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            InspectorError::Config { .. } => {
                Some("Check the TOML syntax of the config file or pass --config with a valid path")
            }
            InspectorError::Io(_) => Some("Check file path and permissions"),
            InspectorError::Input { .. } => {
                Some("Each input line must be one JSON object with a \"kind\" of record, param or status")
            }
            InspectorError::Terminal(_) => {
                Some("Run from an interactive terminal, or use `dump` for headless output")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, InspectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_a_fix() {
        let errors = [
            InspectorError::Config {
                reason: "bad".into(),
            },
            InspectorError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
            InspectorError::Input {
                line: 3,
                reason: "missing kind".into(),
            },
            InspectorError::Terminal("not a tty".into()),
        ];
        for error in &errors {
            assert!(error.fix_suggestion().is_some(), "{error}");
        }
    }

    #[test]
    fn input_error_names_the_line() {
        let error = InspectorError::Input {
            line: 12,
            reason: "expected value".into(),
        };
        assert_eq!(error.to_string(), "Input error at line 12: expected value");
    }
}
