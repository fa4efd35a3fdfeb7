//! Selection error types with suggestions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes for selection failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidConfig,
    NotImplemented,
    ScreenTimeout,
    FallbackLimit,
    DeviceFailure,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidConfig => write!(f, "INVALID_CONFIG"),
            ErrorCode::NotImplemented => write!(f, "NOT_IMPLEMENTED"),
            ErrorCode::ScreenTimeout => write!(f, "SCREEN_TIMEOUT"),
            ErrorCode::FallbackLimit => write!(f, "FALLBACK_LIMIT"),
            ErrorCode::DeviceFailure => write!(f, "DEVICE_FAILURE"),
        }
    }
}

/// A selection error with a hint on how to fix it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectError {
    pub code: ErrorCode,
    pub message: String,
    pub suggestion: Option<String>,
}

pub type Result<T> = std::result::Result<T, SelectError>;

const NO_PREFERENCES_MESSAGE: &str =
    "When using 'preferred' support selection mode, specify at least one Servant or Craft Essence";
const NO_PREFERENCES_HINT: &str =
    "Set preferred_servants or preferred_craft_essences; a leading '*' requires limit break";

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (hint: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for SelectError {}

impl SelectError {
    /// Whether the error is a configuration mistake rather than a runtime failure.
    pub fn is_config(&self) -> bool {
        self.code == ErrorCode::InvalidConfig
    }

    pub fn invalid_mode(mode: &str) -> Self {
        Self {
            code: ErrorCode::InvalidConfig,
            message: format!("Invalid support selection mode '{}'", mode),
            suggestion: Some("Use one of: first, manual, friend, preferred".into()),
        }
    }

    pub fn no_friend_names() -> Self {
        Self {
            code: ErrorCode::InvalidConfig,
            message: "When using 'friend' support selection mode, specify at least one friend name"
                .to_string(),
            suggestion: Some("Set friend_names to a comma-separated list of names".into()),
        }
    }

    pub fn no_preferences() -> Self {
        Self {
            code: ErrorCode::InvalidConfig,
            message: NO_PREFERENCES_MESSAGE.to_string(),
            suggestion: Some(NO_PREFERENCES_HINT.into()),
        }
    }

    pub fn manual_not_implemented() -> Self {
        Self {
            code: ErrorCode::NotImplemented,
            message: "Manual support selection is not implemented".to_string(),
            suggestion: Some("Choose 'first', 'friend' or 'preferred' instead".into()),
        }
    }

    /// Support screen did not show up (or go away) within the allowed time.
    pub fn screen_timeout(what: &str, waited_ms: u128) -> Self {
        Self {
            code: ErrorCode::ScreenTimeout,
            message: format!("Timeout waiting for {} after {}ms", what, waited_ms),
            suggestion: Some(
                "Make sure the game is on the support selection screen, or raise screen_timeout_ms"
                    .into(),
            ),
        }
    }

    pub fn first_slot_not_registered(attempts: u32) -> Self {
        Self {
            code: ErrorCode::ScreenTimeout,
            message: format!(
                "First support slot click did not register after {} refresh attempts",
                attempts
            ),
            suggestion: Some("Raise first_slot_retries or check the first_slot location".into()),
        }
    }

    pub fn fallback_limit(depth: usize) -> Self {
        Self {
            code: ErrorCode::FallbackLimit,
            message: format!("Gave up after {} consecutive fallback selections", depth),
            suggestion: Some(
                "Point fallback_to at 'first' so an exhausted search always terminates".into(),
            ),
        }
    }

    /// Create a device error with a custom suggestion.
    pub fn device_with_suggestion(
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            code: ErrorCode::DeviceFailure,
            message: message.into(),
            suggestion: Some(suggestion.into()),
        }
    }
}
