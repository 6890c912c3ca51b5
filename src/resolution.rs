use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical error codes reported in [`ResolutionDetails`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The provider has a client but it has not finished initializing.
    ProviderNotReady,
    /// The provider has no usable client and cannot recover.
    ProviderFatal,
    /// The flag, or a value for the requested variable, could not be found.
    FlagNotFound,
    /// The resolved value has a type other than the requested one.
    TypeMismatch,
    /// The context has no targeting key.
    TargetingKeyMissing,
    /// The context was rejected by the Kameleoon client.
    InvalidContext,
    /// Any other failure.
    General,
}

impl ErrorCode {
    /// Wire name of the error code.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ProviderNotReady => "PROVIDER_NOT_READY",
            ErrorCode::ProviderFatal => "PROVIDER_FATAL",
            ErrorCode::FlagNotFound => "FLAG_NOT_FOUND",
            ErrorCode::TypeMismatch => "TYPE_MISMATCH",
            ErrorCode::TargetingKeyMissing => "TARGETING_KEY_MISSING",
            ErrorCode::InvalidContext => "INVALID_CONTEXT",
            ErrorCode::General => "GENERAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a value was returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    /// The value was resolved by the Kameleoon client.
    Static,
    /// The default value was returned because of an error.
    Error,
}

/// Outcome of a flag resolution.
///
/// `error_code` is set if and only if `reason` is [`Reason::Error`]; the only ways to build a
/// `ResolutionDetails` are [`ResolutionDetails::resolved`] and [`ResolutionDetails::error`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionDetails<T> {
    value: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    reason: Reason,
}

impl<T> ResolutionDetails<T> {
    /// Successful resolution of `value` from `variant`.
    pub fn resolved(value: T, variant: impl Into<String>) -> Self {
        ResolutionDetails {
            value,
            variant: Some(variant.into()),
            error_code: None,
            error_message: None,
            reason: Reason::Static,
        }
    }

    /// Failed resolution falling back to `default_value`.
    pub fn error(
        default_value: T,
        error_code: ErrorCode,
        error_message: impl Into<String>,
        variant: Option<String>,
    ) -> Self {
        ResolutionDetails {
            value: default_value,
            variant,
            error_code: Some(error_code),
            error_message: Some(error_message.into()),
            reason: Reason::Error,
        }
    }

    /// Resolved value, or the default on error.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume the details and return the value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Key of the variation the value came from.
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    #[allow(missing_docs)]
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error_code
    }

    #[allow(missing_docs)]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[allow(missing_docs)]
    pub fn reason(&self) -> Reason {
        self.reason
    }

    /// Return `true` if the resolution failed.
    pub fn is_error(&self) -> bool {
        self.reason == Reason::Error
    }

    /// Map the value, keeping every other field.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResolutionDetails<U> {
        ResolutionDetails {
            value: f(self.value),
            variant: self.variant,
            error_code: self.error_code,
            error_message: self.error_message,
            reason: self.reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, Reason, ResolutionDetails};

    #[test]
    fn error_code_is_set_only_on_error() {
        let resolved = ResolutionDetails::resolved(1, "on");
        assert_eq!(resolved.reason(), Reason::Static);
        assert_eq!(resolved.error_code(), None);
        assert_eq!(resolved.error_message(), None);

        let failed = ResolutionDetails::error(0, ErrorCode::General, "boom", None);
        assert!(failed.is_error());
        assert_eq!(failed.error_code(), Some(ErrorCode::General));
        assert_eq!(failed.variant(), None);
    }

    #[test]
    fn serializes_in_openfeature_shape() {
        let details =
            ResolutionDetails::error(false, ErrorCode::TypeMismatch, "mismatch", Some("on".into()));
        assert_eq!(
            serde_json::to_value(&details).unwrap(),
            serde_json::json!({
                "value": false,
                "variant": "on",
                "errorCode": "TYPE_MISMATCH",
                "errorMessage": "mismatch",
                "reason": "ERROR"
            })
        );
        assert_eq!(ErrorCode::TargetingKeyMissing.to_string(), "TARGETING_KEY_MISSING");
    }
}
