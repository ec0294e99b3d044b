// Error types for storefront page objects

use std::time::Duration;
use thiserror::Error;

/// Result type alias for page-object operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while driving storefront page objects
#[derive(Debug, Error)]
pub enum Error {
    /// A single-element operation found no matching element
    ///
    /// Raised after the action timeout elapses with zero matches.
    /// Visibility checks and multi-element queries never produce this.
    #[error("Element not found: selector '{selector}'")]
    ElementNotFound { selector: String },

    /// A single-element operation found more than one match
    ///
    /// Typical cause: a selector union (`a, b`) matching nested elements, or
    /// several navigation links carrying the "active" marker.
    #[error("Ambiguous match: selector '{selector}' resolved to {count} elements")]
    AmbiguousMatch { selector: String, count: usize },

    /// A bounded wait exceeded its budget
    #[error("Timeout after {timeout:?}: {operation}")]
    Timeout {
        operation: String,
        timeout: Duration,
    },

    /// Observed UI state did not match the expectation
    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    /// A selector builder rejected its input
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Configuration or fixture data could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error reported by the browser backend
    #[error("Session error: {0}")]
    Session(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Returns true when this error (or the error it wraps) is a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Context(_, inner) => inner.is_timeout(),
            _ => false,
        }
    }

    /// The innermost error, with any context peeled off.
    pub fn root(&self) -> &Error {
        match self {
            Error::Context(_, inner) => inner.root(),
            other => other,
        }
    }

    pub(crate) fn timeout(operation: impl Into<String>, timeout: Duration) -> Self {
        Error::Timeout {
            operation: operation.into(),
            timeout,
        }
    }
}

#[cfg(feature = "playwright")]
impl From<playwright_rs::Error> for Error {
    fn from(error: playwright_rs::Error) -> Self {
        use playwright_rs::Error as Backend;

        match error {
            Backend::Timeout(msg) => Error::Timeout {
                operation: msg,
                timeout: Duration::from_millis(playwright_rs::DEFAULT_TIMEOUT_MS as u64),
            },
            Backend::NavigationTimeout { url, duration_ms } => Error::Timeout {
                operation: format!("navigating to '{url}'"),
                timeout: Duration::from_millis(duration_ms),
            },
            Backend::ElementNotFound(selector) => Error::ElementNotFound { selector },
            Backend::Io(e) => Error::Io(e),
            Backend::Json(e) => Error::Json(e),
            other => Error::Session(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_timeout_sees_through_context() {
        let err = Error::timeout("waiting for network idle", Duration::from_secs(15))
            .context("page load");
        assert!(err.is_timeout());

        let err = Error::ElementNotFound {
            selector: "css=.cart-total".into(),
        }
        .context("reading total");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_root_peels_nested_context() {
        let err = Error::ElementNotFound {
            selector: "css=.cart-total".into(),
        }
        .context("inner_text")
        .context("cart scenario");
        assert!(matches!(
            err.root(),
            Error::ElementNotFound { selector } if selector == "css=.cart-total"
        ));
        assert_eq!(
            err.to_string(),
            "cart scenario: inner_text: Element not found: selector 'css=.cart-total'"
        );
    }

    #[test]
    fn test_messages_name_the_selector() {
        let err = Error::AmbiguousMatch {
            selector: "css=nav >> css=.active".into(),
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "Ambiguous match: selector 'css=nav >> css=.active' resolved to 2 elements"
        );
    }
}
