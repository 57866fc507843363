//! Mock session configuration.
//!
//! `MockAjaxConfig` controls the values a [`MockAjax`](crate::MockAjax)
//! session falls back to when neither the response spec nor the client
//! library supply one.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use mock_ajax::MockAjaxConfig;
//! let cfg = MockAjaxConfig::default();
//! assert_eq!(cfg.default_content_type, "application/json");
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use std::time::Duration;
//! use mock_ajax::MockAjaxConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = MockAjaxConfig::builder()
//!     .default_content_type("text/plain")
//!     .default_timeout(Duration::from_secs(5))
//!     .build()?; // returns Result<MockAjaxConfig, MockAjaxConfigError>
//! # Ok(()) }
//! ```
//!
//! # Fields (summary)
//! - `default_content_type`: `Content-Type` reported when a response spec has
//!   none (default: `application/json`).
//! - `default_timeout`: timeout recorded on fake requests whose library does
//!   not define one (default: 30 seconds).

use http::HeaderValue;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

#[derive(Debug, Clone)]
pub struct MockAjaxConfig {
    pub default_content_type: String,
    pub default_timeout: Duration,
}

impl Default for MockAjaxConfig {
    fn default() -> Self {
        Self {
            default_content_type: DEFAULT_CONTENT_TYPE.to_string(),
            default_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl MockAjaxConfig {
    pub fn builder() -> MockAjaxConfigBuilder {
        MockAjaxConfigBuilder::default()
    }
}

/// Builder for [`MockAjaxConfig`].
#[derive(Debug, Clone, Default)]
pub struct MockAjaxConfigBuilder {
    inner: MockAjaxConfig,
}

impl MockAjaxConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut MockAjaxConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn default_content_type<S: Into<String>>(self, ct: S) -> Self { self.map(|c| c.default_content_type = ct.into()) }
    pub fn default_timeout(self, timeout: Duration) -> Self { self.map(|c| c.default_timeout = timeout) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut MockAjaxConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<MockAjaxConfig, MockAjaxConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAjaxConfigError {
    EmptyContentType,
    InvalidContentType(String),
    ZeroTimeout,
}

impl fmt::Display for MockAjaxConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MockAjaxConfigError::EmptyContentType =>
                write!(f, "default_content_type must not be empty"),
            MockAjaxConfigError::InvalidContentType(ct) =>
                write!(f, "default_content_type {ct:?} is not a valid header value"),
            MockAjaxConfigError::ZeroTimeout =>
                write!(f, "default_timeout must be greater than zero"),
        }
    }
}
impl std::error::Error for MockAjaxConfigError {}

fn validate(c: &MockAjaxConfig) -> Result<(), MockAjaxConfigError> {
    if c.default_content_type.trim().is_empty() {
        return Err(MockAjaxConfigError::EmptyContentType);
    }
    if HeaderValue::from_str(&c.default_content_type).is_err() {
        return Err(MockAjaxConfigError::InvalidContentType(c.default_content_type.clone()));
    }
    if c.default_timeout.is_zero() {
        return Err(MockAjaxConfigError::ZeroTimeout);
    }
    Ok(())
}
