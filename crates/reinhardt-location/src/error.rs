//! Error types for location binding.

use thiserror::Error;

/// Result type for location operations.
pub type LocationResult<T> = Result<T, LocationError>;

/// Errors raised while binding reactive location fields to the address bar.
///
/// Every variant surfaces synchronously to whoever triggered the update: the
/// caller of [`LocationBinder::set_url`](crate::LocationBinder::set_url) or the
/// environment dispatching a `popstate` event. Nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
	/// The URL could not be parsed relative to the current origin.
	#[error("Invalid URL '{url}': {reason}")]
	InvalidUrl {
		/// The rejected input.
		url: String,
		/// Parser message.
		reason: String,
	},

	/// The query string or fragment carries malformed percent-encoding.
	#[error("Invalid percent-encoding in '{value}': {reason}")]
	InvalidEncoding {
		/// The raw (still encoded) component.
		value: String,
		/// Decoder message.
		reason: String,
	},

	/// The URL resolved to a different origin than the current document.
	#[error("URL '{url}' leaves origin '{origin}'")]
	CrossOrigin {
		/// The rejected input.
		url: String,
		/// The origin navigation is confined to.
		origin: String,
	},

	/// The host environment failed (no window, JavaScript exception, ...).
	#[error("Navigation environment error: {0}")]
	Environment(String),
}

impl LocationError {
	pub(crate) fn invalid_url(url: &str, reason: impl std::fmt::Display) -> Self {
		Self::InvalidUrl {
			url: url.to_string(),
			reason: reason.to_string(),
		}
	}

	pub(crate) fn invalid_encoding(value: &str, reason: impl std::fmt::Display) -> Self {
		Self::InvalidEncoding {
			value: value.to_string(),
			reason: reason.to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_invalid_url_display() {
		let err = LocationError::invalid_url("/a b", "invalid port number");
		assert_eq!(err.to_string(), "Invalid URL '/a b': invalid port number");
	}

	#[rstest]
	fn test_cross_origin_display() {
		let err = LocationError::CrossOrigin {
			url: "//evil.example/".to_string(),
			origin: "http://localhost".to_string(),
		};
		assert!(err.to_string().contains("evil.example"));
		assert!(err.to_string().contains("http://localhost"));
	}

	#[rstest]
	fn test_environment_display() {
		let err = LocationError::Environment("no window".to_string());
		assert_eq!(err.to_string(), "Navigation environment error: no window");
	}
}
