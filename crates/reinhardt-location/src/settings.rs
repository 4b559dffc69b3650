//! Settings for building navigation environments outside the browser.
//!
//! In the browser the live `window.location` is authoritative, so these
//! settings only matter for [`MemoryEnvironment`](crate::MemoryEnvironment)
//! (server-side rendering, native tests).
//!
//! ```
//! use reinhardt_location::LocationSettings;
//!
//! let settings: LocationSettings =
//! 	serde_json::from_str(r#"{ "origin": "https://example.com" }"#).unwrap();
//! assert_eq!(settings.origin, "https://example.com");
//! assert_eq!(settings.initial_path, "/");
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{LocationError, LocationResult};

/// Default origin for environments without a real address bar.
const DEFAULT_ORIGIN: &str = "http://localhost";
/// Default initial path.
const DEFAULT_INITIAL_PATH: &str = "/";

/// Location settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSettings {
	/// Origin (`scheme://host[:port]`) every URL is resolved against.
	pub origin: String,
	/// Relative URL (`pathname + search + hash`) of the first history entry.
	pub initial_path: String,
}

impl Default for LocationSettings {
	fn default() -> Self {
		Self {
			origin: DEFAULT_ORIGIN.to_string(),
			initial_path: DEFAULT_INITIAL_PATH.to_string(),
		}
	}
}

impl LocationSettings {
	/// Sets the origin.
	pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
		self.origin = origin.into();
		self
	}

	/// Sets the initial relative URL.
	pub fn with_initial_path(mut self, initial_path: impl Into<String>) -> Self {
		self.initial_path = initial_path.into();
		self
	}

	/// Checks that `origin` is a bare, hierarchical origin.
	///
	/// Returns the serialized origin (e.g. trailing slashes stripped).
	pub fn validate(&self) -> LocationResult<String> {
		let parsed = Url::parse(&self.origin)
			.map_err(|e| LocationError::invalid_url(&self.origin, e))?;
		let origin = parsed.origin();
		if !origin.is_tuple() {
			return Err(LocationError::invalid_url(
				&self.origin,
				"origin must have a scheme and host",
			));
		}
		if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
			return Err(LocationError::invalid_url(
				&self.origin,
				"origin must not carry a path, query or fragment",
			));
		}
		Ok(origin.ascii_serialization())
	}
}
