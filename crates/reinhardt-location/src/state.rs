//! Navigation state derived from a relative URL.
//!
//! `url` is the single source of truth. `pathname`, `search` and `hash` are
//! projections recomputed together whenever `url` changes:
//!
//! - `pathname` is the parsed path, exactly as the URL parser serializes it.
//! - `search` and `hash` are the parsed query and fragment (with their `?` /
//!   `#` prefix), percent-decoded.

use std::borrow::Cow;

use url::Url;

use crate::error::{LocationError, LocationResult};

/// Snapshot of the four location fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
	/// Path component, e.g. `/users/42/`.
	pub pathname: String,
	/// Decoded query string including the leading `?`, or empty.
	pub search: String,
	/// Decoded fragment including the leading `#`, or empty.
	pub hash: String,
	/// The relative URL the other fields were derived from.
	pub url: String,
}

impl NavigationState {
	/// Derives the state for `url`, resolved against `origin`.
	///
	/// # Errors
	///
	/// - [`LocationError::InvalidUrl`] if `origin + url` does not parse.
	/// - [`LocationError::CrossOrigin`] if the result is not on `origin`.
	/// - [`LocationError::InvalidEncoding`] if the query or fragment carries a
	///   malformed percent escape or decodes to invalid UTF-8.
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_location::NavigationState;
	///
	/// let state = NavigationState::derive(
	/// 	"http://localhost",
	/// 	"/a?x=hello%20world#frag%2Fpart",
	/// )
	/// .unwrap();
	/// assert_eq!(state.pathname, "/a");
	/// assert_eq!(state.search, "?x=hello world");
	/// assert_eq!(state.hash, "#frag/part");
	/// ```
	pub fn derive(origin: &str, url: &str) -> LocationResult<Self> {
		let parsed = resolve(origin, url)?;

		Ok(Self {
			pathname: parsed.path().to_string(),
			search: decode_component(&prefixed('?', parsed.query()))?.into_owned(),
			hash: decode_component(&prefixed('#', parsed.fragment()))?.into_owned(),
			url: url.to_string(),
		})
	}
}

/// Resolves a relative URL by appending it to `origin`.
///
/// Concatenation rather than reference resolution: `"foo"` does not become
/// `"/foo"`, it ends up in the host and is rejected as cross-origin.
pub(crate) fn resolve(origin: &str, url: &str) -> LocationResult<Url> {
	let parsed =
		Url::parse(&format!("{origin}{url}")).map_err(|e| LocationError::invalid_url(url, e))?;

	if parsed.origin().ascii_serialization() != origin {
		return Err(LocationError::CrossOrigin {
			url: url.to_string(),
			origin: origin.to_string(),
		});
	}

	Ok(parsed)
}

/// `?query` / `#fragment`, or empty when the component is absent or empty.
pub(crate) fn prefixed(prefix: char, component: Option<&str>) -> String {
	match component {
		Some(value) if !value.is_empty() => format!("{prefix}{value}"),
		_ => String::new(),
	}
}

/// Percent-decodes a query string or fragment.
///
/// Stricter than [`urlencoding::decode`]: a `%` not followed by two hex digits
/// is an error instead of being passed through.
pub(crate) fn decode_component(raw: &str) -> LocationResult<Cow<'_, str>> {
	let bytes = raw.as_bytes();
	let mut i = 0;
	while i < bytes.len() {
		if bytes[i] == b'%' {
			let escape = bytes.get(i + 1..i + 3);
			if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
				return Err(LocationError::invalid_encoding(
					raw,
					format!("malformed escape at byte {i}"),
				));
			}
			i += 3;
		} else {
			i += 1;
		}
	}

	urlencoding::decode(raw).map_err(|e| LocationError::invalid_encoding(raw, e))
}
