//! Property-based tests for url round-trips through the binder.

#![cfg(not(target_arch = "wasm32"))]

use proptest::prelude::*;
use reinhardt_location::{LocationBinder, MemoryEnvironment};

fn segment() -> impl Strategy<Value = String> {
	"[a-z0-9_-]{1,8}"
}

fn text() -> impl Strategy<Value = String> {
	"[ a-zA-Z0-9/?=&:@!$'()*,;._~\u{e9}\u{3042}-]{0,12}"
}

proptest! {
	/// For a well-formed relative URL, the fields rebuild the decoded URL and
	/// the pushed entry is the URL itself.
	#[test]
	fn test_round_trip(
		segments in prop::collection::vec(segment(), 0..4),
		query in prop::option::of(text()),
		fragment in prop::option::of(text()),
	) {
		let pathname = format!("/{}", segments.join("/"));
		let mut url = pathname.clone();
		let mut decoded = pathname.clone();
		if let Some(query) = query.as_deref().filter(|q| !q.is_empty()) {
			url.push('?');
			url.push_str(&urlencoding::encode(query));
			decoded.push('?');
			decoded.push_str(query);
		}
		if let Some(fragment) = fragment.as_deref().filter(|f| !f.is_empty()) {
			url.push('#');
			url.push_str(&urlencoding::encode(fragment));
			decoded.push('#');
			decoded.push_str(fragment);
		}

		let env = MemoryEnvironment::new("http://localhost", "/").unwrap();
		let binder = LocationBinder::attach(env.clone()).unwrap();
		binder.set_url(&url).unwrap();

		prop_assert_eq!(binder.pathname(), pathname);
		prop_assert_eq!(
			format!("{}{}{}", binder.pathname(), binder.search(), binder.hash()),
			decoded
		);
		prop_assert_eq!(binder.url(), url.clone());
		prop_assert_eq!(env.entries().last().cloned(), Some(url));
	}
}
