//! Location Binder.
//!
//! [`LocationBinder`] owns four observable fields (`pathname`, `search`,
//! `hash`, `url`) and keeps them in sync with the environment's address bar:
//!
//! - writing `url` through [`LocationBinder::set_url`] pushes a history entry;
//! - back/forward navigation (`popstate`) rewrites `url` from the live
//!   location without pushing.
//!
//! Both paths go through the same change handler. A single guard flag tells
//! them apart: it is raised on attach and before each popstate-driven update,
//! and the next applied change consumes it instead of pushing.
//!
//! ## Decoding
//!
//! On every change `search` and `hash` are percent-decoded from the parsed
//! `url`. On the popstate path the live `pathname`, `search` and `hash` are
//! concatenated as the browser reports them, without decoding, and only then
//! run through the change handler.
//!
//! ## Example
//!
//! ```
//! use reinhardt_location::{LocationBinder, MemoryEnvironment};
//!
//! let env = MemoryEnvironment::new("http://localhost", "/").unwrap();
//! let binder = LocationBinder::attach(env.clone()).unwrap();
//! assert_eq!(env.push_count(), 0);
//!
//! binder.set_url("/search?q=rust%20lang").unwrap();
//! assert_eq!(binder.search(), "?q=rust lang");
//! assert_eq!(env.entries(), vec!["/", "/search?q=rust%20lang"]);
//!
//! env.back().unwrap();
//! assert_eq!(binder.url(), "/");
//! assert_eq!(env.push_count(), 1);
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::environment::{BrowserLocation, NavigationEnvironment, Subscription};
use crate::error::LocationResult;
use crate::observable::Observable;
use crate::state::NavigationState;

struct Fields {
	pathname: Observable<String>,
	search: Observable<String>,
	hash: Observable<String>,
	url: Observable<String>,
}

struct Inner<E> {
	env: E,
	fields: Fields,
	/// Set on attach and by popstate; cleared by the next applied change.
	suppress_next_push: Cell<bool>,
}

/// Two-way binding between reactive location fields and the address bar.
///
/// Single-threaded by construction (`!Send`), like the UI thread it models.
pub struct LocationBinder<E: NavigationEnvironment + 'static> {
	inner: Rc<Inner<E>>,
	subscription: Option<Subscription>,
}

impl<E: NavigationEnvironment + 'static> LocationBinder<E> {
	/// Attaches to `env`.
	///
	/// Initializes `url` from the live `pathname + search + hash` without
	/// pushing a history entry, then listens for back/forward navigation.
	///
	/// # Errors
	///
	/// Fails if the live location cannot be read or decoded, or if the
	/// environment refuses the popstate listener.
	pub fn attach(env: E) -> LocationResult<Self> {
		let inner = Rc::new(Inner {
			env,
			fields: Fields {
				pathname: Observable::new(String::new()),
				search: Observable::new(String::new()),
				hash: Observable::new(String::new()),
				url: Observable::new(String::new()),
			},
			suppress_next_push: Cell::new(true),
		});

		let location = inner.env.current()?;
		inner.apply(&location.origin, &location.relative_url())?;

		let weak: Weak<Inner<E>> = Rc::downgrade(&inner);
		let subscription = inner.env.on_pop_state(Rc::new(move |location: &BrowserLocation| {
			match weak.upgrade() {
				Some(inner) => inner.handle_pop_state(location),
				None => Ok(()),
			}
		}))?;

		tracing::debug!(
			target: "reinhardt_location",
			url = %inner.fields.url.with(String::clone),
			"location binder attached"
		);

		Ok(Self {
			inner,
			subscription: Some(subscription),
		})
	}

	/// Navigates to `url`, pushing exactly one history entry.
	///
	/// Writing the value `url` already holds is a no-op.
	///
	/// # Errors
	///
	/// Returns the parse, origin or decoding error for a malformed `url`, or
	/// the environment's error if the push fails. The fields are left
	/// untouched in every error case.
	pub fn set_url(&self, url: impl AsRef<str>) -> LocationResult<()> {
		self.inner.set_url(url.as_ref())
	}

	/// Current relative URL.
	pub fn url(&self) -> String {
		self.inner.fields.url.get()
	}

	/// Current path.
	pub fn pathname(&self) -> String {
		self.inner.fields.pathname.get()
	}

	/// Current decoded query string, `?` included.
	pub fn search(&self) -> String {
		self.inner.fields.search.get()
	}

	/// Current decoded fragment, `#` included.
	pub fn hash(&self) -> String {
		self.inner.fields.hash.get()
	}

	/// Snapshot of all four fields.
	pub fn state(&self) -> NavigationState {
		let fields = &self.inner.fields;
		NavigationState {
			pathname: fields.pathname.get(),
			search: fields.search.get(),
			hash: fields.hash.get(),
			url: fields.url.get(),
		}
	}

	/// Observable `url` field.
	pub fn url_field(&self) -> &Observable<String> {
		&self.inner.fields.url
	}

	/// Observable `pathname` field.
	pub fn pathname_field(&self) -> &Observable<String> {
		&self.inner.fields.pathname
	}

	/// Observable `search` field.
	pub fn search_field(&self) -> &Observable<String> {
		&self.inner.fields.search
	}

	/// Observable `hash` field.
	pub fn hash_field(&self) -> &Observable<String> {
		&self.inner.fields.hash
	}

	/// Whether the next change will skip the history push.
	pub fn is_push_suppressed(&self) -> bool {
		self.inner.suppress_next_push.get()
	}

	/// The environment this binder is attached to.
	pub fn environment(&self) -> &E {
		&self.inner.env
	}

	/// Stops listening for back/forward navigation and drops the binder.
	///
	/// Dropping the binder has the same effect.
	pub fn detach(mut self) {
		if let Some(subscription) = self.subscription.take() {
			subscription.unsubscribe();
		}
		tracing::debug!(target: "reinhardt_location", "location binder detached");
	}
}

impl<E: NavigationEnvironment> Inner<E> {
	fn set_url(&self, url: &str) -> LocationResult<()> {
		if self.fields.url.with(|current| current == url) {
			return Ok(());
		}
		let origin = self.env.current()?.origin;
		self.apply(&origin, url)
	}

	fn handle_pop_state(&self, location: &BrowserLocation) -> LocationResult<()> {
		let url = location.relative_url();
		tracing::trace!(target: "reinhardt_location", url = %url, "popstate received");

		if self.fields.url.with(|current| *current == url) {
			return Ok(());
		}

		// The browser already moved; the change handler must not push again.
		self.suppress_next_push.set(true);
		let result = self.apply(&location.origin, &url);
		if let Err(err) = &result {
			self.suppress_next_push.set(false);
			tracing::warn!(
				target: "reinhardt_location",
				url = %url,
				error = %err,
				"popstate update failed"
			);
		}
		result
	}

	/// The change handler: derive, push unless suppressed, then commit.
	fn apply(&self, origin: &str, url: &str) -> LocationResult<()> {
		let state = NavigationState::derive(origin, url)?;

		if self.suppress_next_push.get() {
			self.suppress_next_push.set(false);
			tracing::trace!(target: "reinhardt_location", url = %url, "history push suppressed");
		} else {
			self.env.push(url)?;
			tracing::debug!(target: "reinhardt_location", url = %url, "history entry pushed");
		}

		self.commit(state);
		Ok(())
	}

	/// Stores all four fields before notifying any subscriber.
	fn commit(&self, state: NavigationState) {
		let fields = &self.fields;
		let changed = [
			(fields.pathname.replace(state.pathname), &fields.pathname),
			(fields.search.replace(state.search), &fields.search),
			(fields.hash.replace(state.hash), &fields.hash),
			(fields.url.replace(state.url), &fields.url),
		];
		for (field_changed, field) in changed {
			if field_changed {
				field.notify();
			}
		}
	}
}

impl<E: NavigationEnvironment + fmt::Debug + 'static> fmt::Debug for LocationBinder<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LocationBinder")
			.field("env", &self.inner.env)
			.field("state", &self.state())
			.field("suppress_next_push", &self.inner.suppress_next_push.get())
			.field("attached", &self.subscription.is_some())
			.finish()
	}
}
