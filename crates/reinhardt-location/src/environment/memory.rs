//! In-memory history for native targets and tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use url::Url;

use super::{BrowserLocation, NavigationEnvironment, PopStateHandler, Subscription};
use crate::error::{LocationError, LocationResult};
use crate::settings::LocationSettings;
use crate::state::{prefixed, resolve};

struct History {
	origin: String,
	entries: Vec<Url>,
	index: usize,
	pushes: usize,
}

#[derive(Default)]
struct Listeners {
	next_id: Cell<u64>,
	handlers: RefCell<Vec<(u64, PopStateHandler)>>,
}

/// A history stack that behaves like the browser's, without a browser.
///
/// `push` appends after the current entry and discards forward entries;
/// `back`, `forward` and `go` move through the stack and fire popstate.
/// Clones share the same history.
///
/// # Example
///
/// ```
/// use reinhardt_location::{MemoryEnvironment, NavigationEnvironment};
///
/// let env = MemoryEnvironment::new("http://localhost", "/").unwrap();
/// env.push("/users/").unwrap();
/// assert_eq!(env.current().unwrap().pathname, "/users/");
///
/// env.back().unwrap();
/// assert_eq!(env.current().unwrap().pathname, "/");
/// ```
#[derive(Clone)]
pub struct MemoryEnvironment {
	history: Rc<RefCell<History>>,
	listeners: Rc<Listeners>,
}

impl MemoryEnvironment {
	/// Creates a history with one entry, `initial_url`, on `origin`.
	pub fn new(origin: &str, initial_url: &str) -> LocationResult<Self> {
		Self::from_settings(
			&LocationSettings::default()
				.with_origin(origin)
				.with_initial_path(initial_url),
		)
	}

	/// Creates a history from settings.
	pub fn from_settings(settings: &LocationSettings) -> LocationResult<Self> {
		let origin = settings.validate()?;
		let first = resolve(&origin, &settings.initial_path)?;

		Ok(Self {
			history: Rc::new(RefCell::new(History {
				origin,
				entries: vec![first],
				index: 0,
				pushes: 0,
			})),
			listeners: Rc::new(Listeners::default()),
		})
	}

	/// Goes one entry back. No-op at the start of history.
	pub fn back(&self) -> LocationResult<()> {
		self.go(-1)
	}

	/// Goes one entry forward. No-op at the end of history.
	pub fn forward(&self) -> LocationResult<()> {
		self.go(1)
	}

	/// Moves `delta` entries and fires popstate.
	///
	/// Out-of-range moves and `go(0)` do nothing. Returns the first error
	/// raised by a listener; the move itself is not undone.
	pub fn go(&self, delta: isize) -> LocationResult<()> {
		let location = {
			let mut history = self.history.borrow_mut();
			let Some(target) = history.index.checked_add_signed(delta) else {
				return Ok(());
			};
			if delta == 0 || target >= history.entries.len() {
				return Ok(());
			}
			history.index = target;
			history.location()
		};

		tracing::trace!(
			target: "reinhardt_location",
			url = %location.relative_url(),
			"memory history popstate"
		);

		let handlers: Vec<PopStateHandler> = self
			.listeners
			.handlers
			.borrow()
			.iter()
			.map(|(_, handler)| Rc::clone(handler))
			.collect();
		let mut result = Ok(());
		for handler in handlers {
			if let Err(err) = handler(&location)
				&& result.is_ok()
			{
				result = Err(err);
			}
		}
		result
	}

	/// Relative URLs of every entry, oldest first.
	pub fn entries(&self) -> Vec<String> {
		self.history
			.borrow()
			.entries
			.iter()
			.map(relative)
			.collect()
	}

	/// Number of entries in the stack.
	pub fn len(&self) -> usize {
		self.history.borrow().entries.len()
	}

	/// Always `false`: a history holds at least its initial entry.
	pub fn is_empty(&self) -> bool {
		self.history.borrow().entries.is_empty()
	}

	/// Position of the current entry.
	pub fn index(&self) -> usize {
		self.history.borrow().index
	}

	/// Number of successful [`push`](NavigationEnvironment::push) calls.
	pub fn push_count(&self) -> usize {
		self.history.borrow().pushes
	}

	/// Number of registered popstate listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.handlers.borrow().len()
	}
}

impl History {
	fn location(&self) -> BrowserLocation {
		let entry = &self.entries[self.index];
		BrowserLocation {
			origin: self.origin.clone(),
			pathname: entry.path().to_string(),
			search: prefixed('?', entry.query()),
			hash: prefixed('#', entry.fragment()),
		}
	}
}

fn relative(entry: &Url) -> String {
	format!(
		"{}{}{}",
		entry.path(),
		prefixed('?', entry.query()),
		prefixed('#', entry.fragment())
	)
}

impl NavigationEnvironment for MemoryEnvironment {
	fn current(&self) -> LocationResult<BrowserLocation> {
		Ok(self.history.borrow().location())
	}

	/// Resolves `url` against the current entry, like `pushState` resolves
	/// against the document URL.
	fn push(&self, url: &str) -> LocationResult<()> {
		let mut history = self.history.borrow_mut();
		let base = &history.entries[history.index];
		let entry = base
			.join(url)
			.map_err(|e| LocationError::invalid_url(url, e))?;
		if entry.origin() != base.origin() {
			return Err(LocationError::CrossOrigin {
				url: url.to_string(),
				origin: history.origin.clone(),
			});
		}
		let next = history.index + 1;
		history.entries.truncate(next);
		history.entries.push(entry);
		history.index = next;
		history.pushes += 1;
		Ok(())
	}

	fn on_pop_state(&self, handler: PopStateHandler) -> LocationResult<Subscription> {
		let id = self.listeners.next_id.get();
		self.listeners.next_id.set(id + 1);
		self.listeners.handlers.borrow_mut().push((id, handler));

		let listeners = Rc::downgrade(&self.listeners);
		Ok(Subscription::new(move || {
			if let Some(listeners) = listeners.upgrade() {
				listeners.handlers.borrow_mut().retain(|(hid, _)| *hid != id);
			}
		}))
	}
}

impl std::fmt::Debug for MemoryEnvironment {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let history = self.history.borrow();
		f.debug_struct("MemoryEnvironment")
			.field("origin", &history.origin)
			.field("entries", &history.entries.len())
			.field("index", &history.index)
			.field("listeners", &self.listener_count())
			.finish()
	}
}
