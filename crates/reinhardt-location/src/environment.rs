//! Navigation environment abstraction.
//!
//! The address bar and history stack are global browser state. The binder
//! only touches them through [`NavigationEnvironment`], so it can run against
//! the real window (`WindowEnvironment`, WASM only) or an in-memory history
//! ([`MemoryEnvironment`]).

mod memory;

#[cfg(target_arch = "wasm32")]
mod browser;

use std::fmt;
use std::rc::Rc;

use crate::error::LocationResult;

pub use memory::MemoryEnvironment;

#[cfg(target_arch = "wasm32")]
pub use browser::WindowEnvironment;

/// Callback invoked on back/forward navigation with the new live location.
///
/// An `Err` is handed back to whoever dispatched the event.
pub type PopStateHandler = Rc<dyn Fn(&BrowserLocation) -> LocationResult<()>>;

/// Snapshot of the environment's live location.
///
/// Components are in the browser's native form: `search` and `hash` are
/// still percent-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserLocation {
	/// `scheme://host[:port]`
	pub origin: String,
	/// Path, always starting with `/`.
	pub pathname: String,
	/// Query including `?`, or empty.
	pub search: String,
	/// Fragment including `#`, or empty.
	pub hash: String,
}

impl BrowserLocation {
	/// `pathname + search + hash`, i.e. the location without scheme and host.
	pub fn relative_url(&self) -> String {
		format!("{}{}{}", self.pathname, self.search, self.hash)
	}
}

/// Access to the address bar, the history stack and back/forward events.
pub trait NavigationEnvironment {
	/// Returns the live location.
	fn current(&self) -> LocationResult<BrowserLocation>;

	/// Appends a history entry whose visible address is `url`.
	///
	/// Entries are never replaced or cleared. No state object and no title
	/// are attached.
	fn push(&self, url: &str) -> LocationResult<()>;

	/// Registers `handler` for back/forward navigation.
	///
	/// The listener stays registered until the returned [`Subscription`] is
	/// dropped.
	fn on_pop_state(&self, handler: PopStateHandler) -> LocationResult<Subscription>;
}

/// Handle for a registered popstate listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription removes the listener immediately"]
pub struct Subscription {
	cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	/// Creates a subscription that runs `cancel` once when released.
	pub fn new<F>(cancel: F) -> Self
	where
		F: FnOnce() + 'static,
	{
		Self {
			cancel: Some(Box::new(cancel)),
		}
	}

	/// Removes the listener now.
	pub fn unsubscribe(mut self) {
		self.cancel();
	}

	fn cancel(&mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.cancel();
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("active", &self.cancel.is_some())
			.finish()
	}
}
