//! Observable - Notify-on-change Field
//!
//! `Observable<T>` holds a value shared by every clone and calls its
//! subscribers whenever the owner changes that value.
//!
//! ## Key Features
//!
//! - **Read-only to consumers**: `get()`, `with()` and `subscribe()` are public,
//!   writes are reserved to the owning component.
//! - **Two-phase writes**: the owner stores new values with `replace()` and
//!   calls `notify()` afterwards, so several related fields can be updated
//!   before any subscriber runs.
//! - **Re-entrant notification**: subscribers may subscribe, unsubscribe or
//!   trigger another write while being notified.
//!
//! ## Example
//!
//! ```ignore
//! let field = Observable::new(String::from("/"));
//! let id = field.subscribe(|value| println!("now at {value}"));
//!
//! if field.replace("/users/".to_string()) {
//!     field.notify();
//! }
//! field.unsubscribe(id);
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;

extern crate alloc;
use alloc::rc::Rc;

/// Identifier returned by [`Observable::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
	value: RefCell<T>,
	subscribers: RefCell<Vec<(SubscriptionId, Subscriber<T>)>>,
	next_id: Cell<u64>,
}

/// A value that notifies subscribers when its owner changes it.
///
/// Cloning is cheap; all clones share the same value and subscribers.
pub struct Observable<T: 'static> {
	inner: Rc<Inner<T>>,
}

impl<T: 'static> Clone for Observable<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: 'static> Observable<T> {
	/// Creates a new observable holding `value`.
	pub fn new(value: T) -> Self {
		Self {
			inner: Rc::new(Inner {
				value: RefCell::new(value),
				subscribers: RefCell::new(Vec::new()),
				next_id: Cell::new(0),
			}),
		}
	}

	/// Returns a clone of the current value.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.inner.value.borrow().clone()
	}

	/// Runs `f` with a snapshot of the current value.
	///
	/// No borrow is held while `f` runs, so `f` may trigger a write (for
	/// example a navigation that updates this field).
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R
	where
		T: Clone,
	{
		let value = self.get();
		f(&value)
	}

	/// Registers `f` to run after every change.
	pub fn subscribe<F>(&self, f: F) -> SubscriptionId
	where
		F: Fn(&T) + 'static,
	{
		let id = SubscriptionId(self.inner.next_id.get());
		self.inner.next_id.set(id.0 + 1);
		self.inner.subscribers.borrow_mut().push((id, Rc::new(f)));
		id
	}

	/// Removes a subscriber. Returns `false` if `id` was unknown.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut subscribers = self.inner.subscribers.borrow_mut();
		let before = subscribers.len();
		subscribers.retain(|(sid, _)| *sid != id);
		subscribers.len() != before
	}

	/// Number of registered subscribers.
	pub fn subscriber_count(&self) -> usize {
		self.inner.subscribers.borrow().len()
	}

	/// Stores `value` without notifying. Returns `true` if it differs from the
	/// previous value.
	pub(crate) fn replace(&self, value: T) -> bool
	where
		T: PartialEq,
	{
		let mut current = self.inner.value.borrow_mut();
		if *current == value {
			return false;
		}
		*current = value;
		true
	}

	/// Calls every subscriber with the current value.
	pub(crate) fn notify(&self)
	where
		T: Clone,
	{
		// Snapshot so subscribers can re-enter.
		let subscribers: Vec<Subscriber<T>> = self
			.inner
			.subscribers
			.borrow()
			.iter()
			.map(|(_, f)| Rc::clone(f))
			.collect();
		let value = self.get();
		for subscriber in subscribers {
			subscriber(&value);
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Observable<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Observable")
			.field("value", &*self.inner.value.borrow())
			.field("subscribers", &self.inner.subscribers.borrow().len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_observable_creation() {
		let field = Observable::new(42);
		assert_eq!(field.get(), 42);
		assert_eq!(field.subscriber_count(), 0);
	}

	#[rstest]
	fn test_replace_reports_change() {
		let field = Observable::new("a".to_string());

		assert!(!field.replace("a".to_string()));
		assert!(field.replace("b".to_string()));
		assert_eq!(field.get(), "b");
	}

	#[rstest]
	fn test_replace_does_not_notify() {
		let field = Observable::new(0);
		let calls = Rc::new(Cell::new(0));
		let calls_clone = Rc::clone(&calls);
		field.subscribe(move |_| calls_clone.set(calls_clone.get() + 1));

		field.replace(1);
		assert_eq!(calls.get(), 0);

		field.notify();
		assert_eq!(calls.get(), 1);
	}

	#[rstest]
	fn test_clone_shares_value_and_subscribers() {
		let field = Observable::new(1);
		let other = field.clone();
		let seen = Rc::new(Cell::new(0));
		let seen_clone = Rc::clone(&seen);
		other.subscribe(move |v| seen_clone.set(*v));

		field.replace(7);
		field.notify();

		assert_eq!(other.get(), 7);
		assert_eq!(seen.get(), 7);
	}

	#[rstest]
	fn test_unsubscribe() {
		let field = Observable::new(0);
		let id = field.subscribe(|_| {});

		assert!(field.unsubscribe(id));
		assert!(!field.unsubscribe(id));
		assert_eq!(field.subscriber_count(), 0);
	}

	#[rstest]
	fn test_subscriber_may_unsubscribe_during_notify() {
		let field = Observable::new(0);
		let slot: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
		let field_clone = field.clone();
		let slot_clone = Rc::clone(&slot);
		let id = field.subscribe(move |_| {
			if let Some(id) = slot_clone.get() {
				field_clone.unsubscribe(id);
			}
		});
		slot.set(Some(id));

		field.replace(1);
		field.notify();

		assert_eq!(field.subscriber_count(), 0);
	}

	#[rstest]
	fn test_with_reads_value() {
		let field = Observable::new(vec![1, 2, 3]);
		assert_eq!(field.with(|v| v.len()), 3);
	}

	#[rstest]
	fn test_with_allows_write_inside_closure() {
		let field = Observable::new(1);

		let seen = field.with(|v| {
			field.replace(*v + 1);
			*v
		});

		assert_eq!(seen, 1);
		assert_eq!(field.get(), 2);
	}
}
