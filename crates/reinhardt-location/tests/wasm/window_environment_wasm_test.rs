//! Browser tests for `WindowEnvironment`.
//!
//! Run with:
//!   wasm-pack test --chrome --headless crates/reinhardt-location

#[cfg(target_arch = "wasm32")]
mod wasm_window_tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use reinhardt_location::{
		BrowserLocation, LocationBinder, NavigationEnvironment, PopStateHandler, WindowEnvironment,
	};
	use wasm_bindgen::JsValue;
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	fn history_length() -> u32 {
		web_sys::window()
			.and_then(|w| w.history().ok())
			.and_then(|h| h.length().ok())
			.unwrap_or(0)
	}

	/// Changes the address bar behind the binder's back.
	fn push_state(url: &str) {
		web_sys::window()
			.unwrap()
			.history()
			.unwrap()
			.push_state_with_url(&JsValue::NULL, "", Some(url))
			.unwrap();
	}

	fn dispatch_pop_state() {
		let event = web_sys::Event::new("popstate").unwrap();
		web_sys::window().unwrap().dispatch_event(&event).unwrap();
	}

	#[wasm_bindgen_test]
	fn test_current_matches_window_location() {
		let env = WindowEnvironment::new().unwrap();
		let location = env.current().unwrap();
		let window_location = web_sys::window().unwrap().location();

		assert_eq!(location.origin, window_location.origin().unwrap());
		assert_eq!(location.pathname, window_location.pathname().unwrap());
	}

	#[wasm_bindgen_test]
	fn test_attach_does_not_push() {
		let before = history_length();
		let binder = LocationBinder::attach(WindowEnvironment::new().unwrap()).unwrap();

		assert_eq!(history_length(), before);
		binder.detach();
	}

	#[wasm_bindgen_test]
	fn test_set_url_updates_address_bar() {
		let binder = LocationBinder::attach(WindowEnvironment::new().unwrap()).unwrap();
		let before = history_length();

		binder.set_url("/wasm-test/?x=hello%20world#frag%2Fpart").unwrap();

		let location = web_sys::window().unwrap().location();
		assert_eq!(location.pathname().unwrap(), "/wasm-test/");
		assert_eq!(location.search().unwrap(), "?x=hello%20world");
		assert_eq!(binder.search(), "?x=hello world");
		assert_eq!(binder.hash(), "#frag/part");
		assert_eq!(history_length(), before + 1);
		binder.detach();
	}

	#[wasm_bindgen_test]
	fn test_popstate_event_updates_fields_without_push() {
		let binder = LocationBinder::attach(WindowEnvironment::new().unwrap()).unwrap();
		binder.set_url("/p1").unwrap();
		push_state("/p2?tab=1#top");
		let before = history_length();

		dispatch_pop_state();

		assert_eq!(binder.url(), "/p2?tab=1#top");
		assert_eq!(binder.pathname(), "/p2");
		assert_eq!(binder.search(), "?tab=1");
		assert_eq!(binder.hash(), "#top");
		assert_eq!(history_length(), before);
		assert!(!binder.is_push_suppressed());
		binder.detach();
	}

	#[wasm_bindgen_test]
	fn test_detach_removes_popstate_listener() {
		let binder = LocationBinder::attach(WindowEnvironment::new().unwrap()).unwrap();
		binder.set_url("/p1").unwrap();
		push_state("/p2");
		dispatch_pop_state();
		let url = binder.url_field().clone();
		assert_eq!(url.get(), "/p2");

		binder.detach();
		push_state("/p3");
		dispatch_pop_state();

		assert_eq!(url.get(), "/p2");
	}

	#[wasm_bindgen_test]
	fn test_dropping_subscription_removes_listener() {
		let env = WindowEnvironment::new().unwrap();
		let calls = Rc::new(Cell::new(0));
		let calls_clone = Rc::clone(&calls);
		let handler: PopStateHandler = Rc::new(move |_: &BrowserLocation| {
			calls_clone.set(calls_clone.get() + 1);
			Ok(())
		});
		let subscription = env.on_pop_state(handler).unwrap();

		dispatch_pop_state();
		assert_eq!(calls.get(), 1);

		drop(subscription);
		dispatch_pop_state();
		assert_eq!(calls.get(), 1);
	}
}
