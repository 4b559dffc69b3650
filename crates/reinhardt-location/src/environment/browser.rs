//! Browser environment backed by `window.location` and `window.history`.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, Window};

use super::{BrowserLocation, NavigationEnvironment, PopStateHandler, Subscription};
use crate::error::{LocationError, LocationResult};

/// [`NavigationEnvironment`] for the real browser window.
///
/// # WASM Only
///
/// This type only exists on `wasm32` targets.
#[derive(Debug, Clone)]
pub struct WindowEnvironment {
	window: Window,
}

impl WindowEnvironment {
	/// Binds to the global `window`.
	pub fn new() -> LocationResult<Self> {
		let window = web_sys::window()
			.ok_or_else(|| LocationError::Environment("no global window".to_string()))?;
		Ok(Self { window })
	}

	/// Binds to a specific window.
	pub fn from_window(window: Window) -> Self {
		Self { window }
	}
}

fn js_error(context: &str, err: JsValue) -> LocationError {
	let detail = match err.dyn_ref::<js_sys::Error>() {
		Some(error) => String::from(error.message()),
		None => err.as_string().unwrap_or_else(|| format!("{:?}", err)),
	};
	LocationError::Environment(format!("{}: {}", context, detail))
}

fn to_js_error(err: LocationError) -> JsValue {
	js_sys::Error::new(&err.to_string()).into()
}

fn read_location(window: &Window) -> LocationResult<BrowserLocation> {
	let location = window.location();
	Ok(BrowserLocation {
		origin: location.origin().map_err(|e| js_error("location.origin", e))?,
		pathname: location
			.pathname()
			.map_err(|e| js_error("location.pathname", e))?,
		search: location.search().map_err(|e| js_error("location.search", e))?,
		hash: location.hash().map_err(|e| js_error("location.hash", e))?,
	})
}

impl NavigationEnvironment for WindowEnvironment {
	fn current(&self) -> LocationResult<BrowserLocation> {
		read_location(&self.window)
	}

	fn push(&self, url: &str) -> LocationResult<()> {
		self.window
			.history()
			.map_err(|e| js_error("window.history", e))?
			.push_state_with_url(&JsValue::NULL, "", Some(url))
			.map_err(|e| js_error("history.pushState", e))
	}

	fn on_pop_state(&self, handler: PopStateHandler) -> LocationResult<Subscription> {
		let window = self.window.clone();
		// Errors are rethrown so they surface like any uncaught listener exception.
		let closure = Closure::<dyn FnMut(Event) -> Result<(), JsValue>>::new(move |_: Event| {
			let location = read_location(&window).map_err(to_js_error)?;
			handler(&location).map_err(to_js_error)
		});

		self.window
			.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
			.map_err(|e| js_error("addEventListener(popstate)", e))?;

		let target = self.window.clone();
		Ok(Subscription::new(move || {
			if let Err(err) = target
				.remove_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
			{
				tracing::warn!(
					target: "reinhardt_location",
					error = %js_error("removeEventListener(popstate)", err),
					"failed to remove popstate listener"
				);
			}
		}))
	}
}
