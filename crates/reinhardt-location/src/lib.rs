//! Reinhardt Location - Address Bar Binding for WASM Frontends
//!
//! Keeps four reactive fields (`pathname`, `search`, `hash`, `url`) and the
//! browser's address bar consistent in both directions:
//!
//! - writing `url` navigates and pushes a history entry;
//! - back/forward navigation updates the fields without pushing.
//!
//! ## Architecture
//!
//! - [`binder`]: [`LocationBinder`], the two-way binding and its guard flag
//! - [`environment`]: [`NavigationEnvironment`], the injected access to the
//!   address bar and history stack, with a browser-backed implementation
//!   (WASM only) and an in-memory one
//! - [`observable`]: [`Observable`], notify-on-change fields
//! - [`state`]: [`NavigationState`], URL parsing and percent-decoding
//! - [`settings`]: [`LocationSettings`] for environments without a browser
//! - [`error`]: [`LocationError`]
//!
//! ## Example
//!
//! ```ignore
//! use reinhardt_location::{LocationBinder, WindowEnvironment};
//!
//! let binder = LocationBinder::attach(WindowEnvironment::new()?)?;
//! binder.pathname_field().subscribe(|pathname| render_route(pathname));
//!
//! // Navigate programmatically
//! binder.set_url("/users/42/?tab=posts")?;
//! ```
//!
//! Outside the browser, [`MemoryEnvironment`] provides the same history
//! semantics:
//!
//! ```
//! use reinhardt_location::{LocationBinder, MemoryEnvironment};
//!
//! let env = MemoryEnvironment::new("http://localhost", "/").unwrap();
//! let binder = LocationBinder::attach(env.clone()).unwrap();
//!
//! binder.set_url("/a?x=hello%20world#frag%2Fpart").unwrap();
//! assert_eq!(binder.search(), "?x=hello world");
//! assert_eq!(binder.hash(), "#frag/part");
//! ```

pub mod binder;
pub mod environment;
pub mod error;
pub mod observable;
pub mod settings;
pub mod state;

pub use binder::LocationBinder;
pub use environment::{
	BrowserLocation, MemoryEnvironment, NavigationEnvironment, PopStateHandler, Subscription,
};
pub use error::{LocationError, LocationResult};
pub use observable::{Observable, SubscriptionId};
pub use settings::LocationSettings;
pub use state::NavigationState;

#[cfg(target_arch = "wasm32")]
pub use environment::WindowEnvironment;
