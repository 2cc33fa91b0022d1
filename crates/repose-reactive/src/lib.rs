//! # Signals, derived values, and watchers
//!
//! The reactive substrate under Repose's composables (`repose-fetch`,
//! `repose-forms`). Everything here is single-threaded: handles are `Rc`
//! based and the dependency graph lives in a thread-local.
//!
//! - `Signal<T>`: observable, reactive value.
//! - `Computed<T>`: cached value derived from other signals.
//! - `watch` / `watch_deep`: run a callback when tracked signals change.
//! - `Scope` / `Dispose`: tie subscriptions to the lifetime of a UI element.
//! - `Spawn`: where async work started from a watcher runs.
//!
//! ## Signals
//!
//! ```rust
//! use repose_reactive::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! ## Derived state
//!
//! ```rust
//! use repose_reactive::*;
//!
//! let first = signal("Jane".to_string());
//! let last = signal("Doe".to_string());
//!
//! let full = computed({
//!     let first = first.clone();
//!     let last = last.clone();
//!     move || format!("{} {}", first.get(), last.get())
//! });
//!
//! assert_eq!(full.get(), "Jane Doe");
//! last.set("Roe".into());
//! assert_eq!(full.get(), "Jane Roe");
//! ```
//!
//! ## Watching
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//! use repose_reactive::*;
//!
//! let query = signal(String::from("rust"));
//! let hits = Rc::new(Cell::new(0));
//!
//! let stop = watch_deep(query.clone(), {
//!     let hits = hits.clone();
//!     move || hits.set(hits.get() + 1)
//! });
//!
//! query.set("repose".into());
//! assert_eq!(hits.get(), 1);
//!
//! stop.run();
//! query.set("ignored".into());
//! assert_eq!(hits.get(), 1);
//! ```
//!
//! Watchers created inside `Scope::run` are released by `Scope::dispose`.

pub mod effects;
pub mod maybe;
pub mod prelude;
pub mod reactive;
pub mod scope;
pub mod signal;
pub mod spawn;
pub mod state;
pub mod watch;


pub use effects::*;
pub use maybe::*;
pub use reactive::untrack;
pub use scope::*;
pub use signal::*;
pub use spawn::*;
pub use state::*;
pub use watch::*;
