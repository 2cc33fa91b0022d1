use std::cell::Cell;

use crate::effects::{Dispose, effect};
use crate::maybe::DeepTrack;
use crate::reactive;

/// Calls `callback` with the new output of `source` every time a signal read
/// by `source` changes. The callback does not run for the initial read.
///
/// `callback` runs untracked, so it may read or write any signal without
/// becoming a dependency. Dropping the returned [`Dispose`] does nothing; call
/// [`Dispose::run`] (or dispose the enclosing [`Scope`](crate::Scope)) to stop
/// watching.
pub fn watch<S, F>(source: impl Fn() -> S + 'static, callback: F) -> Dispose
where
    S: 'static,
    F: Fn(S) + 'static,
{
    effect(move || {
        let primed = Cell::new(false);
        let id = reactive::new_observer(move || {
            let value = source();
            if primed.replace(true) {
                reactive::untrack(|| callback(value));
            }
        });
        reactive::run_observer_now(id);
        Dispose::new(move || reactive::remove_observer(id))
    })
}

/// [`watch`] over every signal reachable from `source`, including nested
/// cells. The callback only learns that something changed.
pub fn watch_deep<T>(source: T, callback: impl Fn() + 'static) -> Dispose
where
    T: DeepTrack + 'static,
{
    watch(move || source.track_deep(), move |()| callback())
}
