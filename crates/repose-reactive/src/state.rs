use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::reactive::{self, ObserverId, SignalId};

/// Lazily recomputed value derived from other signals.
///
/// The first [`get`](Computed::get) runs `compute` under tracking; any write to
/// a signal it read drops the cache and notifies whoever read the computed.
/// Nothing is recomputed until the next read.
pub struct Computed<T: 'static>(Rc<ComputedInner<T>>);

struct ComputedInner<T> {
    id: SignalId,
    observer: Cell<Option<ObserverId>>,
    compute: Box<dyn Fn() -> T>,
    cached: RefCell<Option<T>>,
}

impl<T: Clone + 'static> Computed<T> {
    pub fn new(compute: impl Fn() -> T + 'static) -> Self {
        let inner = Rc::new(ComputedInner {
            id: reactive::next_signal_id(),
            observer: Cell::new(None),
            compute: Box::new(compute),
            cached: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let obs = reactive::new_observer(move || {
            if let Some(inner) = weak.upgrade() {
                inner.invalidate();
            }
        });
        inner.observer.set(Some(obs));

        Self(inner)
    }

    pub fn get(&self) -> T {
        reactive::register_signal_read(self.0.id);
        if let Some(v) = self.0.cached.borrow().as_ref() {
            return v.clone();
        }
        let v = reactive::with_observer(self.0.observer.get(), || (self.0.compute)());
        *self.0.cached.borrow_mut() = Some(v.clone());
        v
    }

    pub fn get_untracked(&self) -> T {
        reactive::untrack(|| self.get())
    }

    /// Drops the cached value without notifying dependents.
    pub fn invalidate(&self) {
        self.0.cached.borrow_mut().take();
    }

    pub fn is_cached(&self) -> bool {
        self.0.cached.borrow().is_some()
    }
}

impl<T> ComputedInner<T> {
    fn invalidate(&self) {
        let was_cached = self.cached.borrow_mut().take().is_some();
        if was_cached {
            reactive::signal_changed(self.id);
        }
    }
}

impl<T> Drop for ComputedInner<T> {
    fn drop(&mut self) {
        if let Some(obs) = self.observer.take() {
            reactive::remove_observer(obs);
        }
        reactive::forget_signal(self.id);
    }
}

impl<T: 'static> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computed")
            .field("id", &self.0.id)
            .field("cached", &*self.0.cached.borrow())
            .finish()
    }
}

pub fn computed<T: Clone + 'static>(compute: impl Fn() -> T + 'static) -> Computed<T> {
    Computed::new(compute)
}
