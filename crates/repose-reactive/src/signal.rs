use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::reactive::{self, SignalId};

new_key_type! {
    /// Handle returned by [`Signal::subscribe`].
    pub struct SubId;
}

/// Observable, reactive value.
///
/// Reads through [`get`](Signal::get) / [`with`](Signal::with) are recorded by
/// the dependency graph; writes notify explicit subscribers first, then every
/// observer that read the signal.
pub struct Signal<T: 'static>(Rc<Inner<T>>);

struct Inner<T> {
    id: SignalId,
    value: RefCell<T>,
    subs: RefCell<SlotMap<SubId, Rc<dyn Fn(&T)>>>,
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        reactive::forget_signal(self.id);
    }
}

impl<T: 'static> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.0.id)
            .field("value", &*self.0.value.borrow())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(Inner {
            id: reactive::next_signal_id(),
            value: RefCell::new(value),
            subs: RefCell::new(SlotMap::with_key()),
        }))
    }

    pub fn id(&self) -> SignalId {
        self.0.id
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.track();
        self.0.value.borrow().clone()
    }

    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.0.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.track();
        f(&self.0.value.borrow())
    }

    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.value.borrow())
    }

    /// Registers a read with the current observer without touching the value.
    pub fn track(&self) {
        reactive::register_signal_read(self.0.id);
    }

    pub fn set(&self, v: T) {
        *self.0.value.borrow_mut() = v;
        self.notify();
    }

    /// Mutates in place. Counts as a change even if `f` leaves the value as is.
    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        f(&mut self.0.value.borrow_mut());
        self.notify();
    }

    /// Subscribers must not write to the signal they observe.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        self.0.subs.borrow_mut().insert(Rc::new(f))
    }

    pub fn unsubscribe(&self, id: SubId) -> bool {
        self.0.subs.borrow_mut().remove(id).is_some()
    }

    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal(self.clone())
    }

    fn notify(&self) {
        let subs: Vec<Rc<dyn Fn(&T)>> = self.0.subs.borrow().values().cloned().collect();
        if !subs.is_empty() {
            let value = self.0.value.borrow();
            for s in subs {
                s(&value);
            }
        }
        reactive::signal_changed(self.0.id);
    }
}

impl<T: Default + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

pub fn signal<T: 'static>(t: T) -> Signal<T> {
    Signal::new(t)
}

/// Read-only view of a [`Signal`] handed out to consumers.
pub struct ReadSignal<T: 'static>(Signal<T>);

impl<T: 'static> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: 'static> ReadSignal<T> {
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.get()
    }

    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.0.get_untracked()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with(f)
    }

    pub fn track(&self) {
        self.0.track()
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        self.0.subscribe(f)
    }

    pub fn unsubscribe(&self, id: SubId) -> bool {
        self.0.unsubscribe(id)
    }
}

impl<T: 'static> From<Signal<T>> for ReadSignal<T> {
    fn from(s: Signal<T>) -> Self {
        s.read_only()
    }
}
