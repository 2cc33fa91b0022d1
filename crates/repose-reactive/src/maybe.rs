//! Inputs that may be either a plain value or a [`Signal`].
//!
//! Composables accept `impl Into<MaybeSignal<T>>` so callers can pass
//! `"https://..."` or a `Signal<String>` alike. Only the reactive variant ever
//! causes a watcher to fire.

use crate::signal::Signal;

#[derive(Clone, Debug)]
pub enum MaybeSignal<T: 'static> {
    Static(T),
    Dynamic(Signal<T>),
}

impl<T: 'static> MaybeSignal<T> {
    pub fn is_reactive(&self) -> bool {
        matches!(self, MaybeSignal::Dynamic(_))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        match self {
            MaybeSignal::Static(v) => v.clone(),
            MaybeSignal::Dynamic(s) => s.get(),
        }
    }

    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        match self {
            MaybeSignal::Static(v) => v.clone(),
            MaybeSignal::Dynamic(s) => s.get_untracked(),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        match self {
            MaybeSignal::Static(v) => f(v),
            MaybeSignal::Dynamic(s) => s.with(f),
        }
    }

    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        match self {
            MaybeSignal::Static(v) => f(v),
            MaybeSignal::Dynamic(s) => s.with_untracked(f),
        }
    }
}

impl<T: Default + 'static> Default for MaybeSignal<T> {
    fn default() -> Self {
        MaybeSignal::Static(T::default())
    }
}

impl<T: 'static> From<T> for MaybeSignal<T> {
    fn from(v: T) -> Self {
        MaybeSignal::Static(v)
    }
}

impl<T: 'static> From<Signal<T>> for MaybeSignal<T> {
    fn from(s: Signal<T>) -> Self {
        MaybeSignal::Dynamic(s)
    }
}

impl<T: 'static> From<&Signal<T>> for MaybeSignal<T> {
    fn from(s: &Signal<T>) -> Self {
        MaybeSignal::Dynamic(s.clone())
    }
}

impl From<&str> for MaybeSignal<String> {
    fn from(s: &str) -> Self {
        MaybeSignal::Static(s.to_owned())
    }
}

/// Registers every signal reachable from `self` with the current observer.
///
/// This is what makes a [`watch`](crate::watch) "deep": a value holding
/// signals of its own reports them too, so writes to nested cells count as a
/// change of the outer value.
pub trait DeepTrack {
    fn track_deep(&self);
}

macro_rules! leaf_track {
    ($($t:ty),* $(,)?) => {
        $(impl DeepTrack for $t {
            fn track_deep(&self) {}
        })*
    };
}

leaf_track!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    String,
    &'static str,
);

impl<T: DeepTrack + 'static> DeepTrack for Signal<T> {
    fn track_deep(&self) {
        self.with(|v| v.track_deep());
    }
}

impl<T: DeepTrack + 'static> DeepTrack for MaybeSignal<T> {
    fn track_deep(&self) {
        self.with(|v| v.track_deep());
    }
}

impl<T: DeepTrack> DeepTrack for Option<T> {
    fn track_deep(&self) {
        if let Some(v) = self {
            v.track_deep();
        }
    }
}

impl<T: DeepTrack> DeepTrack for Vec<T> {
    fn track_deep(&self) {
        self.iter().for_each(DeepTrack::track_deep);
    }
}

macro_rules! tuple_track {
    ($($name:ident),+) => {
        impl<$($name: DeepTrack),+> DeepTrack for ($($name,)+) {
            #[allow(non_snake_case)]
            fn track_deep(&self) {
                let ($($name,)+) = self;
                $($name.track_deep();)+
            }
        }
    };
}

tuple_track!(A, B);
tuple_track!(A, B, C);
