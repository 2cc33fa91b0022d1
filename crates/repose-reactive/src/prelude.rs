pub use crate::effects::{Dispose, effect, on_unmount};
pub use crate::maybe::{DeepTrack, MaybeSignal};
pub use crate::reactive::untrack;
pub use crate::scope::{Scope, current_scope};
pub use crate::signal::{ReadSignal, Signal, SubId, signal};
pub use crate::spawn::{LocalBoxFuture, LocalSpawner, Spawn};
#[cfg(all(feature = "tokio", not(target_arch = "wasm32")))]
pub use crate::spawn::TokioSpawner;
pub use crate::state::{Computed, computed};
pub use crate::watch::{watch, watch_deep};
