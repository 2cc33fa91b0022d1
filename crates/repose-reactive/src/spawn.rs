use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::executor::{LocalPool, LocalSpawner as PoolSpawner};
use futures::task::LocalSpawnExt;

pub use futures::future::LocalBoxFuture;

/// Runs futures on the UI thread. Watch callbacks are synchronous, so anything
/// async they start goes through here.
pub trait Spawn {
    fn spawn_local(&self, fut: LocalBoxFuture<'static, ()>);
}

impl<S: Spawn + ?Sized> Spawn for Rc<S> {
    fn spawn_local(&self, fut: LocalBoxFuture<'static, ()>) {
        (**self).spawn_local(fut)
    }
}

/// Single-threaded executor the host loop (or a test) drives with
/// [`LocalSpawner::run_until_stalled`].
///
/// Spawned futures interleave: one that waits on I/O does not hold back the
/// others. Clones share the same pool.
#[derive(Clone)]
pub struct LocalSpawner {
    pool: Rc<RefCell<LocalPool>>,
    spawner: PoolSpawner,
    pending: Rc<Cell<usize>>,
    finished: Rc<Cell<usize>>,
}

impl Default for LocalSpawner {
    fn default() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            pool: Rc::new(RefCell::new(pool)),
            spawner,
            pending: Rc::new(Cell::new(0)),
            finished: Rc::new(Cell::new(0)),
        }
    }
}

impl LocalSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawned futures that have not completed yet.
    pub fn pending(&self) -> usize {
        self.pending.get()
    }

    /// Polls every task, including ones spawned meanwhile, until none can make
    /// progress. Returns how many completed during the call.
    pub fn run_until_stalled(&self) -> usize {
        let Ok(mut pool) = self.pool.try_borrow_mut() else {
            log::warn!("LocalSpawner::run_until_stalled called from inside a task; ignored");
            return 0;
        };
        let before = self.finished.get();
        pool.run_until_stalled();
        self.finished.get() - before
    }
}

impl Spawn for LocalSpawner {
    fn spawn_local(&self, fut: LocalBoxFuture<'static, ()>) {
        let pending = self.pending.clone();
        let finished = self.finished.clone();
        pending.set(pending.get() + 1);

        let task = async move {
            fut.await;
            pending.set(pending.get() - 1);
            finished.set(finished.get() + 1);
        };
        if let Err(e) = self.spawner.spawn_local(task) {
            self.pending.set(self.pending.get() - 1);
            log::error!("LocalSpawner: failed to spawn task: {e}");
        }
    }
}

/// Spawns onto a Tokio [`LocalSet`](tokio::task::LocalSet), for transports
/// that need a Tokio reactor (such as `reqwest` on native targets).
///
/// Tasks make progress only while the set is driven, e.g. through
/// [`TokioSpawner::block_on`].
#[cfg(all(feature = "tokio", not(target_arch = "wasm32")))]
#[derive(Clone, Default)]
pub struct TokioSpawner {
    local: Rc<tokio::task::LocalSet>,
}

#[cfg(all(feature = "tokio", not(target_arch = "wasm32")))]
impl TokioSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn local_set(&self) -> &tokio::task::LocalSet {
        &self.local
    }

    /// Runs `fut` on `runtime` while also driving every spawned task.
    pub fn block_on<F: std::future::Future>(
        &self,
        runtime: &tokio::runtime::Runtime,
        fut: F,
    ) -> F::Output {
        runtime.block_on(self.local.run_until(fut))
    }
}

#[cfg(all(feature = "tokio", not(target_arch = "wasm32")))]
impl Spawn for TokioSpawner {
    fn spawn_local(&self, fut: LocalBoxFuture<'static, ()>) {
        // detached; the task keeps running without its handle
        drop(self.local.spawn_local(fut));
    }
}

/// Hands futures to the browser's microtask queue.
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
#[derive(Clone, Copy, Default)]
pub struct WasmSpawner;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
impl Spawn for WasmSpawner {
    fn spawn_local(&self, fut: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(fut);
    }
}
