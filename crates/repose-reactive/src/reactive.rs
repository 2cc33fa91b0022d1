use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

pub type SignalId = usize;
pub type ObserverId = usize;

thread_local! {
    static CURRENT_OBSERVER: Cell<Option<ObserverId>> = const { Cell::new(None) };
    static GRAPH: RefCell<DepGraph> = RefCell::new(DepGraph::default());
    static NEXT_SIGNAL: Cell<SignalId> = const { Cell::new(0) };
}

#[derive(Default)]
struct DepGraph {
    next_observer: ObserverId,
    // signal_id -> observers that depend on it
    edges: HashMap<SignalId, HashSet<ObserverId>>,
    // observer_id -> signals it depends on
    back: HashMap<ObserverId, HashSet<SignalId>>,
    // recompute closures
    observers: HashMap<ObserverId, Rc<dyn Fn()>>,
    running: HashSet<ObserverId>,
}

impl DepGraph {
    fn remove_all_edges_for(&mut self, obs: ObserverId) {
        if let Some(signals) = self.back.remove(&obs) {
            for s in signals {
                if let Some(set) = self.edges.get_mut(&s) {
                    set.remove(&obs);
                }
            }
        }
    }

    fn remove_observer(&mut self, obs: ObserverId) {
        self.observers.remove(&obs);
        self.remove_all_edges_for(obs);
        self.running.remove(&obs);
    }

    /// Marks `obs` as running and hands back its closure, or `None` if it is
    /// gone or already on the stack.
    fn begin_run(&mut self, obs: ObserverId) -> Option<Rc<dyn Fn()>> {
        if self.running.contains(&obs) {
            return None;
        }
        let f = self.observers.get(&obs).cloned()?;
        self.running.insert(obs);
        // clear previous deps before recompute
        self.remove_all_edges_for(obs);
        Some(f)
    }
}

/// Restores the previous observer even if the tracked closure unwinds.
struct ObserverGuard(Option<ObserverId>);

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        CURRENT_OBSERVER.with(|co| co.set(self.0));
    }
}

/// Runs `f` with `obs` as the current observer; reads inside `f` become
/// dependencies of `obs`.
pub fn with_observer<R>(obs: Option<ObserverId>, f: impl FnOnce() -> R) -> R {
    let _guard = ObserverGuard(CURRENT_OBSERVER.with(|co| co.replace(obs)));
    f()
}

/// Runs `f` without recording any dependency.
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
    with_observer(None, f)
}

pub fn current_observer() -> Option<ObserverId> {
    CURRENT_OBSERVER.with(|co| co.get())
}

pub fn next_signal_id() -> SignalId {
    NEXT_SIGNAL.with(|n| {
        let id = n.get();
        n.set(id + 1);
        id
    })
}

pub fn register_signal_read(sig: SignalId) {
    let Some(obs) = current_observer() else {
        return;
    };
    GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        // a disposed observer may still be finishing its last run
        if !g.observers.contains_key(&obs) {
            return;
        }
        g.edges.entry(sig).or_default().insert(obs);
        g.back.entry(obs).or_default().insert(sig);
    });
}

pub fn signal_changed(sig: SignalId) {
    let mut queue: VecDeque<ObserverId> = GRAPH.with(|g| {
        let g = g.borrow();
        let mut dependents: Vec<ObserverId> = g
            .edges
            .get(&sig)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        // creation order keeps notification deterministic
        dependents.sort_unstable();
        dependents.into()
    });

    while let Some(obs) = queue.pop_front() {
        let Some(f) = GRAPH.with(|g| g.borrow_mut().begin_run(obs)) else {
            continue;
        };
        with_observer(Some(obs), || f());
        GRAPH.with(|g| {
            g.borrow_mut().running.remove(&obs);
        });
    }
}

/// Drops every edge pointing at a signal that no longer exists.
pub fn forget_signal(sig: SignalId) {
    // may run during thread-local teardown
    let _ = GRAPH.try_with(|g| {
        if let Ok(mut g) = g.try_borrow_mut()
            && let Some(observers) = g.edges.remove(&sig)
        {
            for obs in observers {
                if let Some(set) = g.back.get_mut(&obs) {
                    set.remove(&sig);
                }
            }
        }
    });
}

pub fn new_observer(f: impl Fn() + 'static) -> ObserverId {
    GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        let id = g.next_observer;
        g.next_observer += 1;
        g.observers.insert(id, Rc::new(f));
        id
    })
}

/// Remove an observer and all of its dependency edges.
pub fn remove_observer(id: ObserverId) {
    let _ = GRAPH.try_with(|g| {
        if let Ok(mut g) = g.try_borrow_mut() {
            g.remove_observer(id);
        } else {
            log::warn!("remove_observer({id}): dependency graph busy; observer leaked");
        }
    });
}

pub fn run_observer_now(id: ObserverId) {
    let Some(f) = GRAPH.with(|g| g.borrow_mut().begin_run(id)) else {
        return;
    };
    with_observer(Some(id), || f());
    GRAPH.with(|g| {
        g.borrow_mut().running.remove(&id);
    });
}

/// Number of observers currently depending on `sig`.
pub fn dependents_of(sig: SignalId) -> usize {
    GRAPH.with(|g| g.borrow().edges.get(&sig).map_or(0, HashSet::len))
}
