use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::default());
}

pub type SignalId = usize;
pub type EffectId = usize;

type EffectCallback = Box<dyn FnMut()>;

struct EffectSlot {
    /// `None` while the callback is running or once disposed
    callback: Option<EffectCallback>,
    alive: bool,
    sources: HashSet<SignalId>,
}

/// Per-thread dependency graph between signals and effects.
#[derive(Default)]
pub struct Runtime {
    running: Option<EffectId>,
    effects: Vec<EffectSlot>,
    subscribers: Vec<HashSet<EffectId>>,
    queue: VecDeque<EffectId>,
    queued: HashSet<EffectId>,
    flushing: bool,
    free_effects: Vec<EffectId>,
    free_signals: Vec<SignalId>,
}

impl Runtime {
    pub fn allocate_signal(&mut self) -> SignalId {
        if let Some(signal) = self.free_signals.pop() {
            return signal;
        }
        self.subscribers.push(HashSet::new());
        self.subscribers.len() - 1
    }

    /// Release a dropped signal's slot for reuse.
    pub fn dispose_signal(&mut self, signal: SignalId) {
        let Some(subscribers) = self.subscribers.get_mut(signal) else {
            return;
        };
        for effect in std::mem::take(subscribers) {
            if let Some(slot) = self.effects.get_mut(effect) {
                slot.sources.remove(&signal);
            }
        }
        self.free_signals.push(signal);
    }

    pub fn allocate_effect(&mut self, callback: EffectCallback) -> EffectId {
        let slot = EffectSlot {
            callback: Some(callback),
            alive: true,
            sources: HashSet::new(),
        };
        if let Some(effect) = self.free_effects.pop() {
            self.effects[effect] = slot;
            return effect;
        }
        self.effects.push(slot);
        self.effects.len() - 1
    }

    /// Subscribe the running effect, if any, to `signal`.
    pub fn track_read(&mut self, signal: SignalId) {
        let Some(effect) = self.running else {
            return;
        };
        // Signals created on another thread are unknown here
        let Some(subscribers) = self.subscribers.get_mut(signal) else {
            return;
        };
        subscribers.insert(effect);
        self.effects[effect].sources.insert(signal);
    }

    /// Queue every subscriber of `signal` that is not queued yet.
    pub fn notify_write(&mut self, signal: SignalId) {
        let Some(subscribers) = self.subscribers.get(signal) else {
            return;
        };
        for &effect in subscribers {
            if self.queued.insert(effect) {
                self.queue.push_back(effect);
            }
        }
    }

    /// Disconnect `effect` from the graph. The callback is handed back so it is
    /// dropped after the runtime borrow ends.
    #[must_use]
    pub fn dispose_effect(&mut self, effect: EffectId) -> Option<EffectCallback> {
        let slot = self.effects.get_mut(effect).filter(|slot| slot.alive)?;
        slot.alive = false;
        let sources = std::mem::take(&mut slot.sources);
        let callback = slot.callback.take();

        self.unsubscribe(effect, sources);
        if self.queued.remove(&effect) {
            self.queue.retain(|&queued| queued != effect);
        }
        // A running effect is recycled once its callback comes back
        if callback.is_some() {
            self.free_effects.push(effect);
        }
        callback
    }

    fn unsubscribe(&mut self, effect: EffectId, sources: HashSet<SignalId>) {
        for signal in sources {
            if let Some(subscribers) = self.subscribers.get_mut(signal) {
                subscribers.remove(&effect);
            }
        }
    }

    /// Clear the dependencies of `effect`, mark it running and lend out its callback.
    fn begin_effect(&mut self, effect: EffectId) -> Option<(EffectCallback, Option<EffectId>)> {
        let slot = self.effects.get_mut(effect).filter(|slot| slot.alive)?;
        let callback = slot.callback.take()?;
        let sources = std::mem::take(&mut slot.sources);

        self.unsubscribe(effect, sources);
        let outer = self.running.replace(effect);
        Some((callback, outer))
    }

    /// Return a lent callback. Effects disposed while running hand it back
    /// to the caller for dropping.
    fn end_effect(
        &mut self,
        effect: EffectId,
        callback: EffectCallback,
        outer: Option<EffectId>,
    ) -> Option<EffectCallback> {
        self.running = outer;
        let slot = &mut self.effects[effect];
        if slot.alive {
            slot.callback = Some(callback);
            None
        } else {
            self.free_effects.push(effect);
            Some(callback)
        }
    }

    fn pop_queued(&mut self) -> Option<EffectId> {
        let effect = self.queue.pop_front()?;
        self.queued.remove(&effect);
        Some(effect)
    }
}

pub fn with_runtime<F, R>(f: F) -> R
where
    F: FnOnce(&mut Runtime) -> R,
{
    RUNTIME.with(|rt| f(&mut rt.borrow_mut()))
}

/// Like [`with_runtime`], but returns `None` while the runtime is borrowed
/// further up the stack or already destroyed at thread exit.
pub fn try_with_runtime<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut Runtime) -> R,
{
    RUNTIME
        .try_with(|rt| rt.try_borrow_mut().ok().map(|mut runtime| f(&mut runtime)))
        .ok()
        .flatten()
}

/// Run an effect, recording the signals it reads as its new dependencies.
///
/// The callback runs with the runtime released, so it may read and write
/// signals or create and drop other effects.
pub fn run_effect(effect: EffectId) {
    let Some((mut callback, outer)) = with_runtime(|rt| rt.begin_effect(effect)) else {
        return;
    };

    callback();

    let orphaned = with_runtime(|rt| rt.end_effect(effect, callback, outer));
    drop(orphaned);
}

/// Run queued effects until the queue is empty.
///
/// Nested calls (a signal written from inside an effect) return at once and
/// leave the work to the outermost flush.
pub fn flush_effects() {
    let nested = with_runtime(|rt| std::mem::replace(&mut rt.flushing, true));
    if nested {
        return;
    }

    while let Some(effect) = with_runtime(|rt| rt.pop_queued()) {
        run_effect(effect);
    }

    with_runtime(|rt| rt.flushing = false);
}
