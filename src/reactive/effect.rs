use super::runtime::{run_effect, try_with_runtime, with_runtime, EffectId};

/// A side effect that re-runs whenever a signal it read last time changes.
///
/// The effect runs once on creation. Dropping the handle disposes it.
pub struct Effect {
    id: EffectId,
}

impl Effect {
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let id = with_runtime(|rt| rt.allocate_effect(Box::new(f)));
        run_effect(id);

        Self { id }
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        // The callback may own other effects; drop it outside the runtime borrow
        let callback = try_with_runtime(|rt| rt.dispose_effect(self.id)).flatten();
        drop(callback);
    }
}

pub fn create_effect<F>(f: F) -> Effect
where
    F: FnMut() + 'static,
{
    Effect::new(f)
}
