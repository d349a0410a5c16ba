use std::rc::Rc;

use super::signal::Signal;
use crate::motion::{MotionConfigOverrides, Preset};

/// Input to a motion binding: a fixed value, or a getter re-read on every run.
///
/// Getters that read signals make the reading effect depend on them.
pub enum MaybeDyn<T: 'static> {
    Static(T),
    Dynamic(Rc<dyn Fn() -> T>),
}

impl<T: Clone + 'static> MaybeDyn<T> {
    pub fn get(&self) -> T {
        match self {
            Self::Static(value) => value.clone(),
            Self::Dynamic(read) => read(),
        }
    }

    pub fn fixed(value: T) -> Self {
        Self::Static(value)
    }

    pub fn dynamic(read: impl Fn() -> T + 'static) -> Self {
        Self::Dynamic(Rc::new(read))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

impl<T: Clone + 'static> Clone for MaybeDyn<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(value) => Self::Static(value.clone()),
            Self::Dynamic(read) => Self::Dynamic(Rc::clone(read)),
        }
    }
}

/// Conversion accepted by [`use_motion`](crate::hook::use_motion) arguments.
pub trait IntoMaybeDyn<T: Clone + 'static> {
    fn into_maybe_dyn(self) -> MaybeDyn<T>;
}

// One impl per static type; a blanket one would overlap the closure impl

impl IntoMaybeDyn<Preset> for Preset {
    fn into_maybe_dyn(self) -> MaybeDyn<Preset> {
        MaybeDyn::Static(self)
    }
}

impl IntoMaybeDyn<MotionConfigOverrides> for MotionConfigOverrides {
    fn into_maybe_dyn(self) -> MaybeDyn<MotionConfigOverrides> {
        MaybeDyn::Static(self)
    }
}

impl<T, F> IntoMaybeDyn<T> for F
where
    T: Clone + 'static,
    F: Fn() -> T + 'static,
{
    fn into_maybe_dyn(self) -> MaybeDyn<T> {
        MaybeDyn::dynamic(self)
    }
}

impl<T: Clone + 'static> IntoMaybeDyn<T> for Signal<T> {
    fn into_maybe_dyn(self) -> MaybeDyn<T> {
        MaybeDyn::dynamic(move || self.get())
    }
}

impl<T: Clone + 'static> IntoMaybeDyn<T> for MaybeDyn<T> {
    fn into_maybe_dyn(self) -> MaybeDyn<T> {
        self
    }
}
