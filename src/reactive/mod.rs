//! Minimal signal/effect runtime used by motion bindings.
//!
//! Signals hold values; effects re-run when a signal they read changes.
//! Everything runs on the thread that created it.

pub mod effect;
pub mod maybe_dyn;
pub mod runtime;
pub mod signal;

pub use effect::{create_effect, Effect};
pub use maybe_dyn::{IntoMaybeDyn, MaybeDyn};
pub use signal::{create_signal, Signal};
