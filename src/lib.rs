//! Scroll-synchronized parallax.
//!
//! Elements register with a [`Coordinator`] under a [`MotionConfig`] resolved
//! from a [`Preset`] plus per-call overrides. On every throttled scroll tick
//! the coordinator measures each element, decides whether it is visible and
//! writes a translation onto it.
//!
//! ```ignore
//! let state = create_motion_state(GlobalMotionState::default());
//! let coordinator = Coordinator::new(CoordinatorConfig::default(), state.clone());
//! let (mut scroll_loop, scroll) = ScrollLoop::new(coordinator.clone())?;
//!
//! let motion = use_motion(&coordinator, Preset::Background, MotionConfigOverrides::new());
//! motion.element_ref().bind(&hero_node);
//!
//! scroll.scroll(window_scroll_y)?;
//! scroll_loop.dispatch(Some(Duration::from_millis(16)))?;
//! ```

pub mod config;
pub mod coordinator;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod hook;
pub mod motion;
pub mod node;
pub mod performance;
pub mod reactive;
pub mod state;
pub mod throttle;
pub mod transform;

pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, CoordinatorStats, ElementFlags, RegisteredElement, TickReport};
pub use driver::{ScrollEvent, ScrollLoop, ScrollSender};
pub use error::{ParallaxError, Result};
pub use hook::{use_motion, MotionBinding};
pub use parallax_macros::Overrides;
pub use performance::{DeviceProfile, PerformanceMonitor};
pub use state::{create_motion_state, GlobalMotionState, PerformanceLevel};

pub mod prelude {
    pub use crate::geometry::{Rect, Viewport};
    pub use crate::motion::{resolve, Direction, Easing, MotionConfig, MotionConfigOverrides, Preset};
    pub use crate::node::{CallbackNode, ElementId, MotionNode, NodeRef};
    pub use crate::reactive::{create_effect, create_signal, Effect, IntoMaybeDyn, MaybeDyn, Signal};
    pub use crate::transform::Transform;
    pub use crate::{
        create_motion_state, use_motion, Coordinator, CoordinatorConfig, DeviceProfile,
        GlobalMotionState, MotionBinding, ParallaxError, PerformanceLevel, PerformanceMonitor,
        ScrollLoop, ScrollSender, TickReport,
    };
}
