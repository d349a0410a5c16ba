//! Component-side glue: bind one node's lifecycle to a [`Coordinator`].
//!
//! ```ignore
//! let motion = use_motion(&coordinator, Preset::Floating, MotionConfigOverrides::new());
//! // once the node is mounted
//! motion.element_ref().bind(&node);
//! // on unmount, drop the binding
//! drop(motion);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::coordinator::Coordinator;
use crate::motion::{resolve, MotionConfigOverrides, Preset};
use crate::node::{ElementId, NodeRef, NodeSlot};
use crate::reactive::{create_effect, Effect, IntoMaybeDyn};

/// A live registration owned by a component.
///
/// Dropping the binding unregisters its element exactly once.
pub struct MotionBinding {
    id: ElementId,
    element_ref: NodeRef,
    coordinator: Coordinator,
    registered: Rc<RefCell<Option<NodeSlot>>>,
    _effect: Effect,
}

impl MotionBinding {
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// Slot the component binds its node into.
    pub fn element_ref(&self) -> &NodeRef {
        &self.element_ref
    }

    /// Whether the coordinator currently holds this binding's element.
    pub fn is_registered(&self) -> bool {
        self.registered.borrow().is_some() && self.coordinator.contains(&self.id)
    }

    /// Explicit unmount; same as dropping the binding.
    pub fn unmount(self) {}
}

impl Drop for MotionBinding {
    fn drop(&mut self) {
        self.registered.borrow_mut().take();
        self.coordinator.unregister(&self.id);
    }
}

/// Register a node with `coordinator` once it is bound and motion is enabled.
///
/// `preset` and `overrides` may be static values, signals or closures. When
/// they change, the element's config is replaced with the newly resolved one;
/// the element is not re-registered. Rebinding a different node re-registers
/// under the same id.
pub fn use_motion(
    coordinator: &Coordinator,
    preset: impl IntoMaybeDyn<Preset>,
    overrides: impl IntoMaybeDyn<MotionConfigOverrides>,
) -> MotionBinding {
    let id = ElementId::generate();
    let element_ref = NodeRef::new();
    let registered: Rc<RefCell<Option<NodeSlot>>> = Rc::new(RefCell::new(None));

    let preset = preset.into_maybe_dyn();
    let overrides = overrides.into_maybe_dyn();
    let state = coordinator.state();

    let effect = {
        let id = id.clone();
        let element_ref = element_ref.clone();
        let coordinator = coordinator.clone();
        let registered = registered.clone();

        create_effect(move || {
            // Read every dependency up front so each run subscribes to all of them
            let node = element_ref.get();
            let enabled = state.with(|s| s.enabled);
            let config = resolve(preset.get(), &overrides.get());

            // Coordinator calls may run node callbacks; no borrow is held across them
            let current = registered.borrow().clone();
            match node {
                Some(slot) if current.as_ref() == Some(&slot) => {
                    coordinator.replace_config(&id, config);
                }
                Some(slot) if enabled || current.is_some() => {
                    log::debug!("Registering motion element {}", id);
                    let stored = coordinator
                        .register_weak(id.clone(), slot.0.clone(), config)
                        .then_some(slot);
                    *registered.borrow_mut() = stored;
                }
                Some(_) => {}
                None => {
                    let previous = registered.borrow_mut().take();
                    if previous.is_some() {
                        coordinator.unregister(&id);
                    }
                }
            }
        })
    };

    MotionBinding {
        id,
        element_ref,
        coordinator: coordinator.clone(),
        registered,
        _effect: effect,
    }
}
