//! Nodes that receive scroll-driven transforms, and the handles used to bind them.

use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::geometry::Rect;
use crate::reactive::{create_signal, Signal};

/// A visual element the coordinator can measure and move.
///
/// Methods take `&self`: nodes are owned by the component that renders them
/// and mutate through interior mutability, the way a DOM element does.
/// [`bounding_rect`](Self::bounding_rect) runs while the
/// [`Coordinator`](crate::Coordinator) is busy and must not call back into it.
/// The write methods run afterwards and may.
pub trait MotionNode {
    /// Current bounding rect in viewport coordinates, or `None` if the node
    /// is detached.
    fn bounding_rect(&self) -> Option<Rect>;

    /// Write a CSS transform value.
    fn set_transform(&self, transform: &str);

    /// Hint that the node is (or stops) animating.
    fn set_will_change(&self, _will_change: bool) {}
}

type RectFn = Box<dyn Fn() -> Option<Rect>>;
type RenderFn = Box<dyn Fn(&str)>;
type HintFn = Box<dyn Fn(bool)>;

/// A [`MotionNode`] backed by closures, for hosts without a DOM.
///
/// # Example
///
/// ```ignore
/// let node = Rc::new(CallbackNode::new(
///     move || Some(layout.get()),
///     move |transform| renderer.set_transform(sprite, transform),
/// ));
/// ```
pub struct CallbackNode {
    rect: RectFn,
    render: RenderFn,
    hint: Option<HintFn>,
}

impl CallbackNode {
    pub fn new<R, F>(rect: R, render: F) -> Self
    where
        R: Fn() -> Option<Rect> + 'static,
        F: Fn(&str) + 'static,
    {
        Self {
            rect: Box::new(rect),
            render: Box::new(render),
            hint: None,
        }
    }

    /// Receive the will-animate hint as well.
    pub fn on_hint<H: Fn(bool) + 'static>(mut self, hint: H) -> Self {
        self.hint = Some(Box::new(hint));
        self
    }
}

impl MotionNode for CallbackNode {
    fn bounding_rect(&self) -> Option<Rect> {
        (self.rect)()
    }

    fn set_transform(&self, transform: &str) {
        (self.render)(transform)
    }

    fn set_will_change(&self, will_change: bool) {
        if let Some(hint) = &self.hint {
            hint(will_change);
        }
    }
}

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque registry key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(String);

impl ElementId {
    /// A fresh id, unique for the lifetime of the process.
    pub fn generate() -> Self {
        let n = NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed);
        Self(format!("motion-{}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-owning reference to a bound node, compared by identity.
#[derive(Clone)]
pub struct NodeSlot(pub(crate) Weak<dyn MotionNode>);

impl NodeSlot {
    pub fn upgrade(&self) -> Option<Rc<dyn MotionNode>> {
        self.0.upgrade()
    }
}

impl PartialEq for NodeSlot {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NodeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeSlot")
            .field(&self.0.as_ptr().cast::<()>())
            .finish()
    }
}

/// Reactive slot a component binds its node into once mounted.
///
/// The slot never keeps the node alive.
#[derive(Clone)]
pub struct NodeRef {
    slot: Signal<Option<NodeSlot>>,
}

impl NodeRef {
    pub fn new() -> Self {
        Self {
            slot: create_signal(None),
        }
    }

    /// Bind a mounted node.
    pub fn bind<N: MotionNode + 'static>(&self, node: &Rc<N>) {
        let weak: Weak<dyn MotionNode> = Rc::downgrade(node) as Weak<dyn MotionNode>;
        self.slot.set(Some(NodeSlot(weak)));
    }

    /// Forget the bound node.
    pub fn unbind(&self) {
        self.slot.set(None);
    }

    /// The bound node, tracked when read inside an effect.
    pub fn get(&self) -> Option<NodeSlot> {
        self.slot.get()
    }

    pub fn is_bound(&self) -> bool {
        self.slot.with_untracked(Option::is_some)
    }
}

impl Default for NodeRef {
    fn default() -> Self {
        Self::new()
    }
}
