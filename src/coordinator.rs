//! The element registry and its scroll tick.
//!
//! A [`Coordinator`] is the single source of truth for which nodes currently
//! want scroll-driven transforms. It is an explicit handle: create one per
//! page, clone it into whatever needs motion, and [`teardown`](Coordinator::teardown)
//! it when the page goes away.
//!
//! # Tick
//!
//! Every processed tick walks all entries once:
//!
//! 1. Entries are skipped while motion is globally off or reduced, or when
//!    their own config is disabled.
//! 2. The node's rect is read. A dropped or detached node marks the entry
//!    stale and skips it; it stays registered until its owner unregisters.
//! 3. Visible entries get a fresh transform (written only when it changed)
//!    and the will-animate hint. Entries that left the viewport keep their
//!    last transform.
//!
//! The hint is set only on entries that are being moved. Every other path
//! clears it: leaving the viewport, skipped entries, suspended ticks,
//! unregistering and teardown. Newly registered entries are settled at the
//! last processed scroll position without waiting for a tick.
//!
//! Node writes are applied after the registry is released, so
//! [`MotionNode::set_transform`] and [`MotionNode::set_will_change`] may call
//! back into the coordinator. [`MotionNode::bounding_rect`] may not.
//!
//! Ticks arrive through [`handle_scroll`](Coordinator::handle_scroll), which
//! throttles them, or directly through [`on_scroll_tick`](Coordinator::on_scroll_tick).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use bitflags::bitflags;

use crate::config::CoordinatorConfig;
use crate::geometry::Viewport;
use crate::motion::{MotionConfig, MotionConfigOverrides};
use crate::node::{ElementId, MotionNode};
use crate::reactive::Signal;
use crate::state::{GlobalMotionState, PerformanceLevel};
use crate::throttle::Throttle;
use crate::transform::{compute_transform, is_visible};

bitflags! {
    /// Per-element bookkeeping updated on every tick
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ElementFlags: u8 {
        /// Inside the viewport (plus threshold) on the last tick
        const VISIBLE     = 0b001;
        /// The will-animate hint is currently set on the node
        const WILL_CHANGE = 0b010;
        /// The node was gone or detached on the last tick
        const STALE       = 0b100;
    }
}

/// A registry entry.
#[derive(Clone)]
pub struct RegisteredElement {
    id: ElementId,
    node: Weak<dyn MotionNode>,
    config: MotionConfig,
    flags: ElementFlags,
    last_transform: Option<String>,
}

impl RegisteredElement {
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(ElementFlags::VISIBLE)
    }

    pub fn is_stale(&self) -> bool {
        self.flags.contains(ElementFlags::STALE)
    }

    pub fn flags(&self) -> ElementFlags {
        self.flags
    }

    /// The last transform written to the node, if any.
    pub fn last_transform(&self) -> Option<&str> {
        self.last_transform.as_deref()
    }
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    pub scroll_y: f32,
    /// Motion was globally off or reduced; no entry was touched
    pub suspended: bool,
    /// Entries whose rect was read
    pub processed: usize,
    pub visible: usize,
    /// Transforms actually written to nodes
    pub written: usize,
    pub disabled: usize,
    pub stale: usize,
}

/// Cumulative counters since the coordinator was created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoordinatorStats {
    pub ticks: u64,
    /// Scroll events coalesced by the throttle
    pub throttled: u64,
    pub transforms_written: u64,
}

/// A node update decided while the registry is borrowed.
enum NodeWrite {
    Transform(String),
    Hint(bool),
}

/// Node updates queued by a registry operation. They are applied after the
/// registry borrow ends, so node callbacks may call back into the coordinator.
#[derive(Default)]
struct PendingWrites(Vec<(Rc<dyn MotionNode>, NodeWrite)>);

impl PendingWrites {
    fn push(&mut self, node: Rc<dyn MotionNode>, write: NodeWrite) {
        self.0.push((node, write));
    }

    fn apply(self) {
        for (node, write) in self.0 {
            match write {
                NodeWrite::Transform(css) => node.set_transform(&css),
                NodeWrite::Hint(hint) => node.set_will_change(hint),
            }
        }
    }
}

/// Inputs shared by every entry of one pass.
#[derive(Clone, Copy)]
struct Pass {
    viewport: Viewport,
    multiplier: f32,
}

impl RegisteredElement {
    fn step(&mut self, pass: Pass, report: &mut TickReport, writes: &mut PendingWrites) {
        if self.config.disabled {
            self.release_hint(writes);
            report.disabled += 1;
            return;
        }

        let node_and_rect = self
            .node
            .upgrade()
            .and_then(|node| node.bounding_rect().map(|rect| (node, rect)));
        let Some((node, rect)) = node_and_rect else {
            if !self.flags.contains(ElementFlags::STALE) {
                log::debug!("Motion element {} has no attached node, skipping", self.id);
            }
            self.release_hint(writes);
            self.flags.insert(ElementFlags::STALE);
            self.flags.remove(ElementFlags::VISIBLE);
            report.stale += 1;
            return;
        };
        self.flags.remove(ElementFlags::STALE);
        report.processed += 1;

        let visible = is_visible(&rect, pass.viewport, self.config.threshold);
        self.flags.set(ElementFlags::VISIBLE, visible);
        if !visible {
            self.release_hint(writes);
            return;
        }

        report.visible += 1;
        if !self.flags.contains(ElementFlags::WILL_CHANGE) {
            self.flags.insert(ElementFlags::WILL_CHANGE);
            writes.push(node.clone(), NodeWrite::Hint(true));
        }

        let css = compute_transform(&rect, pass.viewport, &self.config, pass.multiplier).to_css();
        if self.last_transform.as_deref() != Some(css.as_str()) {
            self.last_transform = Some(css.clone());
            writes.push(node, NodeWrite::Transform(css));
            report.written += 1;
        }
    }

    /// Clear the will-animate hint if it is set. A dropped node only loses the flag.
    fn release_hint(&mut self, writes: &mut PendingWrites) {
        if !self.flags.contains(ElementFlags::WILL_CHANGE) {
            return;
        }
        self.flags.remove(ElementFlags::WILL_CHANGE);
        if let Some(node) = self.node.upgrade() {
            writes.push(node, NodeWrite::Hint(false));
        }
    }
}

struct Registry {
    elements: HashMap<ElementId, RegisteredElement>,
    config: CoordinatorConfig,
    state: Signal<GlobalMotionState>,
    throttle: Throttle,
    scroll_y: f32,
    stats: CoordinatorStats,
    torn_down: bool,
}

impl Registry {
    fn throttle_interval(&self) -> Duration {
        let level = self.state.with_untracked(|s| s.performance_level);
        if level == PerformanceLevel::Low {
            self.config.low_performance_interval
        } else {
            self.config.tick_interval
        }
    }

    /// `None` while motion is globally off or reduced.
    fn pass(&self) -> Option<Pass> {
        let state = self.state.get_untracked();
        state.motion_allowed().then(|| Pass {
            viewport: self.config.viewport,
            multiplier: self.config.speed_multiplier * state.performance_level.speed_factor(),
        })
    }

    fn process_tick(&mut self, scroll_y: f32, writes: &mut PendingWrites) -> TickReport {
        let mut report = TickReport {
            scroll_y,
            ..TickReport::default()
        };
        if self.torn_down {
            return report;
        }

        self.scroll_y = scroll_y;
        self.stats.ticks += 1;

        let Some(pass) = self.pass() else {
            report.suspended = true;
            for element in self.elements.values_mut() {
                element.release_hint(writes);
            }
            return report;
        };

        for element in self.elements.values_mut() {
            element.step(pass, &mut report, writes);
        }

        self.stats.transforms_written += report.written as u64;
        log::trace!(
            "Scroll tick y={} processed={} visible={} written={} stale={}",
            scroll_y,
            report.processed,
            report.visible,
            report.written,
            report.stale
        );
        report
    }

    /// Bring a single entry up to date with the last processed scroll position.
    fn settle(&mut self, id: &ElementId, writes: &mut PendingWrites) {
        let Some(pass) = self.pass() else {
            return;
        };
        let Some(element) = self.elements.get_mut(id) else {
            return;
        };
        let mut report = TickReport {
            scroll_y: self.scroll_y,
            ..TickReport::default()
        };
        element.step(pass, &mut report, writes);
        self.stats.transforms_written += report.written as u64;
    }
}

/// Handle to a page's parallax registry. Clones share the same registry.
#[derive(Clone)]
pub struct Coordinator {
    inner: Rc<RefCell<Registry>>,
}

impl Coordinator {
    pub fn new(config: CoordinatorConfig, state: Signal<GlobalMotionState>) -> Self {
        log::debug!(
            "Starting motion coordinator: viewport {}x{}",
            config.viewport.width,
            config.viewport.height
        );
        Self {
            inner: Rc::new(RefCell::new(Registry {
                elements: HashMap::new(),
                config,
                state,
                throttle: Throttle::new(),
                scroll_y: 0.0,
                stats: CoordinatorStats::default(),
                torn_down: false,
            })),
        }
    }

    /// Run `f` on the registry, then apply the node writes it queued.
    fn update<R>(&self, f: impl FnOnce(&mut Registry, &mut PendingWrites) -> R) -> R {
        let mut writes = PendingWrites::default();
        let out = f(&mut self.inner.borrow_mut(), &mut writes);
        writes.apply();
        out
    }

    /// The shared global motion state this coordinator reads.
    pub fn state(&self) -> Signal<GlobalMotionState> {
        self.inner.borrow().state.clone()
    }

    /// Register `node` under `id`, replacing any entry with the same id.
    ///
    /// The node is settled at the last processed scroll position right away,
    /// so it never waits for the first scroll to get its transform. Returns
    /// `false` when the coordinator was torn down.
    pub fn register<N: MotionNode + 'static>(
        &self,
        id: ElementId,
        node: &Rc<N>,
        config: MotionConfig,
    ) -> bool {
        let weak: Weak<dyn MotionNode> = Rc::downgrade(node) as Weak<dyn MotionNode>;
        self.register_weak(id, weak, config)
    }

    /// Register an already-downgraded node. See [`register`](Self::register).
    pub fn register_weak(
        &self,
        id: ElementId,
        node: Weak<dyn MotionNode>,
        config: MotionConfig,
    ) -> bool {
        self.update(|registry, writes| {
            if registry.torn_down {
                log::warn!("Ignoring registration of {} after teardown", id);
                return false;
            }

            let element = RegisteredElement {
                id: id.clone(),
                node,
                config: config.sanitized(),
                flags: ElementFlags::empty(),
                last_transform: None,
            };
            if let Some(mut previous) = registry.elements.insert(id.clone(), element) {
                log::debug!("Motion element {} registered twice, replacing", id);
                previous.release_hint(writes);
            }
            registry.settle(&id, writes);
            true
        })
    }

    /// Remove `id` and clear its will-animate hint. Unknown ids are ignored.
    pub fn unregister(&self, id: &ElementId) {
        self.update(|registry, writes| {
            if let Some(mut element) = registry.elements.remove(id) {
                element.release_hint(writes);
            }
        });
    }

    /// Shallow-merge `overrides` onto the entry's config. Unknown ids are ignored.
    pub fn update_config(&self, id: &ElementId, overrides: &MotionConfigOverrides) {
        if let Some(element) = self.inner.borrow_mut().elements.get_mut(id) {
            element.config = overrides.apply_to(&element.config).sanitized();
        }
    }

    /// Replace the entry's config wholesale. Unknown ids are ignored.
    pub fn replace_config(&self, id: &ElementId, config: MotionConfig) {
        if let Some(element) = self.inner.borrow_mut().elements.get_mut(id) {
            element.config = config.sanitized();
        }
    }

    /// Process a tick at `scroll_y` immediately, bypassing the throttle.
    pub fn on_scroll_tick(&self, scroll_y: f32) -> TickReport {
        self.update(|registry, writes| registry.process_tick(scroll_y, writes))
    }

    /// Feed a scroll event. Runs a tick if the throttle window allows it,
    /// otherwise parks the position for [`flush_pending`](Self::flush_pending).
    pub fn handle_scroll(&self, scroll_y: f32, now: Instant) -> Option<TickReport> {
        self.update(|registry, writes| {
            if registry.torn_down {
                return None;
            }

            let interval = registry.throttle_interval();
            match registry.throttle.offer(scroll_y, now, interval) {
                Some(scroll_y) => Some(registry.process_tick(scroll_y, writes)),
                None => {
                    registry.stats.throttled += 1;
                    None
                }
            }
        })
    }

    /// Process the parked scroll position once its throttle window elapsed.
    pub fn flush_pending(&self, now: Instant) -> Option<TickReport> {
        self.update(|registry, writes| {
            let interval = registry.throttle_interval();
            let scroll_y = registry.throttle.take_due(now, interval)?;
            Some(registry.process_tick(scroll_y, writes))
        })
    }

    /// Time until a parked scroll position is due, `None` without one.
    pub fn next_flush_in(&self, now: Instant) -> Option<Duration> {
        let registry = self.inner.borrow();
        registry
            .throttle
            .time_until_due(now, registry.throttle_interval())
    }

    /// Current minimum interval between processed ticks.
    pub fn throttle_interval(&self) -> Duration {
        self.inner.borrow().throttle_interval()
    }

    /// Re-run a tick at the last known scroll position.
    pub fn refresh(&self) -> TickReport {
        self.update(|registry, writes| {
            let scroll_y = registry.scroll_y;
            registry.process_tick(scroll_y, writes)
        })
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.inner.borrow_mut().config.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.inner.borrow().config.viewport
    }

    /// Last processed scroll position.
    pub fn scroll_y(&self) -> f32 {
        self.inner.borrow().scroll_y
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().elements.is_empty()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.inner.borrow().elements.contains_key(id)
    }

    /// Snapshot of an entry.
    pub fn element(&self, id: &ElementId) -> Option<RegisteredElement> {
        self.inner.borrow().elements.get(id).cloned()
    }

    pub fn stats(&self) -> CoordinatorStats {
        self.inner.borrow().stats
    }

    /// Drop every entry and any parked tick, clearing their hints. Later
    /// registrations and scroll events are ignored.
    pub fn teardown(&self) {
        self.update(|registry, writes| {
            if registry.torn_down {
                return;
            }
            log::debug!(
                "Tearing down motion coordinator with {} elements",
                registry.elements.len()
            );
            for (_, mut element) in registry.elements.drain() {
                element.release_hint(writes);
            }
            registry.throttle.clear();
            registry.torn_down = true;
        });
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.borrow().torn_down
    }
}
