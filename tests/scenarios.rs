use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use parallax::prelude::*;
use parallax::transform::{compute_transform, is_visible};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Node whose rect follows a shared scroll position, like an element in a page.
struct PageNode {
    page_y: f32,
    height: f32,
    scroll_y: Rc<Cell<f32>>,
    transforms: RefCell<Vec<String>>,
}

impl PageNode {
    fn new(page_y: f32, scroll_y: &Rc<Cell<f32>>) -> Rc<Self> {
        Rc::new(Self {
            page_y,
            height: 100.0,
            scroll_y: scroll_y.clone(),
            transforms: RefCell::new(Vec::new()),
        })
    }

    fn last(&self) -> Option<String> {
        self.transforms.borrow().last().cloned()
    }
}

impl MotionNode for PageNode {
    fn bounding_rect(&self) -> Option<Rect> {
        Some(Rect::new(0.0, self.page_y - self.scroll_y.get(), 400.0, self.height))
    }

    fn set_transform(&self, transform: &str) {
        self.transforms.borrow_mut().push(transform.to_string());
    }
}

fn setup() -> (Coordinator, Rc<Cell<f32>>) {
    init_logging();
    let coordinator = Coordinator::new(
        CoordinatorConfig::new().viewport(1280.0, 800.0),
        create_motion_state(GlobalMotionState::default()),
    );
    (coordinator, Rc::new(Cell::new(0.0)))
}

fn preset(preset: Preset) -> MotionConfig {
    resolve(preset, &MotionConfigOverrides::new())
}

#[test]
fn transform_is_idempotent_for_fixed_inputs() {
    let viewport = Viewport::new(1280.0, 800.0);
    for p in Preset::ALL {
        let config = resolve(p, &MotionConfigOverrides::new().offset(3.5));
        for y in [-400.0, -10.0, 0.0, 123.4, 399.0, 1200.0] {
            let rect = Rect::new(0.0, y, 300.0, 150.0);
            let first = compute_transform(&rect, viewport, &config, 0.75).to_css();
            let second = compute_transform(&rect, viewport, &config, 0.75).to_css();
            assert_eq!(first, second, "{p} at {y}");
        }
    }
}

#[test]
fn registry_is_empty_after_balanced_unregisters() {
    let (coordinator, scroll) = setup();
    let nodes: Vec<_> = (0..50).map(|i| PageNode::new(i as f32 * 40.0, &scroll)).collect();
    let mut ids = Vec::new();

    for (i, node) in nodes.iter().enumerate() {
        let id = ElementId::generate();
        coordinator.register(id.clone(), node, preset(Preset::ALL[i % 6]));
        ids.push(id);
        if i % 7 == 0 {
            // Interleave some early removals
            coordinator.unregister(&ids[i / 2]);
        }
    }
    for id in &ids {
        coordinator.unregister(id);
    }

    assert_eq!(coordinator.len(), 0);
}

#[test]
fn disabled_elements_are_never_written() {
    let (coordinator, scroll) = setup();
    let node = PageNode::new(300.0, &scroll);
    let config = resolve(Preset::Foreground, &MotionConfigOverrides::new().disabled(true));
    coordinator.register("disabled".into(), &node, config);

    for y in [0.0, 150.0, 300.0, 450.0, 2000.0] {
        scroll.set(y);
        let report = coordinator.on_scroll_tick(y);
        assert_eq!(report.disabled, 1);
    }
    assert!(node.transforms.borrow().is_empty());
}

#[test]
fn visibility_threshold_boundary_is_inclusive() {
    let viewport = Viewport::new(1280.0, 800.0);
    let threshold = 120.0;
    let at_edge = Rect::new(0.0, viewport.height + threshold, 100.0, 100.0);
    let past_edge = Rect::new(0.0, viewport.height + threshold + 1.0, 100.0, 100.0);

    assert!(is_visible(&at_edge, viewport, threshold));
    assert!(!is_visible(&past_edge, viewport, threshold));
}

#[test]
fn direction_restricts_translation_axes() {
    let viewport = Viewport::new(1280.0, 800.0);
    let rect = Rect::new(0.0, 100.0, 100.0, 100.0);

    let vertical = compute_transform(&rect, viewport, &preset(Preset::Content), 1.0).to_css();
    assert!(vertical.starts_with("translateY("), "{vertical}");
    assert!(!vertical.contains("translateX") && !vertical.contains("translate3d"));

    let horizontal = compute_transform(&rect, viewport, &preset(Preset::Horizontal), 1.0).to_css();
    assert!(horizontal.starts_with("translateX("), "{horizontal}");
    assert!(!horizontal.contains("translateY") && !horizontal.contains("translate3d"));

    let both = compute_transform(&rect, viewport, &preset(Preset::Floating), 1.0).to_css();
    assert!(both.starts_with("translate3d("), "{both}");
}

#[test]
fn preset_override_changes_only_that_field() {
    let content = Preset::Content.config();
    let resolved = resolve(Preset::Content, &MotionConfigOverrides::new().speed(0.9));

    assert_eq!(resolved.speed, 0.9);
    assert_eq!(resolved.direction, content.direction);
    assert_eq!(resolved.easing, content.easing);
    assert_eq!(resolved.offset, content.offset);
    assert_eq!(resolved.threshold, content.threshold);
    assert_eq!(resolved.disabled, content.disabled);
}

#[test]
fn subtle_element_moves_vertically_after_scroll() {
    let (coordinator, scroll) = setup();
    // Rect top ends up at 200 once the page is scrolled to 500
    let node = PageNode::new(700.0, &scroll);
    let id = ElementId::generate();
    coordinator.register(id.clone(), &node, preset(Preset::Subtle));
    coordinator.on_scroll_tick(0.0);

    scroll.set(500.0);
    coordinator.on_scroll_tick(500.0);

    let element = coordinator.element(&id).unwrap();
    assert!(element.is_visible());
    let transform = node.last().expect("transform applied");
    assert!(transform.starts_with("translateY("), "{transform}");
    assert_ne!(transform, "translateY(0.00px)");
    assert_eq!(transform, "translateY(15.00px)");
}

#[test]
fn unregistered_element_gets_no_work() {
    let (coordinator, scroll) = setup();
    let node = PageNode::new(100.0, &scroll);
    let id = ElementId::generate();
    coordinator.register(id.clone(), &node, preset(Preset::Content));
    coordinator.unregister(&id);
    let settled = node.transforms.borrow().len();

    scroll.set(50.0);
    let report = coordinator.on_scroll_tick(50.0);
    assert_eq!(report.processed, 0);
    assert_eq!(node.transforms.borrow().len(), settled);
}

#[test]
fn globally_disabled_motion_keeps_registration() {
    let (coordinator, scroll) = setup();
    let state = coordinator.state();
    state.update(|s| s.enabled = false);

    let node = PageNode::new(100.0, &scroll);
    let id = ElementId::generate();
    coordinator.register(id.clone(), &node, preset(Preset::Content));

    for y in [0.0, 50.0, 100.0] {
        scroll.set(y);
        assert!(coordinator.on_scroll_tick(y).suspended);
    }
    assert!(node.transforms.borrow().is_empty());
    assert!(coordinator.contains(&id));

    state.update(|s| s.enabled = true);
    assert_eq!(coordinator.refresh().written, 1);
}

#[test]
fn thousand_floating_elements_tick_in_linear_time() {
    let (coordinator, scroll) = setup();
    let nodes: Vec<_> = (0..1000)
        .map(|i| PageNode::new((i % 40) as f32 * 25.0, &scroll))
        .collect();
    for node in &nodes {
        coordinator.register(ElementId::generate(), node, preset(Preset::Floating));
    }

    let start = Instant::now();
    let report = coordinator.on_scroll_tick(0.0);
    let elapsed = start.elapsed();

    assert_eq!(report.processed, 1000);
    assert!(
        elapsed < Duration::from_millis(500),
        "tick over 1000 elements took {:?}",
        elapsed
    );
}

#[test]
fn bound_element_is_placed_before_any_scroll() {
    let (coordinator, scroll) = setup();
    let (mut scroll_loop, _sender) = ScrollLoop::new(coordinator.clone()).unwrap();
    let node = PageNode::new(300.0, &scroll);

    let binding = use_motion(&coordinator, Preset::Content, MotionConfigOverrides::new());
    binding.element_ref().bind(&node);
    for _ in 0..3 {
        scroll_loop.dispatch(Some(Duration::from_millis(5))).unwrap();
    }

    assert!(binding.is_registered());
    assert_eq!(node.transforms.borrow().len(), 1);
    let transform = node.last().unwrap();
    assert!(transform.starts_with("translateY("), "{transform}");
    assert_ne!(transform, "translateY(0.00px)");
}

#[test]
fn hook_lifecycle_end_to_end() {
    let (coordinator, scroll) = setup();
    let node = PageNode::new(900.0, &scroll);

    let binding = use_motion(&coordinator, Preset::Foreground, MotionConfigOverrides::new());
    binding.element_ref().bind(&node);
    assert!(binding.is_registered());

    scroll.set(400.0);
    let (mut scroll_loop, sender) = ScrollLoop::new(coordinator.clone()).unwrap();
    sender.scroll(400.0).unwrap();
    scroll_loop.dispatch(Some(Duration::ZERO)).unwrap();
    assert!(node.last().is_some());

    binding.unmount();
    assert!(coordinator.is_empty());
    scroll_loop.shutdown();
    coordinator.teardown();
}
