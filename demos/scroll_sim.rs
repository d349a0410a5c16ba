use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use parallax::prelude::*;

/// A landing page section at a fixed page offset.
fn section(name: &'static str, page_y: f32, height: f32, scroll: &Rc<Cell<f32>>) -> Rc<CallbackNode> {
    let scroll = scroll.clone();
    Rc::new(
        CallbackNode::new(
            move || Some(Rect::new(0.0, page_y - scroll.get(), 1280.0, height)),
            move |transform| log::info!("{:>10}: {}", name, transform),
        )
        .on_hint(move |hint| log::debug!("{:>10}: will-change {}", name, hint)),
    )
}

fn main() -> parallax::Result<()> {
    env_logger::init();

    let state = create_motion_state(GlobalMotionState::default());
    let mut monitor = PerformanceMonitor::new(state.clone(), DeviceProfile::default());
    let coordinator = Coordinator::new(CoordinatorConfig::new().viewport(1280.0, 800.0), state);

    let scroll = Rc::new(Cell::new(0.0f32));
    let hero = section("hero", 0.0, 800.0, &scroll);
    let features = section("features", 900.0, 600.0, &scroll);
    let badge = section("badge", 1200.0, 120.0, &scroll);
    let footer = section("footer", 2400.0, 300.0, &scroll);

    // Bindings live as long as the "page" is mounted
    let bindings = [
        (use_motion(&coordinator, Preset::Background, MotionConfigOverrides::new()), &hero),
        (use_motion(&coordinator, Preset::Content, MotionConfigOverrides::new()), &features),
        (
            use_motion(&coordinator, Preset::Floating, MotionConfigOverrides::new().offset(12.0)),
            &badge,
        ),
        (use_motion(&coordinator, Preset::Subtle, MotionConfigOverrides::new()), &footer),
    ];
    for (binding, node) in &bindings {
        binding.element_ref().bind(*node);
    }
    log::info!("{} elements registered", coordinator.len());

    let (mut scroll_loop, sender) = ScrollLoop::new(coordinator.clone())?;

    let start = Instant::now();
    for step in 0..40u32 {
        let y = step as f32 * 45.0;
        scroll.set(y);
        monitor.record_frame(start + Duration::from_millis(16) * step);
        monitor.record_activity(Instant::now());

        sender.scroll(y)?;
        scroll_loop.dispatch(Some(Duration::from_millis(20)))?;
    }

    let stats = coordinator.stats();
    log::info!(
        "ticks={} throttled={} written={}",
        stats.ticks,
        stats.throttled,
        stats.transforms_written
    );

    drop(bindings);
    scroll_loop.shutdown();
    coordinator.teardown();
    Ok(())
}
