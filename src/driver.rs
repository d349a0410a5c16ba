//! The page's single scroll subscription, driven by a calloop event loop.
//!
//! Scroll positions are posted through a [`ScrollSender`]; posting never
//! blocks the producer. The loop forwards them to
//! [`Coordinator::handle_scroll`] and runs a timer at the current throttle
//! interval that flushes the last position of each window.

use std::time::{Duration, Instant};

use calloop::channel::{self, Channel, Event, Sender};
use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, LoopHandle, RegistrationToken};

use crate::coordinator::Coordinator;
use crate::error::{ParallaxError, Result};

/// A scroll position observed by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEvent {
    pub scroll_y: f32,
    pub at: Instant,
}

/// Cheap, cloneable producer side of the scroll subscription.
#[derive(Clone)]
pub struct ScrollSender {
    sender: Sender<ScrollEvent>,
}

impl ScrollSender {
    /// Post the current scroll position, stamped now.
    pub fn scroll(&self, scroll_y: f32) -> Result<()> {
        self.send(ScrollEvent {
            scroll_y,
            at: Instant::now(),
        })
    }

    pub fn send(&self, event: ScrollEvent) -> Result<()> {
        self.sender
            .send(event)
            .map_err(|_| ParallaxError::LoopClosed)
    }
}

/// Owns the event loop and the scroll subscription for one coordinator.
///
/// [`shutdown`](Self::shutdown) (or dropping the loop) removes the
/// subscription; the coordinator itself is left untouched.
pub struct ScrollLoop {
    event_loop: EventLoop<'static, Coordinator>,
    coordinator: Coordinator,
    tokens: Vec<RegistrationToken>,
}

impl ScrollLoop {
    pub fn new(coordinator: Coordinator) -> Result<(Self, ScrollSender)> {
        let event_loop: EventLoop<'static, Coordinator> = EventLoop::try_new()?;
        let (sender, channel) = channel::channel::<ScrollEvent>();

        let handle = event_loop.handle();
        let scroll_token = insert_scroll_source(&handle, channel)?;
        let flush_token = insert_flush_timer(&handle, coordinator.throttle_interval())?;

        log::debug!("Scroll loop started");
        Ok((
            Self {
                event_loop,
                coordinator,
                tokens: vec![scroll_token, flush_token],
            },
            ScrollSender { sender },
        ))
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Whether the scroll subscription is still installed.
    pub fn is_subscribed(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Run one loop iteration, waiting at most `timeout` for events.
    pub fn dispatch(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.event_loop.dispatch(timeout, &mut self.coordinator)?;
        Ok(())
    }

    /// Remove the scroll subscription.
    pub fn shutdown(&mut self) {
        if self.tokens.is_empty() {
            return;
        }
        let handle = self.event_loop.handle();
        for token in self.tokens.drain(..) {
            handle.remove(token);
        }
        log::debug!("Scroll loop stopped");
    }
}

impl Drop for ScrollLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn insert_scroll_source(
    handle: &LoopHandle<'static, Coordinator>,
    channel: Channel<ScrollEvent>,
) -> Result<RegistrationToken> {
    handle
        .insert_source(channel, |event, _, coordinator: &mut Coordinator| match event {
            Event::Msg(event) => {
                coordinator.handle_scroll(event.scroll_y, event.at);
            }
            Event::Closed => log::debug!("All scroll senders dropped"),
        })
        .map_err(|e| ParallaxError::EventLoop(e.error))
}

fn insert_flush_timer(
    handle: &LoopHandle<'static, Coordinator>,
    interval: Duration,
) -> Result<RegistrationToken> {
    handle
        .insert_source(
            Timer::from_duration(interval),
            |_deadline, _, coordinator: &mut Coordinator| {
                coordinator.flush_pending(Instant::now());
                TimeoutAction::ToDuration(coordinator.throttle_interval())
            },
        )
        .map_err(|e| ParallaxError::EventLoop(e.error))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::CoordinatorConfig;
    use crate::geometry::Rect;
    use crate::motion::{resolve, MotionConfigOverrides, Preset};
    use crate::node::CallbackNode;
    use crate::state::{create_motion_state, GlobalMotionState};

    fn coordinator() -> Coordinator {
        Coordinator::new(
            CoordinatorConfig::default(),
            create_motion_state(GlobalMotionState::default()),
        )
    }

    #[test]
    fn test_scroll_events_reach_coordinator() {
        let coordinator = coordinator();
        let written = Rc::new(RefCell::new(Vec::new()));
        let sink = written.clone();
        let node = Rc::new(CallbackNode::new(
            || Some(Rect::new(0.0, 100.0, 100.0, 100.0)),
            move |t| sink.borrow_mut().push(t.to_string()),
        ));
        coordinator.register(
            "hero".into(),
            &node,
            resolve(Preset::Content, &MotionConfigOverrides::new()),
        );

        assert_eq!(written.borrow().len(), 1);

        let (mut scroll_loop, sender) = ScrollLoop::new(coordinator.clone()).unwrap();
        sender.scroll(240.0).unwrap();
        scroll_loop.dispatch(Some(Duration::ZERO)).unwrap();

        assert_eq!(coordinator.scroll_y(), 240.0);
        assert_eq!(coordinator.stats().ticks, 1);
    }

    #[test]
    fn test_timer_delivers_last_position_of_window() {
        let coordinator = coordinator();
        let (mut scroll_loop, sender) = ScrollLoop::new(coordinator.clone()).unwrap();

        let start = Instant::now();
        sender
            .send(ScrollEvent {
                scroll_y: 100.0,
                at: start,
            })
            .unwrap();
        sender
            .send(ScrollEvent {
                scroll_y: 180.0,
                at: start + Duration::from_millis(4),
            })
            .unwrap();
        scroll_loop.dispatch(Some(Duration::ZERO)).unwrap();
        assert_eq!(coordinator.scroll_y(), 100.0);
        assert_eq!(coordinator.stats().throttled, 1);

        // The flush timer re-arms every interval; give it a few rounds
        for _ in 0..20 {
            if coordinator.scroll_y() == 180.0 {
                break;
            }
            scroll_loop.dispatch(Some(Duration::from_millis(50))).unwrap();
        }
        assert_eq!(coordinator.scroll_y(), 180.0);
        assert_eq!(coordinator.stats().ticks, 2);
    }

    #[test]
    fn test_shutdown_removes_subscription() {
        let (mut scroll_loop, sender) = ScrollLoop::new(coordinator()).unwrap();
        assert!(scroll_loop.is_subscribed());

        scroll_loop.shutdown();
        assert!(!scroll_loop.is_subscribed());
        scroll_loop.shutdown();

        // Events posted after shutdown are never delivered
        let _ = sender.scroll(10.0);
        scroll_loop.dispatch(Some(Duration::ZERO)).unwrap();
        assert_eq!(scroll_loop.coordinator().scroll_y(), 0.0);
    }

    #[test]
    fn test_send_fails_once_loop_is_gone() {
        let (scroll_loop, sender) = ScrollLoop::new(coordinator()).unwrap();
        drop(scroll_loop);
        assert!(matches!(sender.scroll(1.0), Err(ParallaxError::LoopClosed)));
    }
}
