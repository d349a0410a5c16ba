use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParallaxError {
    #[error("Unknown motion preset: {0}")]
    UnknownPreset(String),
    #[error("Unknown easing curve: {0}")]
    UnknownEasing(String),
    #[error("Unknown motion direction: {0}")]
    UnknownDirection(String),
    #[error("Event loop error: {0}")]
    EventLoop(#[from] calloop::Error),
    #[error("Scroll loop has shut down")]
    LoopClosed,
}

pub type Result<T> = std::result::Result<T, ParallaxError>;
