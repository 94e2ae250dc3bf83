//! Time subsystem.
//!
//! Provides frame timing utilities without coupling to the runtime.
//! - one `FrameClock` per render loop
//! - call `tick()` once per presented frame to obtain `FrameTime`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
