//! Animation module
//!
//! The pose queue, the per-tick scheduler that drains it, and the async
//! driver that ticks the scheduler at the host refresh rate.

pub mod driver;
pub mod queue;
pub mod scheduler;

pub use driver::run_tick_loop;
pub use queue::{AnimationQueue, Axis, BoneProperty, BoneTarget, Direction, MotionFrame, PoseFrame};
pub use scheduler::{FrameProgress, FrameScheduler, Generation, ScheduleState, TickOutcome};
