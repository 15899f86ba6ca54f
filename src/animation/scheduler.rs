//! Frame scheduler
//!
//! Cooperative state machine advanced once per host refresh. Bones of the
//! head motion frame move together each tick; frames are strictly
//! sequential, separated by a rest interval.
//!
//! States: idle (not running), running-active (advancing the head frame),
//! running-paused (a frame just drained, waiting out the rest interval).

use std::time::{Duration, Instant};

use super::queue::{AnimationQueue, MotionFrame, PoseFrame};
use crate::avatar::RigAccessor;

/// Identifies one tick loop; any bump invalidates loops holding an older value
pub type Generation = u64;

/// Scheduling flags of a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleState {
    /// Rest deadline after a drained frame
    paused_until: Option<Instant>,
    /// A tick loop is scheduled
    running: bool,
    /// Cancellation token for tick loops
    generation: Generation,
}

impl ScheduleState {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether bone work is suspended at `now`
    pub fn is_paused(&self, now: Instant) -> bool {
        self.paused_until.is_some_and(|until| now < until)
    }

    /// Pause deadline, if a rest interval is pending
    pub fn paused_until(&self) -> Option<Instant> {
        self.paused_until
    }

    fn expire_pause(&mut self, now: Instant) {
        if self.paused_until.is_some_and(|until| now >= until) {
            self.paused_until = None;
        }
    }
}

/// What a bone-advancing tick did to the head frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameProgress {
    /// Targets whose bone moved this tick
    pub moved: usize,
    /// Targets removed because their goal was reached
    pub reached: usize,
    /// Targets removed because the rig has no such bone
    pub dropped: usize,
    /// The frame emptied and was popped; a rest interval started
    pub drained: bool,
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The loop's generation is outdated; nothing was touched
    Stale,
    /// Queue empty; the loop must stop
    Halted,
    /// Rest interval pending; no bone work this tick
    Paused,
    /// A text marker was consumed
    Text(String),
    /// The head motion frame was advanced
    Advanced(FrameProgress),
}

impl TickOutcome {
    /// Whether the loop should schedule another tick
    pub fn continues(&self) -> bool {
        !matches!(self, TickOutcome::Stale | TickOutcome::Halted)
    }
}

/// Drives the head of an animation queue toward its targets
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    speed: f32,
    pause: Duration,
    state: ScheduleState,
}

impl FrameScheduler {
    pub fn new(speed: f32, pause: Duration) -> Self {
        Self {
            speed,
            pause,
            state: ScheduleState::default(),
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn pause(&self) -> Duration {
        self.pause
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn set_pause(&mut self, pause: Duration) {
        self.pause = pause;
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    /// Start a fresh tick loop, superseding any loop already in flight.
    ///
    /// The pending rest interval, if any, still applies.
    pub fn start(&mut self) -> Generation {
        self.state.generation += 1;
        self.state.running = true;
        self.state.generation
    }

    /// Stop scheduling: clears both flags and invalidates every loop
    pub fn cancel(&mut self) {
        self.state.generation += 1;
        self.state.running = false;
        self.state.paused_until = None;
    }

    /// Mark the loop holding `generation` as no longer scheduled.
    ///
    /// Ignored for a superseded generation, whose successor still runs.
    pub fn stop(&mut self, generation: Generation) {
        if generation == self.state.generation {
            self.state.running = false;
        }
    }

    /// Advance the queue by one tick.
    ///
    /// Only the loop started with the current generation does any work;
    /// older loops get [`TickOutcome::Stale`].
    pub fn tick(
        &mut self,
        generation: Generation,
        queue: &mut AnimationQueue,
        rig: &mut dyn RigAccessor,
        now: Instant,
    ) -> TickOutcome {
        if generation != self.state.generation {
            return TickOutcome::Stale;
        }

        if queue.is_empty() {
            self.state.running = false;
            return TickOutcome::Halted;
        }

        self.state.expire_pause(now);

        match queue.front_mut() {
            // Drained (or enqueued empty): pop and rest, even while paused
            Some(PoseFrame::Motion(frame)) if frame.is_empty() => {
                queue.pop_front();
                self.begin_pause(now);
                TickOutcome::Advanced(FrameProgress {
                    drained: true,
                    ..Default::default()
                })
            }
            _ if self.state.is_paused(now) => TickOutcome::Paused,
            Some(PoseFrame::Text(text)) => {
                let text = std::mem::take(text);
                queue.pop_front();
                TickOutcome::Text(text)
            }
            Some(PoseFrame::Motion(frame)) => {
                let mut progress = advance_frame(frame, rig, self.speed);
                if frame.is_empty() {
                    queue.pop_front();
                    self.begin_pause(now);
                    progress.drained = true;
                }
                TickOutcome::Advanced(progress)
            }
            None => {
                self.state.running = false;
                TickOutcome::Halted
            }
        }
    }

    fn begin_pause(&mut self, now: Instant) {
        self.state.paused_until = Some(now + self.pause);
    }
}

/// Move every target of `frame` one step, dropping finished and unresolvable ones
fn advance_frame(frame: &mut MotionFrame, rig: &mut dyn RigAccessor, speed: f32) -> FrameProgress {
    let mut progress = FrameProgress::default();

    frame.retain_targets(|target| {
        let Some(bone) = rig.resolve(&target.bone) else {
            tracing::debug!("Dropping target for missing bone: {}", target.bone);
            progress.dropped += 1;
            return false;
        };

        let current = bone.get(target.property, target.axis);
        match target.direction.step(current, target.target, speed) {
            Some(next) => {
                bone.set(target.property, target.axis, next);
                progress.moved += 1;
                if next == target.target {
                    progress.reached += 1;
                    false
                } else {
                    true
                }
            }
            None => {
                progress.reached += 1;
                false
            }
        }
    });

    progress
}
