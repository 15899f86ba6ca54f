//! Signing session
//!
//! Bundles everything one avatar needs to sign a phrase: the animation
//! queue, its scheduler, the loaded rig, the text shown so far and the
//! renderer that draws each tick.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::rig::Skeleton;
use crate::animation::{AnimationQueue, FrameScheduler, Generation, ScheduleState, TickOutcome};
use crate::config::Config;
use crate::gesture::{compile_translation, GestureLibrary};
use crate::output::{Camera, Renderer};
use crate::translate::{Translation, Translator};

pub struct SignSession {
    queue: AnimationQueue,
    scheduler: FrameScheduler,
    rig: Skeleton,
    displayed: String,
    renderer: Box<dyn Renderer>,
    camera: Camera,
    library: Arc<GestureLibrary>,
}

impl SignSession {
    pub fn new(
        library: Arc<GestureLibrary>,
        rig: Skeleton,
        renderer: Box<dyn Renderer>,
        camera: Camera,
        speed: f32,
        pause: Duration,
    ) -> Self {
        Self {
            queue: AnimationQueue::new(),
            scheduler: FrameScheduler::new(speed, pause),
            rig,
            displayed: String::new(),
            renderer,
            camera,
            library,
        }
    }

    /// Session using the configured timing and camera
    pub fn from_config(
        config: &Config,
        library: Arc<GestureLibrary>,
        rig: Skeleton,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        Self::new(
            library,
            rig,
            renderer,
            Camera::from(&config.render),
            config.animation.speed,
            Duration::from_millis(config.animation.pause_ms),
        )
    }

    /// Translate `text` and start signing it.
    ///
    /// Blank input changes nothing and returns `None`. Otherwise returns the
    /// generation the caller's tick loop must carry.
    pub fn sign(&mut self, text: &str, translator: &dyn Translator) -> Option<Generation> {
        if text.trim().is_empty() {
            return None;
        }
        let translation = translator.translate(text);
        Some(self.sign_translation(&translation))
    }

    /// Replace whatever is queued with `translation` and start a new loop.
    ///
    /// A rig left off rest by an interrupted gesture is eased back first, so
    /// the new gestures start from the pose they were built for.
    pub fn sign_translation(&mut self, translation: &Translation) -> Generation {
        self.queue.clear();
        self.set_displayed(String::new());
        self.settle();

        let summary = compile_translation(translation, &self.library, &mut self.queue);
        tracing::debug!(
            "Signing {:?}: {} words, {} letters, {} skipped, {} frames",
            translation.original,
            summary.words,
            summary.letters,
            summary.skipped,
            self.queue.motion_frames()
        );

        self.scheduler.start()
    }

    /// Run one scheduler tick and render the result
    pub fn tick(&mut self, generation: Generation, now: Instant) -> TickOutcome {
        let outcome = self
            .scheduler
            .tick(generation, &mut self.queue, &mut self.rig, now);

        match &outcome {
            TickOutcome::Stale | TickOutcome::Halted => return outcome,
            TickOutcome::Text(text) => {
                let mut displayed = std::mem::take(&mut self.displayed);
                displayed.push_str(text);
                self.set_displayed(displayed);
            }
            TickOutcome::Paused | TickOutcome::Advanced(_) => {}
        }

        self.renderer.render(&self.rig, &self.camera);
        outcome
    }

    /// Empty the queue and stop every loop. Idempotent.
    pub fn reset(&mut self) {
        self.scheduler.cancel();
        self.queue.clear();
        if !self.displayed.is_empty() {
            self.set_displayed(String::new());
        }
    }

    /// Drop pending work and ease the rig into the rest pose
    pub fn return_to_rest(&mut self) -> Generation {
        self.reset();
        self.settle();
        self.scheduler.start()
    }

    /// Record that the loop for `generation` exited without halting
    pub fn stop_running(&mut self, generation: Generation) {
        self.scheduler.stop(generation);
    }

    /// Load a new rig and ease it into the rest pose
    pub fn swap_avatar(&mut self, rig: Skeleton) -> Generation {
        tracing::info!("Avatar swapped to {} ({} bones)", rig.name(), rig.len());
        self.rig = rig;
        self.return_to_rest()
    }

    /// Update speed and rest interval; applies from the next tick
    pub fn set_timing(&mut self, speed: f32, pause: Duration) {
        self.scheduler.set_speed(speed);
        self.scheduler.set_pause(pause);
    }

    pub fn schedule(&self) -> &ScheduleState {
        self.scheduler.state()
    }

    pub fn speed(&self) -> f32 {
        self.scheduler.speed()
    }

    pub fn pause(&self) -> Duration {
        self.scheduler.pause()
    }

    pub fn queue(&self) -> &AnimationQueue {
        &self.queue
    }

    pub fn rig(&self) -> &Skeleton {
        &self.rig
    }

    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn library(&self) -> &GestureLibrary {
        &self.library
    }

    fn settle(&mut self) {
        if let Some(frame) = self.library.rest_pose().release_from(&self.rig) {
            self.queue.push_motion(frame);
        }
    }

    fn set_displayed(&mut self, text: String) {
        self.displayed = text;
        self.renderer.caption(&self.displayed);
    }
}

impl fmt::Debug for SignSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignSession")
            .field("avatar", &self.rig.name())
            .field("queued", &self.queue.len())
            .field("schedule", self.scheduler.state())
            .field("displayed", &self.displayed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Axis, BoneProperty, BoneTarget, Direction};
    use crate::avatar::{AvatarAsset, Bone};
    use crate::gesture::{GestureDictionary, Goal, RestPose};
    use glam::Vec3;
    use std::sync::Mutex;

    /// Counts render calls and records captions
    #[derive(Clone, Default)]
    struct Recording {
        renders: Arc<Mutex<usize>>,
        captions: Arc<Mutex<Vec<String>>>,
    }

    impl Renderer for Recording {
        fn render(&mut self, _scene: &Skeleton, _camera: &Camera) {
            *self.renders.lock().unwrap() += 1;
        }

        fn caption(&mut self, text: &str) {
            self.captions.lock().unwrap().push(text.to_string());
        }
    }

    struct Fixed(Translation);

    impl Translator for Fixed {
        fn translate(&self, _text: &str) -> Translation {
            self.0.clone()
        }
    }

    /// A translator whose backend is always unreachable
    struct Unreachable;

    impl Translator for Unreachable {
        fn translate(&self, text: &str) -> Translation {
            Translation::passthrough(text)
        }
    }

    fn library() -> Arc<GestureLibrary> {
        let mut words = GestureDictionary::new();
        words.insert("UP", |queue: &mut AnimationQueue| {
            queue.push_motion(vec![BoneTarget::rotation("arm", Axis::Z, 0.3, Direction::Increase)]);
        });

        let mut alphabet = GestureDictionary::new();
        alphabet.insert("o", |queue: &mut AnimationQueue| {
            queue.push_motion(vec![BoneTarget::rotation("hand", Axis::X, 0.1, Direction::Increase)]);
        });

        Arc::new(GestureLibrary::new(
            words,
            alphabet,
            RestPose::new([Goal::rotation("arm", Axis::Z, -0.2)]),
        ))
    }

    /// Two-bone rig standing at the library's rest pose
    fn rest_rig() -> Skeleton {
        let mut rig = Skeleton::from_bone_names("test", ["arm", "hand"]);
        rig.insert("arm", Bone::new(Vec3::new(0.0, 0.0, -0.2), Vec3::ZERO));
        rig
    }

    fn session(renderer: Recording) -> SignSession {
        SignSession::new(
            library(),
            rest_rig(),
            Box::new(renderer),
            Camera::default(),
            0.1,
            Duration::from_millis(100),
        )
    }

    fn translation(isl: &str, unknown: &[&str]) -> Translation {
        Translation {
            original: "input".to_string(),
            english: "input".to_string(),
            isl: isl.to_string(),
            unknown: unknown.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Tick with `step` between ticks until the loop stops
    fn run(session: &mut SignSession, generation: Generation, step: Duration) -> Vec<TickOutcome> {
        let mut now = Instant::now();
        let mut outcomes = Vec::new();
        for _ in 0..1000 {
            let outcome = session.tick(generation, now);
            let done = !outcome.continues();
            outcomes.push(outcome);
            if done {
                break;
            }
            now += step;
        }
        outcomes
    }

    #[test]
    fn test_blank_input_is_noop() {
        let mut session = session(Recording::default());
        let fixed = Fixed(translation("UP", &[]));

        assert_eq!(session.sign("   ", &fixed), None);
        assert!(session.queue().is_empty());
        assert!(!session.schedule().is_running());
    }

    #[test]
    fn test_unreachable_translator_yields_empty_queue() {
        let mut session = session(Recording::default());
        let generation = session.sign("anything at all", &Unreachable).unwrap();

        assert_eq!(session.queue().len(), 0);
        assert_eq!(session.tick(generation, Instant::now()), TickOutcome::Halted);
        assert!(!session.schedule().is_running());
    }

    #[test]
    fn test_signs_phrase_to_completion() {
        let recording = Recording::default();
        let mut session = session(recording.clone());
        let generation = session
            .sign("up o", &Fixed(translation("UP", &["o"])))
            .unwrap();

        let outcomes = run(&mut session, generation, Duration::from_millis(50));

        assert_eq!(outcomes.last(), Some(&TickOutcome::Halted));
        assert_eq!(session.displayed(), "UP o ");
        assert!((session.rig().get("arm").unwrap().rotation.z - 0.3).abs() < 1e-6);
        assert!((session.rig().get("hand").unwrap().rotation.x - 0.1).abs() < 1e-6);

        // every tick but the halting one renders
        assert_eq!(*recording.renders.lock().unwrap(), outcomes.len() - 1);
        assert_eq!(
            recording.captions.lock().unwrap().last().map(String::as_str),
            Some("UP o ")
        );
    }

    #[test]
    fn test_new_phrase_supersedes_running_loop() {
        let mut session = session(Recording::default());
        let fixed = Fixed(translation("UP", &[]));

        let first = session.sign("up", &fixed).unwrap();
        session.tick(first, Instant::now());
        let second = session.sign("up", &fixed).unwrap();

        assert_ne!(first, second);
        assert_eq!(session.tick(first, Instant::now()), TickOutcome::Stale);
        assert_eq!(session.displayed(), "");
        assert_eq!(session.queue().len(), 2);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut session = session(Recording::default());
        let generation = session
            .sign("up", &Fixed(translation("UP", &[])))
            .unwrap();
        session.tick(generation, Instant::now());

        let snapshot = |session: &SignSession| {
            (
                session.queue().len(),
                session.schedule().is_running(),
                session.schedule().paused_until(),
                session.displayed().to_string(),
            )
        };

        session.reset();
        let once = snapshot(&session);
        session.reset();
        let twice = snapshot(&session);

        assert_eq!(once, twice);
        assert_eq!(once, (0, false, None, String::new()));
        assert_eq!(session.tick(generation, Instant::now()), TickOutcome::Stale);
    }

    #[test]
    fn test_swap_avatar_eases_into_rest_pose() {
        let mut session = session(Recording::default());
        let old = session
            .sign("up", &Fixed(translation("UP", &[])))
            .unwrap();

        let generation = session.swap_avatar(Skeleton::from_bone_names("other", ["arm"]));
        assert_eq!(session.tick(old, Instant::now()), TickOutcome::Stale);
        assert_eq!(session.queue().motion_frames(), 1);

        let outcomes = run(&mut session, generation, Duration::from_millis(50));
        assert_eq!(outcomes.last(), Some(&TickOutcome::Halted));
        assert_eq!(session.rig().name(), "other");
        assert_eq!(session.rig().get("arm").unwrap().rotation.z, -0.2);
    }

    #[test]
    fn test_swap_to_rig_at_rest_queues_nothing() {
        let mut session = session(Recording::default());
        // the mixamo rig has no "arm" bone and starts at zero
        let generation = session.swap_avatar(AvatarAsset::Xbot.skeleton());

        assert!(session.queue().is_empty());
        assert_eq!(session.tick(generation, Instant::now()), TickOutcome::Halted);
        assert_eq!(session.rig().name(), "xbot");
    }

    #[test]
    fn test_interrupted_phrase_ends_at_rest() {
        let library = Arc::new(GestureLibrary::builtin());
        let mut session = SignSession::new(
            Arc::clone(&library),
            AvatarAsset::Ybot.skeleton(),
            Box::new(Recording::default()),
            Camera::default(),
            0.1,
            Duration::from_millis(100),
        );
        let step = Duration::from_millis(50);

        let generation = session.return_to_rest();
        run(&mut session, generation, step);
        assert!(library.rest_pose().release_from(session.rig()).is_none());

        // cut HOME off mid-gesture
        let generation = session.sign("home", &Fixed(translation("HOME", &[]))).unwrap();
        let mut now = Instant::now();
        for _ in 0..8 {
            session.tick(generation, now);
            now += step;
        }
        assert!(library.rest_pose().release_from(session.rig()).is_some());

        let generation = session.sign("yes", &Fixed(translation("YES", &[]))).unwrap();
        let outcomes = run(&mut session, generation, step);

        assert_eq!(outcomes.last(), Some(&TickOutcome::Halted));
        assert_eq!(session.displayed(), "YES ");
        assert!(library.rest_pose().release_from(session.rig()).is_none());
    }

    #[test]
    fn test_stop_running_only_for_current_generation() {
        let mut session = session(Recording::default());
        let fixed = Fixed(translation("UP", &[]));
        let old = session.sign("up", &fixed).unwrap();
        let current = session.sign("up", &fixed).unwrap();

        session.stop_running(old);
        assert!(session.schedule().is_running());
        session.stop_running(current);
        assert!(!session.schedule().is_running());
    }

    #[test]
    fn test_set_timing_applies_to_next_tick() {
        let mut session = session(Recording::default());
        let generation = session
            .sign("up", &Fixed(translation("UP", &[])))
            .unwrap();
        session.set_timing(1.0, Duration::ZERO);

        let now = Instant::now();
        assert!(matches!(session.tick(generation, now), TickOutcome::Text(_)));
        match session.tick(generation, now) {
            TickOutcome::Advanced(progress) => assert!(progress.drained),
            other => panic!("unexpected outcome: {:?}", other),
        }
        let arm = session.rig().get("arm").unwrap();
        assert_eq!(arm.get(BoneProperty::Rotation, Axis::Z), 0.3);
    }
}
