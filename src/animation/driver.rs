//! Async tick loop
//!
//! Stands in for a display refresh callback: ticks a session at a fixed
//! rate until its queue drains, a newer loop supersedes it, or shutdown.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::time::MissedTickBehavior;

use super::scheduler::{Generation, TickOutcome};
use crate::avatar::SignSession;

/// Tick `session` at `tick_rate_hz` on behalf of `generation`.
///
/// Returns the outcome that ended the loop, or `None` on shutdown.
pub async fn run_tick_loop(
    session: Arc<Mutex<SignSession>>,
    generation: Generation,
    tick_rate_hz: u32,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Option<TickOutcome> {
    let period = Duration::from_secs_f64(1.0 / f64::from(tick_rate_hz.max(1)));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::debug!("Tick loop {} started at {} Hz", generation, tick_rate_hz);

    loop {
        tokio::select! {
            instant = interval.tick() => {
                let outcome = session.lock().await.tick(generation, instant.into_std());
                tracing::trace!("Tick loop {}: {:?}", generation, outcome);
                if !outcome.continues() {
                    tracing::debug!("Tick loop {} finished: {:?}", generation, outcome);
                    return Some(outcome);
                }
            }
            _ = shutdown_rx.recv() => {
                tracing::debug!("Tick loop {} shutting down", generation);
                session.lock().await.stop_running(generation);
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationQueue, Axis, BoneTarget, Direction};
    use crate::avatar::Skeleton;
    use crate::gesture::{GestureDictionary, GestureLibrary, RestPose};
    use crate::output::{Camera, NullRenderer};
    use crate::translate::Translation;

    fn session() -> Arc<Mutex<SignSession>> {
        let mut words = GestureDictionary::new();
        words.insert("UP", |queue: &mut AnimationQueue| {
            queue.push_motion(vec![BoneTarget::rotation("arm", Axis::Z, 1.0, Direction::Increase)]);
        });
        let library = GestureLibrary::new(words, GestureDictionary::new(), RestPose::default());

        Arc::new(Mutex::new(SignSession::new(
            Arc::new(library),
            Skeleton::from_bone_names("test", ["arm"]),
            Box::new(NullRenderer),
            Camera::default(),
            0.5,
            Duration::ZERO,
        )))
    }

    fn up() -> Translation {
        Translation {
            isl: "UP".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_loop_runs_until_queue_drains() {
        let session = session();
        let generation = session.lock().await.sign_translation(&up());
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            run_tick_loop(Arc::clone(&session), generation, 240, shutdown_rx),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Some(TickOutcome::Halted));
        let session = session.lock().await;
        assert_eq!(session.rig().get("arm").unwrap().rotation.z, 1.0);
        assert_eq!(session.displayed(), "UP ");
    }

    #[tokio::test]
    async fn test_superseded_loop_exits_stale() {
        let session = session();
        let old = session.lock().await.sign_translation(&up());
        session.lock().await.sign_translation(&up());
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let outcome = run_tick_loop(Arc::clone(&session), old, 240, shutdown_rx).await;
        assert_eq!(outcome, Some(TickOutcome::Stale));
        assert_eq!(session.lock().await.queue().len(), 2);
    }

    #[tokio::test]
    async fn test_shutdown_stops_loop() {
        let session = session();
        let generation = session.lock().await.sign_translation(&up());
        // one tick per second keeps the loop alive until shutdown
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(run_tick_loop(Arc::clone(&session), generation, 1, shutdown_rx));
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(()).unwrap();

        let outcome = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome, None);
        assert!(!session.lock().await.schedule().is_running());
    }
}
