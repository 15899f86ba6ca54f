//! Gesture procedures and the rest pose they return to

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::animation::{AnimationQueue, Axis, BoneProperty, BoneTarget, Direction, MotionFrame};
use crate::avatar::Skeleton;

type Channel = (String, BoneProperty, Axis);

/// Appends the frames implementing one token's gesture.
///
/// After the appended frames have run, the rig must be back at the rest
/// pose so the next gesture starts from a known state.
pub trait GestureProcedure: Send + Sync {
    fn apply(&self, queue: &mut AnimationQueue);
}

impl<F> GestureProcedure for F
where
    F: Fn(&mut AnimationQueue) + Send + Sync,
{
    fn apply(&self, queue: &mut AnimationQueue) {
        self(queue)
    }
}

/// A bone goal whose direction may be left for the builder to infer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub bone: String,
    #[serde(default = "default_property")]
    pub property: BoneProperty,
    pub axis: Axis,
    pub target: f32,
    #[serde(default)]
    pub direction: Option<Direction>,
}

fn default_property() -> BoneProperty {
    BoneProperty::Rotation
}

impl Goal {
    pub fn rotation(bone: impl Into<String>, axis: Axis, target: f32) -> Self {
        Self {
            bone: bone.into(),
            property: BoneProperty::Rotation,
            axis,
            target,
            direction: None,
        }
    }

    pub fn position(bone: impl Into<String>, axis: Axis, target: f32) -> Self {
        Self {
            property: BoneProperty::Position,
            ..Self::rotation(bone, axis, target)
        }
    }

    fn channel(&self) -> Channel {
        (self.bone.clone(), self.property, self.axis)
    }
}

/// Neutral pose every gesture starts from and returns to.
///
/// Channels not listed rest at zero.
#[derive(Debug, Clone, Default)]
pub struct RestPose {
    values: HashMap<Channel, f32>,
}

impl RestPose {
    /// Rest pose from per-channel goals; goal directions are ignored
    pub fn new(goals: impl IntoIterator<Item = Goal>) -> Self {
        let mut pose = Self::default();
        for goal in goals {
            pose.values.insert(goal.channel(), goal.target);
        }
        pose
    }

    /// Rest value of one channel
    pub fn value(&self, bone: &str, property: BoneProperty, axis: Axis) -> f32 {
        self.values
            .get(&(bone.to_string(), property, axis))
            .copied()
            .unwrap_or(0.0)
    }

    /// Frame easing every off-rest channel of `rig` back to rest.
    ///
    /// Directions are taken from where each bone stands now, so the frame
    /// is valid from any pose, mid-gesture included. `None` when the rig is
    /// already at rest.
    pub fn release_from(&self, rig: &Skeleton) -> Option<MotionFrame> {
        let mut targets = Vec::new();

        for (name, bone) in rig.iter() {
            for property in BoneProperty::ALL {
                for axis in Axis::ALL {
                    let at = bone.get(property, axis);
                    let rest = self.value(name, property, axis);
                    if at != rest {
                        targets.push(BoneTarget::new(
                            name,
                            property,
                            axis,
                            rest,
                            Direction::toward(at, rest),
                        ));
                    }
                }
            }
        }

        (!targets.is_empty()).then(|| MotionFrame::new(targets))
    }
}

/// Data-driven gesture: a fixed list of motion frames ending at rest
#[derive(Debug, Clone)]
pub struct Gesture {
    name: String,
    frames: Vec<MotionFrame>,
}

impl Gesture {
    pub fn builder<'r>(name: impl Into<String>, rest: &'r RestPose) -> GestureBuilder<'r> {
        GestureBuilder {
            name: name.into(),
            rest,
            current: HashMap::new(),
            touched: Vec::new(),
            frames: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All frames, the trailing release frame included
    pub fn frames(&self) -> &[MotionFrame] {
        &self.frames
    }
}

impl GestureProcedure for Gesture {
    fn apply(&self, queue: &mut AnimationQueue) {
        for frame in &self.frames {
            queue.push_motion(frame.clone());
        }
    }
}

/// Builds a [`Gesture`], tracking each channel's value as frames accumulate.
///
/// Goals without an explicit direction travel from the channel's previous
/// goal (or its rest value). `build` appends a release frame returning every
/// touched channel to rest.
pub struct GestureBuilder<'r> {
    name: String,
    rest: &'r RestPose,
    current: HashMap<Channel, f32>,
    touched: Vec<Channel>,
    frames: Vec<MotionFrame>,
}

impl GestureBuilder<'_> {
    pub fn frame(mut self, goals: impl IntoIterator<Item = Goal>) -> Self {
        let mut targets = Vec::new();

        for goal in goals {
            let channel = goal.channel();
            let from = match self.current.get(&channel) {
                Some(value) => *value,
                None => {
                    self.touched.push(channel.clone());
                    self.rest.value(&goal.bone, goal.property, goal.axis)
                }
            };
            let direction = goal
                .direction
                .unwrap_or_else(|| Direction::toward(from, goal.target));

            self.current.insert(channel, goal.target);
            targets.push(BoneTarget::new(
                goal.bone,
                goal.property,
                goal.axis,
                goal.target,
                direction,
            ));
        }

        self.frames.push(MotionFrame::new(targets));
        self
    }

    pub fn build(mut self) -> Gesture {
        let release: Vec<BoneTarget> = self
            .touched
            .iter()
            .filter_map(|channel| {
                let (bone, property, axis) = channel;
                let at = self.current.get(channel).copied()?;
                let rest = self.rest.value(bone, *property, *axis);
                (at != rest).then(|| {
                    BoneTarget::new(bone.clone(), *property, *axis, rest, Direction::toward(at, rest))
                })
            })
            .collect();

        if !release.is_empty() {
            self.frames.push(MotionFrame::new(release));
        }

        Gesture {
            name: self.name,
            frames: self.frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::FrameScheduler;
    use crate::avatar::Bone;
    use glam::Vec3;
    use std::time::{Duration, Instant};

    fn rest() -> RestPose {
        RestPose::new([Goal::rotation("arm", Axis::Z, 1.0)])
    }

    #[test]
    fn test_rest_pose_values() {
        let rest = rest();
        assert_eq!(rest.value("arm", BoneProperty::Rotation, Axis::Z), 1.0);
        assert_eq!(rest.value("arm", BoneProperty::Rotation, Axis::X), 0.0);
    }

    #[test]
    fn test_release_from_uses_current_values() {
        let rest = rest();
        let mut rig = Skeleton::from_bone_names("test", ["arm", "hand"]);
        // arm above its rest value, hand off rest on position
        rig.insert("arm", Bone::new(Vec3::new(0.0, 0.0, 1.5), Vec3::ZERO));
        rig.insert("hand", Bone::new(Vec3::ZERO, Vec3::new(0.0, -0.3, 0.0)));

        let frame = rest.release_from(&rig).unwrap();
        let targets = frame.targets();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].channel(), ("arm", BoneProperty::Rotation, Axis::Z));
        assert_eq!(targets[0].target, 1.0);
        assert_eq!(targets[0].direction, Direction::Decrease);
        assert_eq!(targets[1].channel(), ("hand", BoneProperty::Position, Axis::Y));
        assert_eq!(targets[1].target, 0.0);
        assert_eq!(targets[1].direction, Direction::Increase);
    }

    #[test]
    fn test_release_from_rig_at_rest_is_none() {
        let rest = rest();
        let mut rig = Skeleton::from_bone_names("test", ["hand"]);
        assert!(rest.release_from(&rig).is_none());

        rig.insert("arm", Bone::new(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO));
        assert!(rest.release_from(&rig).is_none());
    }

    #[test]
    fn test_position_goal_runs_and_releases() {
        let rest = rest();
        let gesture = Gesture::builder("LIFT", &rest)
            .frame([Goal::position("hips", Axis::Y, 0.5)])
            .build();

        let frames = gesture.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].targets()[0].property, BoneProperty::Position);
        assert_eq!(frames[0].targets()[0].direction, Direction::Increase);

        let mut rig = Skeleton::from_bone_names("test", ["hips"]);
        let mut queue = AnimationQueue::new();
        gesture.apply(&mut queue);

        let mut scheduler = FrameScheduler::new(0.25, Duration::ZERO);
        let generation = scheduler.start();
        let now = Instant::now();
        let mut peak = 0.0f32;
        while scheduler.tick(generation, &mut queue, &mut rig, now).continues() {
            peak = peak.max(rig.get("hips").unwrap().position.y);
        }

        assert_eq!(peak, 0.5);
        assert_eq!(rig.get("hips").unwrap().position.y, 0.0);
    }

    #[test]
    fn test_builder_infers_directions_from_previous_goal() {
        let rest = rest();
        let gesture = Gesture::builder("WAVE", &rest)
            .frame([Goal::rotation("arm", Axis::Z, 0.2)])
            .frame([Goal::rotation("arm", Axis::Z, 0.6)])
            .build();

        let frames = gesture.frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].targets()[0].direction, Direction::Decrease);
        assert_eq!(frames[1].targets()[0].direction, Direction::Increase);
    }

    #[test]
    fn test_release_frame_returns_to_rest() {
        let rest = rest();
        let gesture = Gesture::builder("POINT", &rest)
            .frame([
                Goal::rotation("arm", Axis::Z, 0.5),
                Goal::rotation("hand", Axis::X, -0.4),
            ])
            .build();

        let release = gesture.frames().last().unwrap().targets();
        assert_eq!(release.len(), 2);
        assert_eq!(release[0].bone, "arm");
        assert_eq!(release[0].target, 1.0);
        assert_eq!(release[0].direction, Direction::Increase);
        assert_eq!(release[1].bone, "hand");
        assert_eq!(release[1].target, 0.0);
        assert_eq!(release[1].direction, Direction::Increase);
    }

    #[test]
    fn test_no_release_when_gesture_ends_at_rest() {
        let rest = rest();
        let gesture = Gesture::builder("NOD", &rest)
            .frame([Goal::rotation("arm", Axis::Z, 0.5)])
            .frame([Goal::rotation("arm", Axis::Z, 1.0)])
            .build();
        assert_eq!(gesture.frames().len(), 2);
    }

    #[test]
    fn test_apply_appends_frames_in_order() {
        let rest = rest();
        let gesture = Gesture::builder("X", &rest)
            .frame([Goal::rotation("arm", Axis::Z, 0.5)])
            .build();

        let mut queue = AnimationQueue::new();
        queue.push_text("X");
        gesture.apply(&mut queue);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.motion_frames(), 2);
    }

    #[test]
    fn test_closure_is_a_procedure() {
        let procedure = |queue: &mut AnimationQueue| queue.push_text("!");
        let mut queue = AnimationQueue::new();
        procedure.apply(&mut queue);
        assert_eq!(queue.front().unwrap().as_text(), Some("!"));
    }
}
