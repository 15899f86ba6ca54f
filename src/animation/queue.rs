//! Pose frames and the animation queue

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Which transform channel of a bone a target drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoneProperty {
    Rotation,
    Position,
}

impl BoneProperty {
    pub const ALL: [BoneProperty; 2] = [BoneProperty::Rotation, BoneProperty::Position];
}

/// Component of a bone property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// Direction of travel toward a target value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[serde(alias = "+")]
    Increase,
    #[serde(alias = "-")]
    Decrease,
}

impl Direction {
    /// Direction that moves `from` toward `to`
    pub fn toward(from: f32, to: f32) -> Self {
        if to >= from {
            Self::Increase
        } else {
            Self::Decrease
        }
    }

    /// Step `value` by `speed` toward `target`, never passing it.
    ///
    /// Returns `None` when `value` is already at or beyond `target` in this
    /// direction.
    pub fn step(self, value: f32, target: f32, speed: f32) -> Option<f32> {
        match self {
            Self::Increase if value < target => Some((value + speed).min(target)),
            Self::Decrease if value > target => Some((value - speed).max(target)),
            _ => None,
        }
    }
}

/// One scalar goal for one bone axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneTarget {
    pub bone: String,
    pub property: BoneProperty,
    pub axis: Axis,
    pub target: f32,
    pub direction: Direction,
}

impl BoneTarget {
    pub fn new(
        bone: impl Into<String>,
        property: BoneProperty,
        axis: Axis,
        target: f32,
        direction: Direction,
    ) -> Self {
        Self {
            bone: bone.into(),
            property,
            axis,
            target,
            direction,
        }
    }

    /// Rotation target, the common case for gestures
    pub fn rotation(bone: impl Into<String>, axis: Axis, target: f32, direction: Direction) -> Self {
        Self::new(bone, BoneProperty::Rotation, axis, target, direction)
    }

    /// Identity of the channel this target drives
    pub fn channel(&self) -> (&str, BoneProperty, Axis) {
        (self.bone.as_str(), self.property, self.axis)
    }
}

/// A batch of bone targets driven concurrently
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionFrame {
    targets: Vec<BoneTarget>,
}

impl MotionFrame {
    pub fn new(targets: Vec<BoneTarget>) -> Self {
        Self { targets }
    }

    pub fn targets(&self) -> &[BoneTarget] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Keep only the targets for which `f` returns true.
    ///
    /// Survivors keep their relative order; `f` may mutate external state
    /// (the rig) while deciding.
    pub fn retain_targets(&mut self, f: impl FnMut(&BoneTarget) -> bool) {
        self.targets.retain(f);
    }
}

impl From<Vec<BoneTarget>> for MotionFrame {
    fn from(targets: Vec<BoneTarget>) -> Self {
        Self::new(targets)
    }
}

impl FromIterator<BoneTarget> for MotionFrame {
    fn from_iter<I: IntoIterator<Item = BoneTarget>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// An entry of the animation queue
#[derive(Debug, Clone, PartialEq)]
pub enum PoseFrame {
    /// Bones to move together
    Motion(MotionFrame),
    /// Text appended to the displayed output when reached
    Text(String),
}

impl PoseFrame {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PoseFrame::Text(text) => Some(text),
            PoseFrame::Motion(_) => None,
        }
    }

    pub fn as_motion(&self) -> Option<&MotionFrame> {
        match self {
            PoseFrame::Motion(frame) => Some(frame),
            PoseFrame::Text(_) => None,
        }
    }
}

/// FIFO of pending frames and text markers for one session
#[derive(Debug, Clone, Default)]
pub struct AnimationQueue {
    frames: VecDeque<PoseFrame>,
}

impl AnimationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text marker
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.frames.push_back(PoseFrame::Text(text.into()));
    }

    /// Append a motion frame
    pub fn push_motion(&mut self, frame: impl Into<MotionFrame>) {
        self.frames.push_back(PoseFrame::Motion(frame.into()));
    }

    pub fn front(&self) -> Option<&PoseFrame> {
        self.frames.front()
    }

    pub fn front_mut(&mut self) -> Option<&mut PoseFrame> {
        self.frames.front_mut()
    }

    pub fn pop_front(&mut self) -> Option<PoseFrame> {
        self.frames.pop_front()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PoseFrame> {
        self.frames.iter()
    }

    /// Number of motion frames still pending
    pub fn motion_frames(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| matches!(f, PoseFrame::Motion(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_step_clamps() {
        assert_eq!(Direction::Increase.step(0.0, 0.25, 0.1), Some(0.1));
        assert_eq!(Direction::Increase.step(0.2, 0.25, 0.1), Some(0.25));
        assert_eq!(Direction::Increase.step(0.25, 0.25, 0.1), None);
        assert_eq!(Direction::Decrease.step(0.0, -0.15, 0.1), Some(-0.1));
        assert_eq!(Direction::Decrease.step(-0.1, -0.15, 0.1), Some(-0.15));
        assert_eq!(Direction::Decrease.step(0.3, 0.5, 0.1), None);
    }

    #[test]
    fn test_direction_toward() {
        assert_eq!(Direction::toward(0.0, 1.0), Direction::Increase);
        assert_eq!(Direction::toward(1.0, -1.0), Direction::Decrease);
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = AnimationQueue::new();
        queue.push_text("A");
        queue.push_motion(vec![BoneTarget::rotation(
            "mixamorigHead",
            Axis::X,
            0.2,
            Direction::Increase,
        )]);
        queue.push_text(" ");

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.motion_frames(), 1);
        assert_eq!(queue.pop_front().unwrap().as_text(), Some("A"));
        assert!(queue.pop_front().unwrap().as_motion().is_some());
        assert_eq!(queue.pop_front().unwrap().as_text(), Some(" "));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_retain_targets_keeps_order() {
        let mut frame: MotionFrame = ["a", "b", "c"]
            .into_iter()
            .map(|b| BoneTarget::rotation(b, Axis::Z, 1.0, Direction::Increase))
            .collect();

        frame.retain_targets(|t| t.bone != "b");
        let names: Vec<_> = frame.targets().iter().map(|t| t.bone.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_bone_target_deserializes_sign_aliases() {
        let target: BoneTarget = toml::from_str(
            r#"
                bone = "mixamorigRightArm"
                property = "rotation"
                axis = "z"
                target = 1.2
                direction = "+"
            "#,
        )
        .unwrap();
        assert_eq!(target.direction, Direction::Increase);
        assert_eq!(target.axis, Axis::Z);
    }
}
