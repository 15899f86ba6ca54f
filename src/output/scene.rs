//! Scene snapshots published to subscribers

use serde::Serialize;
use tokio::sync::broadcast;

use super::{Camera, Renderer};
use crate::avatar::Skeleton;

/// One bone's local transform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonePose {
    pub name: String,
    pub rotation: [f32; 3],
    pub position: [f32; 3],
}

/// Event sent to scene subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneEvent {
    /// Full pose after a tick
    Pose {
        avatar: String,
        bones: Vec<BonePose>,
        camera: Camera,
    },
    /// Displayed text after a text marker
    Text { text: String },
}

impl SceneEvent {
    pub fn pose(scene: &Skeleton, camera: &Camera) -> Self {
        let bones = scene
            .iter()
            .map(|(name, bone)| BonePose {
                name: name.to_string(),
                rotation: bone.rotation.to_array(),
                position: bone.position.to_array(),
            })
            .collect();

        SceneEvent::Pose {
            avatar: scene.name().to_string(),
            bones,
            camera: *camera,
        }
    }

    /// SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            SceneEvent::Pose { .. } => "pose",
            SceneEvent::Text { .. } => "text",
        }
    }
}

/// Renderer that broadcasts each frame as a [`SceneEvent`]
#[derive(Debug, Clone)]
pub struct BroadcastRenderer {
    tx: broadcast::Sender<SceneEvent>,
}

impl BroadcastRenderer {
    pub fn new(tx: broadcast::Sender<SceneEvent>) -> Self {
        Self { tx }
    }
}

impl Renderer for BroadcastRenderer {
    fn render(&mut self, scene: &Skeleton, camera: &Camera) {
        // No subscribers is fine
        if self.tx.receiver_count() > 0 {
            let _ = self.tx.send(SceneEvent::pose(scene, camera));
        }
    }

    fn caption(&mut self, text: &str) {
        let _ = self.tx.send(SceneEvent::Text {
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Axis, BoneProperty};
    use crate::avatar::RigAccessor;

    fn skeleton() -> Skeleton {
        let mut skeleton = Skeleton::from_bone_names("test", ["hips", "neck"]);
        skeleton
            .resolve("neck")
            .unwrap()
            .set(BoneProperty::Rotation, Axis::X, 0.25);
        skeleton
    }

    #[test]
    fn test_pose_snapshot_keeps_bone_order() {
        let event = SceneEvent::pose(&skeleton(), &Camera::default());
        match event {
            SceneEvent::Pose { avatar, bones, .. } => {
                assert_eq!(avatar, "test");
                assert_eq!(bones.len(), 2);
                assert_eq!(bones[0].name, "hips");
                assert_eq!(bones[1].rotation, [0.25, 0.0, 0.0]);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_broadcast_renderer_publishes() {
        let (tx, mut rx) = broadcast::channel(8);
        let mut renderer = BroadcastRenderer::new(tx);

        renderer.render(&skeleton(), &Camera::default());
        renderer.caption("HELLO ");

        assert_eq!(rx.try_recv().unwrap().kind(), "pose");
        assert_eq!(
            rx.try_recv().unwrap(),
            SceneEvent::Text {
                text: "HELLO ".to_string()
            }
        );
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(SceneEvent::Text {
            text: "A".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "A");
    }
}
