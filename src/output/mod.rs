//! Output module
//!
//! The rendering boundary: the scheduler hands the posed skeleton and camera
//! to a [`Renderer`] once per tick. Drawing happens elsewhere; the bundled
//! renderer publishes scene snapshots to SSE subscribers.

pub mod scene;
pub mod sse;

use serde::Serialize;

use crate::avatar::Skeleton;
use crate::config::RenderConfig;

pub use scene::{BroadcastRenderer, BonePose, SceneEvent};

/// Fixed perspective camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub position: [f32; 3],
    pub fov_deg: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for Camera {
    fn from(config: &RenderConfig) -> Self {
        Self {
            position: config.camera_position,
            fov_deg: config.fov_deg,
        }
    }
}

/// Sink for the posed scene
pub trait Renderer: Send {
    /// Draw the current pose. Called once per scheduler tick.
    fn render(&mut self, scene: &Skeleton, camera: &Camera);

    /// The displayed text changed
    fn caption(&mut self, _text: &str) {}
}

/// Renderer that discards everything
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _scene: &Skeleton, _camera: &Camera) {}
}
