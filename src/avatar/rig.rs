//! Rig accessor and the in-memory skeleton the scheduler drives

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::animation::{Axis, BoneProperty};
use crate::error::{RigError, SignAvatarError};

/// Local transform channels of a single bone.
///
/// Rotation is stored as XYZ Euler angles in radians, matching the way
/// gestures address individual axes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bone {
    pub rotation: Vec3,
    pub position: Vec3,
}

impl Bone {
    pub fn new(rotation: Vec3, position: Vec3) -> Self {
        Self { rotation, position }
    }

    /// Read one scalar channel
    pub fn get(&self, property: BoneProperty, axis: Axis) -> f32 {
        let v = self.channel(property);
        match axis {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// Write one scalar channel
    pub fn set(&mut self, property: BoneProperty, axis: Axis, value: f32) {
        let v = match property {
            BoneProperty::Rotation => &mut self.rotation,
            BoneProperty::Position => &mut self.position,
        };
        match axis {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
            Axis::Z => v.z = value,
        }
    }

    fn channel(&self, property: BoneProperty) -> Vec3 {
        match property {
            BoneProperty::Rotation => self.rotation,
            BoneProperty::Position => self.position,
        }
    }
}

/// Name-based lookup into whatever skeleton is currently loaded.
///
/// Implementations must not cache bones across avatar swaps; a name that
/// resolved on the previous rig may be absent on the next one.
pub trait RigAccessor {
    /// Resolve a bone for mutation, `None` if the rig has no such bone
    fn resolve(&mut self, name: &str) -> Option<&mut Bone>;
}

/// Named-bone skeleton of the loaded avatar
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    name: String,
    bones: HashMap<String, Bone>,
    /// Insertion order, kept for stable snapshots
    order: Vec<String>,
}

impl Skeleton {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a skeleton whose bones all start at the origin
    pub fn from_bone_names<I, S>(name: &str, bones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut skeleton = Self::new(name);
        for bone in bones {
            skeleton.insert(bone, Bone::default());
        }
        skeleton
    }

    /// Load a skeleton from a TOML rig file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SignAvatarError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_toml_str(&contents)
    }

    /// Parse a skeleton from TOML.
    ///
    /// ```toml
    /// name = "custom"
    /// [[bones]]
    /// name = "mixamorigHips"
    /// position = [0.0, 1.0, 0.0]
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, SignAvatarError> {
        let file: RigFile = toml::from_str(s).map_err(|e| RigError::Parse(e.to_string()))?;

        if file.bones.is_empty() {
            return Err(RigError::Empty.into());
        }

        let mut skeleton = Self::new(file.name);
        for bone in file.bones {
            if skeleton.contains(&bone.name) {
                return Err(RigError::DuplicateBone(bone.name).into());
            }
            skeleton.insert(
                bone.name,
                Bone::new(Vec3::from_array(bone.rotation), Vec3::from_array(bone.position)),
            );
        }

        Ok(skeleton)
    }

    /// Add or replace a bone
    pub fn insert(&mut self, name: impl Into<String>, bone: Bone) {
        let name = name.into();
        if self.bones.insert(name.clone(), bone).is_none() {
            self.order.push(name);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&Bone> {
        self.bones.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bones.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Bones in the order they were added
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bone)> {
        self.order
            .iter()
            .filter_map(|name| self.bones.get(name).map(|bone| (name.as_str(), bone)))
    }
}

impl RigAccessor for Skeleton {
    fn resolve(&mut self, name: &str) -> Option<&mut Bone> {
        self.bones.get_mut(name)
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct RigFile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    bones: Vec<RigBone>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RigBone {
    name: String,
    #[serde(default)]
    rotation: [f32; 3],
    #[serde(default)]
    position: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bone_channels() {
        let mut bone = Bone::default();
        bone.set(BoneProperty::Rotation, Axis::Z, 1.5);
        bone.set(BoneProperty::Position, Axis::Y, -0.25);

        assert_eq!(bone.get(BoneProperty::Rotation, Axis::Z), 1.5);
        assert_eq!(bone.get(BoneProperty::Position, Axis::Y), -0.25);
        assert_eq!(bone.get(BoneProperty::Rotation, Axis::X), 0.0);
        assert_eq!(bone.rotation, Vec3::new(0.0, 0.0, 1.5));
    }

    #[test]
    fn test_resolve_missing_bone() {
        let mut skeleton = Skeleton::from_bone_names("test", ["mixamorigHead"]);
        assert!(skeleton.resolve("mixamorigHead").is_some());
        assert!(skeleton.resolve("mixamorigTail").is_none());
    }

    #[test]
    fn test_iter_preserves_insertion_order() {
        let skeleton = Skeleton::from_bone_names("test", ["c", "a", "b"]);
        let names: Vec<_> = skeleton.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_parse_rig_file() {
        let toml = r#"
            name = "custom"

            [[bones]]
            name = "mixamorigHips"
            position = [0.0, 1.0, 0.0]

            [[bones]]
            name = "mixamorigSpine"
            rotation = [0.1, 0.0, 0.0]
        "#;

        let skeleton = Skeleton::from_toml_str(toml).unwrap();
        assert_eq!(skeleton.name(), "custom");
        assert_eq!(skeleton.len(), 2);
        assert_eq!(skeleton.get("mixamorigHips").unwrap().position.y, 1.0);
        assert_eq!(skeleton.get("mixamorigSpine").unwrap().rotation.x, 0.1);
    }

    #[test]
    fn test_rig_file_rejects_duplicates_and_empty() {
        let dup = r#"
            [[bones]]
            name = "a"
            [[bones]]
            name = "a"
        "#;
        assert!(matches!(
            Skeleton::from_toml_str(dup),
            Err(SignAvatarError::Rig(RigError::DuplicateBone(_)))
        ));
        assert!(matches!(
            Skeleton::from_toml_str("name = \"x\""),
            Err(SignAvatarError::Rig(RigError::Empty))
        ));
    }
}
