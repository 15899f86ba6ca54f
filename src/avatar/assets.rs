//! Avatar assets and their skeletons

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::rig::Skeleton;
use crate::config::AvatarConfig;
use crate::error::{ConfigError, SignAvatarError};

/// Prefix shared by every bone of the bundled Mixamo rigs
pub const BONE_PREFIX: &str = "mixamorig";

const SPINE: [&str; 7] = ["Hips", "Spine", "Spine1", "Spine2", "Neck", "Head", "HeadTop_End"];
const ARM: [&str; 4] = ["Shoulder", "Arm", "ForeArm", "Hand"];
const FINGERS: [&str; 5] = ["Thumb", "Index", "Middle", "Ring", "Pinky"];
const LEG: [&str; 5] = ["UpLeg", "Leg", "Foot", "ToeBase", "Toe_End"];

/// Selectable avatar rig
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarAsset {
    Xbot,
    #[default]
    Ybot,
}

impl AvatarAsset {
    pub const ALL: [AvatarAsset; 2] = [Self::Xbot, Self::Ybot];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xbot => "xbot",
            Self::Ybot => "ybot",
        }
    }

    /// Build the bundled skeleton for this asset
    pub fn skeleton(&self) -> Skeleton {
        Skeleton::from_bone_names(self.as_str(), mixamo_bone_names())
    }
}

impl fmt::Display for AvatarAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AvatarAsset {
    type Err = SignAvatarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xbot" => Ok(Self::Xbot),
            "ybot" => Ok(Self::Ybot),
            other => Err(ConfigError::InvalidValue {
                field: "avatar.asset".to_string(),
                message: format!("Unknown avatar: {}", other),
            }
            .into()),
        }
    }
}

/// Full bone name for a Mixamo joint, e.g. `bone("RightHandIndex1")`
pub fn bone(joint: &str) -> String {
    format!("{}{}", BONE_PREFIX, joint)
}

/// Every bone of the standard Mixamo humanoid
pub fn mixamo_bone_names() -> Vec<String> {
    let mut names: Vec<String> = SPINE.iter().map(|j| bone(j)).collect();

    for side in ["Left", "Right"] {
        for joint in ARM {
            names.push(bone(&format!("{}{}", side, joint)));
        }
        for finger in FINGERS {
            for segment in 1..=4 {
                names.push(bone(&format!("{}Hand{}{}", side, finger, segment)));
            }
        }
        for joint in LEG {
            names.push(bone(&format!("{}{}", side, joint)));
        }
    }

    names
}

/// Resolve the skeleton to load for the configured avatar.
///
/// A configured rig file wins over the bundled skeleton.
pub fn load_skeleton(config: &AvatarConfig) -> Result<Skeleton, SignAvatarError> {
    match &config.rig_path {
        Some(path) => {
            let skeleton = Skeleton::from_file(path)?;
            tracing::info!(
                "Loaded rig {} ({} bones) from {}",
                skeleton.name(),
                skeleton.len(),
                path.display()
            );
            Ok(skeleton)
        }
        None => Ok(config.asset.skeleton()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::rig::RigAccessor;

    #[test]
    fn test_parse_asset() {
        assert_eq!("xbot".parse::<AvatarAsset>().unwrap(), AvatarAsset::Xbot);
        assert_eq!("YBOT".parse::<AvatarAsset>().unwrap(), AvatarAsset::Ybot);
        assert!("zbot".parse::<AvatarAsset>().is_err());
        assert_eq!(AvatarAsset::Xbot.to_string(), "xbot");
    }

    #[test]
    fn test_mixamo_skeleton_has_hand_bones() {
        let mut skeleton = AvatarAsset::Ybot.skeleton();
        assert_eq!(skeleton.name(), "ybot");
        // 7 spine + 2 * (4 arm + 20 finger + 5 leg)
        assert_eq!(skeleton.len(), 65);
        assert!(skeleton.resolve("mixamorigRightHandIndex1").is_some());
        assert!(skeleton.resolve("mixamorigLeftForeArm").is_some());
        assert!(skeleton.resolve("mixamorigNeck").is_some());
    }

    #[test]
    fn test_load_skeleton_prefers_rig_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rig.toml");
        std::fs::write(&path, "name = \"tiny\"\n[[bones]]\nname = \"root\"\n").unwrap();

        let mut config = AvatarConfig::default();
        assert_eq!(load_skeleton(&config).unwrap().name(), "ybot");

        config.rig_path = Some(path);
        let skeleton = load_skeleton(&config).unwrap();
        assert_eq!(skeleton.name(), "tiny");
        assert_eq!(skeleton.len(), 1);
    }
}
