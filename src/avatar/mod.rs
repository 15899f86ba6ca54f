//! Avatar module
//!
//! Rig assets, the bone accessor the scheduler writes through, and the
//! per-avatar signing session.

pub mod assets;
pub mod rig;
pub mod session;

pub use assets::{load_skeleton, AvatarAsset};
pub use rig::{Bone, RigAccessor, Skeleton};
pub use session::SignSession;
