pub mod calculator;
pub mod compare;
pub mod profile;

pub use calculator::{cosine_to_degrees, joint_angle};
pub use compare::{
    compare, compare_frames, landmark_similarity, ComparisonResult, JointReport, PoseComparison,
    INCOMPARABLE,
};
pub use profile::{
    build_profile, core_joint_names, AngleProfile, JointDefinition, CORE_JOINTS, JOINT_CATALOGUE,
};
