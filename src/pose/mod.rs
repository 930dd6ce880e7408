pub mod frame;
pub mod landmark;

pub use frame::{average_visibility, ensure_full_skeleton, missing_points, Frame};
pub use landmark::{Landmark, LandmarkIndex, Point2, RawPoint};
