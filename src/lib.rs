pub mod angle;
pub mod batch;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod logging;
pub mod pose;
pub mod reference;
pub mod segment;
pub mod session;

pub use error::{PoseError, Result};

/// ビルド時の git describe
pub const VERSION: &str = env!("GIT_VERSION");
