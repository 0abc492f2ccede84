pub mod camera;
pub mod config;
pub mod time;
pub mod transform;

pub use camera::Camera;
pub use config::{AppConfig, DebugMode};
pub use time::Time;
pub use transform::Transform;
