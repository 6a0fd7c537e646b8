pub mod traits;
pub mod window;
pub mod holdout;
pub mod cv;
pub mod manager;

pub use manager::{PrepConfig, ENV_PREFIX};
pub use window::{WindowConfig, WindowDirection};
pub use holdout::HoldoutConfig;
pub use cv::CvConfig;
pub use traits::ConfigSection;
